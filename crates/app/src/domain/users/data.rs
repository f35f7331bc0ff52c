//! Users Data

use crate::domain::users::records::{UserRole, UserStatus, UserUuid};

/// Default page size for user listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size accepted for user listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub avatar: Option<String>,
}

/// User Profile Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// User listing filter.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFilter {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
            role: None,
            status: None,
        }
    }
}

impl UserFilter {
    /// Page size clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Rows to skip for the requested page (pages start at 1).
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.effective_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_starts_at_first_page() {
        let filter = UserFilter::default();

        assert_eq!(filter.offset(), 0);
        assert_eq!(filter.effective_limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn offset_skips_previous_pages_and_clamps_limit() {
        let filter = UserFilter {
            page: 3,
            limit: 500,
            ..UserFilter::default()
        };

        assert_eq!(filter.effective_limit(), MAX_PAGE_LIMIT);
        assert_eq!(filter.offset(), 200);

        let zero_page = UserFilter {
            page: 0,
            ..UserFilter::default()
        };

        assert_eq!(zero_page.offset(), 0);
    }
}
