//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::hash_password,
    database::Db,
    domain::users::{
        data::{MIN_PASSWORD_LENGTH, NewUser, UserFilter, UserUpdate},
        errors::UsersServiceError,
        records::{UserPage, UserRecord, UserRole, UserStatus, UserUuid},
        repository::{PgUsersRepository, UserInsert},
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

fn check_password(password: &str) -> Result<(), UsersServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UsersServiceError::WeakPassword(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

fn check_profile(email: &str, name: &str) -> Result<(), UsersServiceError> {
    if email.is_empty() || name.is_empty() {
        return Err(UsersServiceError::MissingRequiredData);
    }

    if !email.contains('@') || email.contains(char::is_whitespace) {
        return Err(UsersServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn list_users(&self, filter: UserFilter) -> Result<UserPage, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx, &filter).await?;
        let total = self.repository.count_users(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(UserPage {
            users,
            total,
            page: filter.page.max(1),
            limit: filter.effective_limit(),
        })
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_email(&mut tx, email.trim())
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let email = user.email.trim();
        let name = user.name.trim();

        check_profile(email, name)?;
        check_password(&user.password)?;

        let password_hash = hash_password(&user.password)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                UserInsert {
                    uuid: user.uuid,
                    email,
                    name,
                    role: user.role,
                    status: user.status,
                    avatar: user.avatar.as_deref(),
                    password_hash: &password_hash,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(user_uuid = %created.uuid, role = %created.role, "created user");

        Ok(created)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        let email = update.email.trim();
        let name = update.name.trim();

        check_profile(email, name)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_user(&mut tx, user, email, name, update.avatar.as_deref())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn update_user_role(
        &self,
        user: UserUuid,
        role: UserRole,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_user_role(&mut tx, user, role).await?;

        tx.commit().await?;

        tracing::info!(user_uuid = %user, %role, "changed user role");

        Ok(updated)
    }

    async fn update_user_status(
        &self,
        user: UserUuid,
        status: UserStatus,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_user_status(&mut tx, user, status)
            .await?;

        tx.commit().await?;

        tracing::info!(user_uuid = %user, %status, "changed user status");

        Ok(updated)
    }

    async fn reset_password(&self, user: UserUuid, password: &str) -> Result<(), UsersServiceError> {
        check_password(password)?;

        let password_hash = hash_password(password)?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .update_user_password(&mut tx, user, &password_hash)
            .await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_user(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// One page of users matching `filter`, newest first.
    async fn list_users(&self, filter: UserFilter) -> Result<UserPage, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Look a user up by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, UsersServiceError>;

    /// Create a user, hashing the supplied password.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Replace a user's email, name and avatar.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn update_user_role(
        &self,
        user: UserUuid,
        role: UserRole,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn update_user_status(
        &self,
        user: UserUuid,
        status: UserStatus,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Set a new password for a user.
    async fn reset_password(&self, user: UserUuid, password: &str) -> Result<(), UsersServiceError>;

    /// Delete a user. Users with orders cannot be deleted.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;
}
