//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, AuthenticatedUser, IssuedApiToken,
        LoginSession, NewApiToken, TokenVerifier, build_verifier_input, format_api_token,
        generate_api_token_secret, parse_api_token, repository::PgAuthRepository,
        verify_password,
    },
    database::Db,
    domain::users::records::{UserStatus, UserUuid},
};

/// Lifetime of tokens issued by password login.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
    verifier: TokenVerifier,
    session_ttl: SignedDuration,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, verifier: TokenVerifier) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
            verifier,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, session_ttl: SignedDuration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let issued = self.insert_token(&mut tx, user, expires_at).await?;

        tx.commit().await?;

        Ok(issued)
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let tokens = self.repository.list_api_tokens_by_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(tokens)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.repository.revoke_api_token(&mut tx, token_uuid).await?;

        tx.commit().await?;

        Ok(revoked.is_some())
    }

    async fn insert_token(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(&token_uuid, version, &user, &secret);

        let metadata = self
            .repository
            .create_api_token(
                tx,
                &NewApiToken {
                    uuid: token_uuid,
                    user_uuid: user,
                    version,
                    token_hash: self.verifier.sign(&verifier_input),
                    expires_at,
                },
            )
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    fn session_expiry(&self) -> Option<Timestamp> {
        Timestamp::now().checked_add(self.session_ttl).ok()
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if !self.verifier.verify(&verifier_input, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        if token.status != UserStatus::Active {
            return Err(AuthServiceError::Inactive);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .repository
            .touch_api_token_last_used(&mut tx, parsed_token.token_uuid)
            .await;

        tx.commit().await?;

        Ok(AuthenticatedUser {
            user_uuid: token.user_uuid,
            role: token.role,
            token_uuid: parsed_token.token_uuid,
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let Some((user_uuid, password_hash)) = self
            .repository
            .find_password_hash(&mut tx, email.trim())
            .await?
        else {
            debug!("login for unknown email");

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &password_hash)? {
            debug!(%user_uuid, "login with wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        let user = self.repository.touch_user_last_login(&mut tx, user_uuid).await?;

        if !user.is_active() {
            return Err(AuthServiceError::Inactive);
        }

        let token = self
            .insert_token(&mut tx, user_uuid, self.session_expiry())
            .await?;

        tx.commit().await?;

        info!(%user_uuid, "user logged in");

        Ok(LoginSession { token, user })
    }

    async fn issue_session(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        self.issue_api_token(user, self.session_expiry()).await
    }

    async fn logout(&self, token_uuid: Uuid) -> Result<(), AuthServiceError> {
        self.revoke_api_token(token_uuid).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to its active user.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<AuthenticatedUser, AuthServiceError>;

    /// Check an email and password and issue a session token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthServiceError>;

    /// Issue a session token for a user who has just been created.
    async fn issue_session(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError>;

    /// Revoke the token a request was authenticated with.
    async fn logout(&self, token_uuid: Uuid) -> Result<(), AuthServiceError>;
}
