//! Identity providers.

use std::sync::Mutex;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    credential::Credential,
    http::{ApiClient, ApiError},
};

/// Source of bearer credentials for the shopper.
#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an email and password for a credential.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Credential, IdentityError>;

    /// Register a customer account and return its credential.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Credential, IdentityError>;

    /// Credential of a session the provider still holds, if it is valid.
    async fn current_credential(&self) -> Result<Option<Credential>, IdentityError>;

    /// End the provider session for `credential`.
    async fn sign_out(&self, credential: &Credential) -> Result<(), IdentityError>;
}

/// Identity provider backed by the storefront auth endpoints.
#[derive(Debug)]
pub struct HttpIdentityProvider {
    client: ApiClient,
    current: Mutex<Option<Credential>>,
}

impl HttpIdentityProvider {
    /// Provider with no held session.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current: Mutex::new(None),
        }
    }

    /// Provider resuming a previously issued credential, e.g. one read from
    /// the shopper's keychain.
    pub fn with_credential(client: ApiClient, credential: Credential) -> Self {
        Self {
            client,
            current: Mutex::new(Some(credential)),
        }
    }

    fn hold(&self, credential: Option<Credential>) -> Result<(), IdentityError> {
        let mut current = self.current.lock().map_err(|error| IdentityError::Poisoned(error.to_string()))?;

        *current = credential;

        Ok(())
    }

    fn held(&self) -> Result<Option<Credential>, IdentityError> {
        let current = self.current.lock().map_err(|error| IdentityError::Poisoned(error.to_string()))?;

        Ok(current.clone())
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Credential, IdentityError> {
        let request = self
            .client
            .request(Method::POST, "/api/auth/login", None)
            .json(&LoginRequest { email, password });

        let response: TokenResponse = match self.client.send_json(request).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(IdentityError::InvalidCredentials),
            Err(error) => return Err(error.into()),
        };

        let credential = Credential::new(response.token);
        self.hold(Some(credential.clone()))?;

        Ok(credential)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Credential, IdentityError> {
        let request = self
            .client
            .request(Method::POST, "/api/auth/signup", None)
            .json(&SignupRequest {
                email,
                password,
                name,
            });

        let response: TokenResponse = self.client.send_json(request).await?;

        let credential = Credential::new(response.token);
        self.hold(Some(credential.clone()))?;

        Ok(credential)
    }

    async fn current_credential(&self) -> Result<Option<Credential>, IdentityError> {
        let Some(credential) = self.held()? else {
            return Ok(None);
        };

        let request = self
            .client
            .request(Method::GET, "/api/auth/me", Some(&credential));

        match self.client.send(request).await {
            Ok(_) => Ok(Some(credential)),
            Err(ApiError::Unauthorized) => {
                self.hold(None)?;

                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn sign_out(&self, credential: &Credential) -> Result<(), IdentityError> {
        self.hold(None)?;

        let request = self
            .client
            .request(Method::POST, "/api/auth/logout", Some(credential));

        match self.client.send(request).await {
            Ok(_) | Err(ApiError::Unauthorized) => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Errors from identity providers.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Email or password was wrong, or the account is inactive.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The provider could not be reached or answered unexpectedly.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A thread panicked while holding the session lock.
    #[error("identity session lock poisoned: {0}")]
    Poisoned(String),
}
