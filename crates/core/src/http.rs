//! Storefront API client shared by the cart gateway and identity provider.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::credential::Credential;

/// HTTP client bound to a storefront API base address.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a new client for the API at `base_url`, e.g. `"http://localhost:8698"`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Base address requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request to `path`, attaching the bearer credential when given.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{path}", self.base_url));

        match credential {
            Some(credential) => request.bearer_auth(credential.as_str()),
            None => request,
        }
    }

    /// Send a request and fail on any non-2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for 401/403 responses, and
    /// [`ApiError::UnexpectedResponse`] for any other unsuccessful status.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();

        Err(ApiError::UnexpectedResponse(format!(
            "request failed with status {status}: {text}"
        )))
    }

    /// Send a request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response or an
    /// undecodable body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json().await?)
    }
}

/// Errors talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential was missing, expired or lacked permission.
    #[error("credential rejected by the storefront API")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("unexpected response from the storefront API: {0}")]
    UnexpectedResponse(String),
}
