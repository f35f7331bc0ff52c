//! HMAC-SHA256 token verifiers.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::auth::token::{decode_hex, encode_hex};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("token signing secret must not be empty")]
    EmptySecret,

    #[error("token signing secret is unusable")]
    InvalidKey,
}

/// Keyed verifier for API token secrets; only the verifier is stored.
#[derive(Clone)]
pub struct TokenVerifier {
    mac: HmacSha256,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenVerifier(**redacted**)")
    }
}

impl TokenVerifier {
    /// Build a verifier keyed with `secret`.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is empty.
    pub fn new(secret: &str) -> Result<Self, VerifierError> {
        if secret.is_empty() {
            return Err(VerifierError::EmptySecret);
        }

        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| VerifierError::InvalidKey)?;

        Ok(Self { mac })
    }

    /// Hex verifier for `input`.
    #[must_use]
    pub fn sign(&self, input: &[u8]) -> String {
        let mut mac = self.mac.clone();

        mac.update(input);

        encode_hex(&mac.finalize().into_bytes())
    }

    /// Check `input` against a stored hex verifier in constant time.
    #[must_use]
    pub fn verify(&self, input: &[u8], verifier: &str) -> bool {
        let Some(expected) = decode_hex(verifier) else {
            return false;
        };

        let mut mac = self.mac.clone();

        mac.update(input);

        mac.verify_slice(&expected).is_ok()
    }
}
