//! Authentication

mod errors;
mod models;
mod password;
mod repository;
mod service;
mod token;
mod verifier;

pub use errors::*;
pub use models::*;
pub use password::{PasswordError, hash_password, verify_password};
pub use service::*;
pub use token::*;
pub use verifier::{TokenVerifier, VerifierError};
