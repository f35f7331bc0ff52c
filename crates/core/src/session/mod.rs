//! Session
//!
//! Ties the cart to the shopper's identity. Explicit sign-in and sign-up merge
//! the anonymous cart into the user's remote cart; restoring an existing
//! session adopts the remote cart as-is; signing out clears the cart both
//! remotely and locally.

mod identity;

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};

use crate::{cart::CartStore, credential::Credential};

pub use identity::{HttpIdentityProvider, IdentityError, IdentityProvider, MockIdentityProvider};

/// Shopper session wrapping the cart store.
pub struct Session {
    identity: Arc<dyn IdentityProvider>,
    cart: CartStore,
    credential: Option<Credential>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cart", &self.cart)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Anonymous session over `cart`.
    pub fn new(identity: Arc<dyn IdentityProvider>, cart: CartStore) -> Self {
        Self {
            identity,
            cart,
            credential: None,
        }
    }

    /// Cart store.
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable cart store.
    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Credential of the signed-in user.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Whether a user is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }

    /// Sign in and merge the anonymous cart into the user's remote cart.
    ///
    /// A failure to load the remote cart does not fail the sign-in; it is
    /// recorded as the cart's last error.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider rejects the credentials.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        let credential = self.identity.sign_in(email, password).await?;

        self.attach(credential, true).await;

        Ok(())
    }

    /// Create an account, sign in and merge the anonymous cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider rejects the registration.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), SessionError> {
        let credential = self.identity.sign_up(email, password, name).await?;

        self.attach(credential, true).await;

        Ok(())
    }

    /// Resume a session the identity provider already holds. The remote cart
    /// replaces local state. Returns whether a session was restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider cannot be queried.
    pub async fn restore(&mut self) -> Result<bool, SessionError> {
        let Some(credential) = self.identity.current_credential().await? else {
            return Ok(false);
        };

        self.attach(credential, false).await;

        Ok(true)
    }

    /// Empty the local cart, clear the outgoing user's remote cart, then sign
    /// out of the identity provider.
    ///
    /// The local cart is empty afterwards even if the remote clear or the
    /// provider sign-out fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider sign-out fails.
    pub async fn sign_out(&mut self) -> Result<(), SessionError> {
        let Some(credential) = self.credential.take() else {
            self.cart.clear_cart(false);

            return Ok(());
        };

        self.cart.detach_credential();
        self.cart.clear_cart(false);
        self.cart.clear_backend(&credential);
        self.cart.flush().await;

        info!("signed out");

        self.identity.sign_out(&credential).await?;

        Ok(())
    }

    async fn attach(&mut self, credential: Credential, merge_local: bool) {
        self.credential = Some(credential.clone());

        if let Err(error) = self.cart.hydrate_from_backend(credential, merge_local).await {
            warn!(%error, merge_local, "signed in without remote cart");
        }
    }
}

/// Errors from session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identity provider failed or rejected the request.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
