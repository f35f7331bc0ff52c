//! Carts service.

use async_trait::async_trait;
use gennessence::cart::CartItem;
use mockall::automock;
use rustc_hash::FxHashSet;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

/// Reject lines the client store would never produce.
fn check_items(items: &[CartItem]) -> Result<(), CartsServiceError> {
    let mut seen = FxHashSet::default();

    for item in items {
        if item.qty == 0 {
            return Err(CartsServiceError::InvalidQuantity(item.id.clone()));
        }

        if !seen.insert(&item.id) {
            return Err(CartsServiceError::DuplicateItem(item.id.clone()));
        }
    }

    Ok(())
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        cart.items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn replace_items(
        &self,
        user: UserUuid,
        items: Vec<CartItem>,
    ) -> Result<CartRecord, CartsServiceError> {
        check_items(&items)?;

        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        self.items_repository
            .delete_cart_items(&mut tx, cart.uuid)
            .await?;

        self.items_repository
            .create_cart_items(&mut tx, cart.uuid, &items)
            .await?;

        let mut cart = self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        tracing::debug!(user_uuid = %user, item_count = items.len(), "replaced cart items");

        cart.items = items;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.clear_user_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, created empty on first access.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Replace every line of the user's cart, keeping the given order.
    async fn replace_items(
        &self,
        user: UserUuid,
        items: Vec<CartItem>,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line from the user's cart. Clearing an empty or missing
    /// cart succeeds.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{cart_item, create_customer},
    };

    use super::*;

    #[test]
    fn zero_quantity_lines_are_rejected() {
        let mut item = cart_item("Still", 1);
        item.qty = 0;

        assert!(matches!(
            check_items(&[item]),
            Err(CartsServiceError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = check_items(&[cart_item("Still", 1), cart_item("Still", 2)]);

        assert!(matches!(result, Err(CartsServiceError::DuplicateItem(key)) if key.as_str() == "Still-500ml"));
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn first_fetch_creates_an_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;

        let first = ctx.carts.get_cart(user).await?;
        let second = ctx.carts.get_cart(user).await?;

        assert!(first.items.is_empty());
        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.user_uuid, user);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn replace_items_overwrites_in_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;

        ctx.carts
            .replace_items(user, vec![cart_item("Still", 1)])
            .await?;

        ctx.carts
            .replace_items(user, vec![cart_item("Sparkling", 2), cart_item("Mineral", 3)])
            .await?;

        let cart = ctx.carts.get_cart(user).await?;
        let lines: Vec<(&str, u32)> = cart
            .items
            .iter()
            .map(|item| (item.name.as_str(), item.qty))
            .collect();

        assert_eq!(lines, vec![("Sparkling", 2), ("Mineral", 3)]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn clear_cart_empties_the_stored_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;

        ctx.carts
            .replace_items(user, vec![cart_item("Still", 1)])
            .await?;

        ctx.carts.clear_cart(user).await?;

        assert!(ctx.carts.get_cart(user).await?.items.is_empty());

        Ok(())
    }
}
