//! Orders service.

use async_trait::async_trait;
use gennessence::orders::{self, Actor};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{NewOrder, OrderFilter, PaymentUpdate, StatusUpdate},
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items = self.items_repository.get_order_items(tx, &uuids).await?;

        for order in &mut orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn load_order(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order: OrderRecord,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut loaded = self.attach_items(tx, vec![order]).await?;

        loaded.pop().ok_or(OrdersServiceError::NotFound)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(
        &self,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx, &filter).await?;
        let orders = self.attach_items(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_user_orders(&mut tx, user)
            .await?;
        let orders = self.attach_items(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;
        let order = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if order.items.iter().any(|item| item.quantity == 0) {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        let product_uuids: Vec<ProductUuid> = order
            .items
            .iter()
            .map(|item| ProductUuid::from_uuid(item.product_uuid))
            .collect();

        let mut tx = self.db.begin().await?;

        let products = self
            .items_repository
            .get_products_for_order(&mut tx, &product_uuids)
            .await?;

        let items = order
            .items
            .iter()
            .zip(&product_uuids)
            .map(|(item, product_uuid)| {
                let product = products
                    .get(product_uuid)
                    .ok_or(OrdersServiceError::UnknownProduct(*product_uuid))?;

                Ok(OrderItemRecord {
                    product_uuid: *product_uuid,
                    name: product.name.clone(),
                    quantity: item.quantity,
                    price: product.price,
                })
            })
            .collect::<Result<Vec<_>, OrdersServiceError>>()?;

        let total = items
            .iter()
            .fold(0_u64, |total, item| total.saturating_add(item.line_total()));

        let mut created = self
            .orders_repository
            .create_order(&mut tx, order.uuid, user, total, &order.shipping_address)
            .await?;

        self.items_repository
            .create_order_items(&mut tx, created.uuid, &items)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %created.uuid, user_uuid = %user, total, "created order");

        created.items = items;

        Ok(created)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        orders::transition(current.status, update.status, Actor::Admin)?;

        let updated = self
            .orders_repository
            .update_order_status(&mut tx, order, &update)
            .await?;
        let updated = self.load_order(&mut tx, updated).await?;

        tx.commit().await?;

        info!(order_uuid = %order, from = %current.status, to = %updated.status, "updated order status");

        Ok(updated)
    }

    async fn update_payment(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .orders_repository
            .update_order_payment(&mut tx, order, &update)
            .await?;
        let updated = self.load_order(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn cancel_order(
        &self,
        order: OrderUuid,
        requester: UserUuid,
        actor: Actor,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if actor == Actor::Owner && !current.is_owned_by(requester) {
            return Err(OrdersServiceError::Forbidden);
        }

        let status = orders::cancel(current.status)?;

        let cancelled = self
            .orders_repository
            .update_order_status(
                &mut tx,
                order,
                &StatusUpdate {
                    status,
                    tracking_number: None,
                    notes: None,
                },
            )
            .await?;
        let cancelled = self.load_order(&mut tx, cancelled).await?;

        tx.commit().await?;

        info!(order_uuid = %order, requester = %requester, "cancelled order");

        Ok(cancelled)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Every order matching `filter`.
    async fn list_orders(&self, filter: OrderFilter)
    -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A user's own orders, newest first.
    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Place an order at current product prices. The order starts pending
    /// with a pending payment.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Set fulfilment status, tracking number and notes.
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Set payment status and gateway reference.
    async fn update_payment(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel a pending order on behalf of its owner or an administrator.
    /// Owners may only cancel their own orders.
    async fn cancel_order(
        &self,
        order: OrderUuid,
        requester: UserUuid,
        actor: Actor,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use gennessence::{
        checkout::OrderDraftItem,
        orders::{OrderStatus, PaymentStatus, TransitionError},
    };
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        test::{
            TestContext,
            helpers::{create_customer, create_product, new_order, product_details},
        },
    };

    use super::*;

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn create_order_snapshots_prices_and_total() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;
        let sparkling = create_product(&ctx, "Sparkling", 6_000).await?;

        let order = ctx
            .orders
            .create_order(user, new_order(&[(still, 2), (sparkling, 1)]))
            .await?;

        assert_eq!(order.total, 16_000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.items.len(), 2);

        ctx.products
            .update_product(still, product_details("Still", 9_999))
            .await?;

        let stored = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(stored.total, 16_000);
        assert_eq!(
            stored.items.first().map(|item| item.price),
            Some(5_000),
            "line prices are captured at purchase"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn unknown_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;

        let result = ctx
            .orders
            .create_order(user, new_order(&[(ProductUuid::new(), 1)]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::UnknownProduct(_))),
            "expected UnknownProduct, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;

        let mut order = new_order(&[(still, 1)]);
        order.items = vec![OrderDraftItem {
            product_uuid: still.into_uuid(),
            quantity: 0,
        }];

        let result = ctx.orders.create_order(user, order).await;

        assert!(matches!(result, Err(OrdersServiceError::InvalidQuantity)));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn owner_cancels_pending_order_but_not_shipped() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;

        let pending = ctx
            .orders
            .create_order(user, new_order(&[(still, 1)]))
            .await?;

        let cancelled = ctx
            .orders
            .cancel_order(pending.uuid, user, Actor::Owner)
            .await?;

        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let shipped = ctx
            .orders
            .create_order(user, new_order(&[(still, 1)]))
            .await?;

        ctx.orders
            .update_status(
                shipped.uuid,
                StatusUpdate {
                    status: OrderStatus::Shipped,
                    tracking_number: Some("TRK-1".to_string()),
                    notes: None,
                },
            )
            .await?;

        let result = ctx
            .orders
            .cancel_order(shipped.uuid, user, Actor::Owner)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Transition(
                    TransitionError::NotCancellable(OrderStatus::Shipped)
                ))
            ),
            "expected NotCancellable, got {result:?}"
        );

        let stored = ctx.orders.get_order(shipped.uuid).await?;

        assert_eq!(stored.status, OrderStatus::Shipped);
        assert_eq!(stored.tracking_number.as_deref(), Some("TRK-1"));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn other_customers_cannot_cancel() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = create_customer(&ctx, "amara@example.com").await?;
        let stranger = create_customer(&ctx, "sipho@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;

        let order = ctx
            .orders
            .create_order(owner, new_order(&[(still, 1)]))
            .await?;

        let result = ctx
            .orders
            .cancel_order(order.uuid, stranger, Actor::Owner)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn list_orders_filters_by_payment_status() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;

        let paid = ctx
            .orders
            .create_order(user, new_order(&[(still, 1)]))
            .await?;

        ctx.orders
            .create_order(user, new_order(&[(still, 2)]))
            .await?;

        ctx.orders
            .update_payment(
                paid.uuid,
                PaymentUpdate {
                    payment_status: PaymentStatus::Completed,
                    payment_id: Some("pf-123".to_string()),
                },
            )
            .await?;

        let completed = ctx
            .orders
            .list_orders(OrderFilter {
                payment_status: Some(PaymentStatus::Completed),
                ..OrderFilter::default()
            })
            .await?;

        assert_eq!(completed.len(), 1);
        assert_eq!(
            completed.first().and_then(|order| order.payment_id.as_deref()),
            Some("pf-123")
        );

        let mine = ctx.orders.list_user_orders(user).await?;

        assert_eq!(mine.len(), 2);

        Ok(())
    }
}
