//! Payments Repository

use gennessence::orders::{OrderStatus, PaymentStatus};
use sqlx::{Postgres, Row, Transaction, query};

use crate::{
    database::{column_error, from_bigint},
    domain::orders::records::OrderUuid,
};

const LOCK_ORDER_PAYMENT_SQL: &str = include_str!("sql/lock_order_payment.sql");
const APPLY_PAYMENT_CHANGE_SQL: &str = include_str!("sql/apply_payment_change.sql");

/// Payment-relevant state of a locked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderPaymentState {
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock an order for the rest of the transaction.
    pub(crate) async fn lock_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderPaymentState, sqlx::Error> {
        let row = query(LOCK_ORDER_PAYMENT_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;

        Ok(OrderPaymentState {
            total: from_bigint("total", row.try_get("total")?)?,
            status: status
                .parse()
                .map_err(|error| column_error("status", error))?,
            payment_status: payment_status
                .parse()
                .map_err(|error| column_error("payment_status", error))?,
        })
    }

    /// Move an order from `from` to the given statuses. Returns false when
    /// the order is no longer in `from`.
    #[tracing::instrument(
        name = "payments.repository.apply_payment_change",
        skip(self, tx, from),
        err
    )]
    pub(crate) async fn apply_payment_change(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderPaymentState,
        status: OrderStatus,
        payment_status: PaymentStatus,
        gateway_reference: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(APPLY_PAYMENT_CHANGE_SQL)
            .bind(order.into_uuid())
            .bind(from.status.as_str())
            .bind(from.payment_status.as_str())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .bind(gateway_reference)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}
