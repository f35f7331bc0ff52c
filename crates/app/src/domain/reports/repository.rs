//! Reports Repository

use gennessence::orders::{OrderStatus, PaymentStatus};
use jiff::{Timestamp, civil::Date};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::{
    database::{column_error, from_bigint},
    domain::{
        products::records::ProductUuid,
        reports::records::{RevenueDay, TopProduct},
    },
};

const ORDER_TOTALS_SQL: &str = include_str!("sql/order_totals.sql");
const ORDER_STATUS_COUNTS_SQL: &str = include_str!("sql/order_status_counts.sql");
const PAYMENT_STATUS_COUNTS_SQL: &str = include_str!("sql/payment_status_counts.sql");
const REVENUE_BY_DAY_SQL: &str = include_str!("sql/revenue_by_day.sql");
const TOP_PRODUCTS_SQL: &str = include_str!("sql/top_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Order count and revenue over all orders.
    pub(crate) async fn order_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(u64, u64), sqlx::Error> {
        let row = query(ORDER_TOTALS_SQL).fetch_one(&mut **tx).await?;

        Ok((
            from_bigint("total_orders", row.try_get("total_orders")?)?,
            from_bigint("total_revenue", row.try_get("total_revenue")?)?,
        ))
    }

    pub(crate) async fn order_status_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<(OrderStatus, u64)>, sqlx::Error> {
        query(ORDER_STATUS_COUNTS_SQL)
            .try_map(|row: PgRow| {
                let status: String = row.try_get("status")?;

                Ok((
                    status
                        .parse()
                        .map_err(|error| column_error("status", error))?,
                    from_bigint("count", row.try_get("count")?)?,
                ))
            })
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn payment_status_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<(PaymentStatus, u64)>, sqlx::Error> {
        query(PAYMENT_STATUS_COUNTS_SQL)
            .try_map(|row: PgRow| {
                let status: String = row.try_get("payment_status")?;

                Ok((
                    status
                        .parse()
                        .map_err(|error| column_error("payment_status", error))?,
                    from_bigint("count", row.try_get("count")?)?,
                ))
            })
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "reports.repository.revenue_by_day",
        skip(self, tx, statuses),
        fields(day_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn revenue_by_day(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
        statuses: &[OrderStatus],
    ) -> Result<Vec<RevenueDay>, sqlx::Error> {
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        let days = query(REVENUE_BY_DAY_SQL)
            .bind(SqlxTimestamp::from(since))
            .bind(&statuses)
            .try_map(|row: PgRow| {
                let day: String = row.try_get("day")?;

                Ok(RevenueDay {
                    date: day
                        .parse::<Date>()
                        .map_err(|error| column_error("day", error))?,
                    total_revenue: from_bigint("total_revenue", row.try_get("total_revenue")?)?,
                    order_count: from_bigint("order_count", row.try_get("order_count")?)?,
                })
            })
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("day_count", days.len());

        Ok(days)
    }

    pub(crate) async fn top_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: u32,
    ) -> Result<Vec<TopProduct>, sqlx::Error> {
        query(TOP_PRODUCTS_SQL)
            .bind(i64::from(limit))
            .try_map(|row: PgRow| {
                Ok(TopProduct {
                    product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                    name: row.try_get("name")?,
                    image: row.try_get("image")?,
                    total_sold: from_bigint("total_sold", row.try_get("total_sold")?)?,
                    total_revenue: from_bigint("total_revenue", row.try_get("total_revenue")?)?,
                })
            })
            .fetch_all(&mut **tx)
            .await
    }
}
