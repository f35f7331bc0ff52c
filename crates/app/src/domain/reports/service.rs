//! Reports service.

use async_trait::async_trait;
use gennessence::orders::OrderStatus;
use jiff::{Span, Timestamp, tz::TimeZone};
use mockall::automock;

use crate::{
    database::Db,
    domain::reports::{
        errors::ReportsServiceError,
        records::{OrdersOverview, RevenueDay, TopProduct, average_order_value},
        repository::PgReportsRepository,
    },
};

/// Days covered by the revenue trend, today included.
pub const TREND_DAYS: i64 = 30;

/// Number of best sellers reported.
pub const TOP_PRODUCTS_LIMIT: u32 = 5;

/// Start of the first UTC day in the trend window ending on `now`'s day.
///
/// # Errors
///
/// Returns an error when the window falls outside the supported date range.
pub fn trend_start(now: Timestamp) -> Result<Timestamp, jiff::Error> {
    let today = now.to_zoned(TimeZone::UTC).date();

    Ok(today
        .checked_sub(Span::new().days(TREND_DAYS - 1))?
        .to_zoned(TimeZone::UTC)?
        .timestamp())
}

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    async fn overview(&self) -> Result<OrdersOverview, ReportsServiceError> {
        let mut tx = self.db.begin().await?;

        let (total_orders, total_revenue) = self.repository.order_totals(&mut tx).await?;
        let by_status = self.repository.order_status_counts(&mut tx).await?;
        let by_payment_status = self.repository.payment_status_counts(&mut tx).await?;

        tx.commit().await?;

        Ok(OrdersOverview {
            total_orders,
            total_revenue,
            avg_order_value: average_order_value(total_revenue, total_orders),
            by_status,
            by_payment_status,
        })
    }

    async fn revenue_trend(&self, now: Timestamp) -> Result<Vec<RevenueDay>, ReportsServiceError> {
        let since = trend_start(now)?;

        let statuses: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|status| status.is_revenue())
            .collect();

        let mut tx = self.db.begin().await?;

        let days = self
            .repository
            .revenue_by_day(&mut tx, since, &statuses)
            .await?;

        tx.commit().await?;

        Ok(days)
    }

    async fn top_products(&self) -> Result<Vec<TopProduct>, ReportsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .top_products(&mut tx, TOP_PRODUCTS_LIMIT)
            .await?;

        tx.commit().await?;

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Order count, revenue and average order value with status breakdowns.
    async fn overview(&self) -> Result<OrdersOverview, ReportsServiceError>;

    /// Daily revenue from paid, shipped and delivered orders over the last
    /// [`TREND_DAYS`] UTC days, oldest first. Days without sales are absent.
    async fn revenue_trend(&self, now: Timestamp) -> Result<Vec<RevenueDay>, ReportsServiceError>;

    /// Best sellers by units sold across all orders.
    async fn top_products(&self) -> Result<Vec<TopProduct>, ReportsServiceError>;
}

#[cfg(test)]
mod tests {
    use gennessence::orders::PaymentStatus;
    use testresult::TestResult;

    use crate::{
        domain::orders::{OrdersService, data::StatusUpdate},
        test::{
            TestContext,
            helpers::{create_customer, create_product, new_order},
        },
    };

    use super::*;

    #[test]
    fn trend_window_starts_29_days_before_today() -> TestResult {
        let now: Timestamp = "2026-03-30T18:45:00Z".parse()?;

        assert_eq!(trend_start(now)?, "2026-03-01T00:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn empty_store_reports_zeroes() -> TestResult {
        let ctx = TestContext::new().await;

        let overview = ctx.reports.overview().await?;

        assert_eq!(overview, OrdersOverview::default());
        assert!(ctx.reports.revenue_trend(Timestamp::now()).await?.is_empty());
        assert!(ctx.reports.top_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn reports_cover_orders_and_best_sellers() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_customer(&ctx, "amara@example.com").await?;
        let still = create_product(&ctx, "Still", 5_000).await?;
        let sparkling = create_product(&ctx, "Sparkling", 6_000).await?;

        let paid = ctx
            .orders
            .create_order(user, new_order(&[(still, 2), (sparkling, 1)]))
            .await?;

        ctx.orders
            .create_order(user, new_order(&[(sparkling, 1)]))
            .await?;

        ctx.orders
            .update_status(
                paid.uuid,
                StatusUpdate {
                    status: OrderStatus::Paid,
                    tracking_number: None,
                    notes: None,
                },
            )
            .await?;

        let overview = ctx.reports.overview().await?;

        assert_eq!(overview.total_orders, 2);
        assert_eq!(overview.total_revenue, 22_000);
        assert_eq!(overview.avg_order_value, 11_000);
        assert_eq!(
            overview.by_status,
            vec![(OrderStatus::Paid, 1), (OrderStatus::Pending, 1)]
        );
        assert_eq!(overview.by_payment_status, vec![(PaymentStatus::Pending, 2)]);

        let trend = ctx.reports.revenue_trend(Timestamp::now()).await?;

        assert_eq!(trend.len(), 1);
        assert_eq!(trend.first().map(|day| day.total_revenue), Some(16_000));

        let top = ctx.reports.top_products().await?;
        let sold: Vec<(&str, u64, u64)> = top
            .iter()
            .map(|product| (product.name.as_str(), product.total_sold, product.total_revenue))
            .collect();

        assert_eq!(sold, vec![("Sparkling", 2, 12_000), ("Still", 2, 10_000)]);

        Ok(())
    }
}
