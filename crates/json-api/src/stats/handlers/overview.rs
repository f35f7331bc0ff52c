//! Orders Overview Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::reports::records::OrdersOverview;

use crate::{extensions::*, state::State, stats::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OverviewResponse {
    pub total_orders: u64,

    /// Revenue in cents
    pub total_revenue: u64,

    /// Mean order value in cents
    pub avg_order_value: u64,

    pub status_breakdown: Vec<StatusCount>,
    pub payment_status_breakdown: Vec<StatusCount>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusCount {
    pub status: String,
    pub count: u64,
}

impl From<OrdersOverview> for OverviewResponse {
    fn from(overview: OrdersOverview) -> Self {
        OverviewResponse {
            total_orders: overview.total_orders,
            total_revenue: overview.total_revenue,
            avg_order_value: overview.avg_order_value,
            status_breakdown: overview
                .by_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.to_string(),
                    count,
                })
                .collect(),
            payment_status_breakdown: overview
                .by_payment_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.to_string(),
                    count,
                })
                .collect(),
        }
    }
}

/// Orders Overview Handler
#[endpoint(tags("stats"), summary = "Orders Overview", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OverviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let overview = state
        .app
        .reports
        .overview()
        .await
        .map_err(into_status_error)?;

    Ok(Json(overview.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gennessence::orders::{OrderStatus, PaymentStatus};

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_overview_reports_totals_and_breakdowns() -> TestResult {
        let mut services = MockServices::default();

        services
            .reports
            .expect_overview()
            .once()
            .return_once(|| {
                Ok(OrdersOverview {
                    total_orders: 2,
                    total_revenue: 16_000,
                    avg_order_value: 8_000,
                    by_status: vec![(OrderStatus::Pending, 1), (OrderStatus::Paid, 1)],
                    by_payment_status: vec![(PaymentStatus::Completed, 2)],
                })
            });

        let body: OverviewResponse = TestClient::get("http://example.com/orders/stats/overview")
            .send(&admin_service(
                services,
                Router::with_path("orders/stats/overview").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.total_orders, 2);
        assert_eq!(body.avg_order_value, 8_000);
        assert_eq!(body.status_breakdown[1].status, "paid");
        assert_eq!(body.payment_status_breakdown[0].count, 2);

        Ok(())
    }
}
