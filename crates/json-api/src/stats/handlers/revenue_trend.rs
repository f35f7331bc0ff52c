//! Revenue Trend Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::reports::records::RevenueDay;

use crate::{extensions::*, state::State, stats::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevenueTrendResponse {
    /// Days with sales, oldest first
    pub days: Vec<RevenueDayResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevenueDayResponse {
    /// UTC date, `YYYY-MM-DD`
    pub date: String,

    /// Revenue in cents
    pub total_revenue: u64,

    pub order_count: u64,
}

impl From<RevenueDay> for RevenueDayResponse {
    fn from(day: RevenueDay) -> Self {
        RevenueDayResponse {
            date: day.date.to_string(),
            total_revenue: day.total_revenue,
            order_count: day.order_count,
        }
    }
}

/// Revenue Trend Handler
///
/// Daily revenue over the last 30 days.
#[endpoint(tags("stats"), summary = "Revenue Trend", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RevenueTrendResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let days = state
        .app
        .reports
        .revenue_trend(Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(RevenueTrendResponse {
        days: days.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_trend_formats_dates() -> TestResult {
        let mut services = MockServices::default();

        services
            .reports
            .expect_revenue_trend()
            .once()
            .return_once(|_| {
                Ok(vec![
                    RevenueDay {
                        date: date(2026, 3, 1),
                        total_revenue: 10_000,
                        order_count: 1,
                    },
                    RevenueDay {
                        date: date(2026, 3, 4),
                        total_revenue: 6_000,
                        order_count: 2,
                    },
                ])
            });

        let body: RevenueTrendResponse =
            TestClient::get("http://example.com/orders/stats/revenue-trend")
                .send(&admin_service(
                    services,
                    Router::with_path("orders/stats/revenue-trend").get(handler),
                ))
                .await
                .take_json()
                .await?;

        assert_eq!(body.days.len(), 2);
        assert_eq!(body.days[0].date, "2026-03-01");
        assert_eq!(body.days[1].order_count, 2);

        Ok(())
    }
}
