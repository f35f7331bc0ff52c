//! Order Index Handler

use std::sync::Arc;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence::orders::{OrderStatus, PaymentStatus};
use gennessence_app::domain::orders::data::{OrderFilter, OrderSort};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

/// Whole UTC days from the start of `start` to the end of `end`. Both bounds
/// must be given together.
fn created_between(
    start: Option<String>,
    end: Option<String>,
) -> Result<Option<(Timestamp, Timestamp)>, StatusError> {
    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(
                StatusError::bad_request().brief("start_date and end_date must be given together")
            );
        }
    };

    let start = start.parse::<Date>().or_400("invalid start_date")?;
    let end = end.parse::<Date>().or_400("invalid end_date")?;

    if end < start {
        return Err(StatusError::bad_request().brief("end_date is before start_date"));
    }

    let from = start
        .to_zoned(TimeZone::UTC)
        .or_400("invalid start_date")?
        .timestamp();
    let to = end
        .at(23, 59, 59, 999_999_999)
        .to_zoned(TimeZone::UTC)
        .or_400("invalid end_date")?
        .timestamp();

    Ok(Some((from, to)))
}

/// Order Index Handler
///
/// Lists every order, newest first unless a sort is given.
#[endpoint(tags("orders"), summary = "List Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    payment_status: QueryParam<String, false>,
    start_date: QueryParam<String, false>,
    end_date: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = OrderFilter {
        status: status
            .into_inner()
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .or_400("invalid status")?,
        payment_status: payment_status
            .into_inner()
            .map(|status| status.parse::<PaymentStatus>())
            .transpose()
            .or_400("invalid payment_status")?,
        created_between: created_between(start_date.into_inner(), end_date.into_inner())?,
        sort: sort
            .into_inner()
            .map(|sort| sort.parse::<OrderSort>())
            .transpose()
            .or_400("invalid sort")?,
    };

    let orders = state
        .app
        .orders
        .list_orders(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}
