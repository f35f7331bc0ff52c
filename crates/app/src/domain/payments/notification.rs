//! Payment notifications.
//!
//! The gateway posts a form to the notify URL whenever a payment changes
//! state. Each notification names the order in `m_payment_id` and reports one
//! of `COMPLETE`, `FAILED`, `CANCELLED` or `PENDING` in `payment_status`.
//! Delivery is at least once, so applying a notification must be idempotent.

use std::str::FromStr;

use gennessence::{
    money,
    orders::{OrderStatus, PaymentStatus},
};
use rust_decimal::Decimal;

use crate::domain::{
    InvalidValue, orders::records::OrderUuid, payments::errors::PaymentsServiceError,
};

/// Payment state as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStatus {
    Complete,
    Failed,
    Cancelled,
    Pending,
}

impl FromStr for GatewayStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETE" => Ok(Self::Complete),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" => Ok(Self::Cancelled),
            "PENDING" => Ok(Self::Pending),
            other => Err(InvalidValue::new("payment_status", other)),
        }
    }
}

/// The fields of a notification this store acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    pub order: OrderUuid,
    pub status: GatewayStatus,
    /// Gateway reference for the payment (`pf_payment_id`).
    pub gateway_reference: Option<String>,
    /// Amount the shopper paid (`amount_gross`), in minor units.
    pub amount_gross: Option<u64>,
}

impl PaymentNotification {
    /// Read a notification from its form fields.
    ///
    /// # Errors
    ///
    /// Returns an error when `m_payment_id` or `payment_status` is missing or
    /// any recognised field is malformed.
    pub fn from_params(params: &[(String, String)]) -> Result<Self, PaymentsServiceError> {
        let order = field(params, "m_payment_id")
            .ok_or(PaymentsServiceError::MissingField("m_payment_id"))?
            .parse()
            .map_err(|_| PaymentsServiceError::InvalidField("m_payment_id"))?;

        let status = field(params, "payment_status")
            .ok_or(PaymentsServiceError::MissingField("payment_status"))?
            .parse()
            .map_err(|_| PaymentsServiceError::InvalidField("payment_status"))?;

        let amount_gross = field(params, "amount_gross")
            .map(|amount| {
                Decimal::from_str(amount)
                    .ok()
                    .and_then(money::from_decimal)
                    .ok_or(PaymentsServiceError::InvalidField("amount_gross"))
            })
            .transpose()?;

        Ok(Self {
            order,
            status,
            gateway_reference: field(params, "pf_payment_id").map(str::to_string),
            amount_gross,
        })
    }
}

/// First non-empty value of `name`.
pub(crate) fn field<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// What a notification does to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Move the order to these statuses.
    Apply {
        status: OrderStatus,
        payment_status: PaymentStatus,
    },

    /// The order already reflects the notification.
    Duplicate,

    /// Nothing to record: the payment is still pending, or it already
    /// completed and a later failure must not undo that.
    Ignore,
}

/// Decide how a notification applies to an order in the given state.
///
/// A completed payment moves a pending order to paid. A cancelled payment
/// cancels a pending order. Failed and cancelled payments both record a
/// failed payment. Orders past pending keep their fulfilment status.
#[must_use]
pub fn resolve(
    status: OrderStatus,
    payment_status: PaymentStatus,
    notification: GatewayStatus,
) -> Resolution {
    let (next_status, next_payment_status) = match notification {
        GatewayStatus::Pending => return Resolution::Ignore,
        GatewayStatus::Complete => (
            if status == OrderStatus::Pending {
                OrderStatus::Paid
            } else {
                status
            },
            PaymentStatus::Completed,
        ),
        GatewayStatus::Failed | GatewayStatus::Cancelled
            if payment_status == PaymentStatus::Completed =>
        {
            return Resolution::Ignore;
        }
        GatewayStatus::Failed => (status, PaymentStatus::Failed),
        GatewayStatus::Cancelled => (
            if status == OrderStatus::Pending {
                OrderStatus::Cancelled
            } else {
                status
            },
            PaymentStatus::Failed,
        ),
    };

    if next_status == status && next_payment_status == payment_status {
        return Resolution::Duplicate;
    }

    Resolution::Apply {
        status: next_status,
        payment_status: next_payment_status,
    }
}
