//! Orders
//!
//! Order and payment status values and the rules for moving between them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order counts towards revenue.
    pub fn is_revenue(self) -> bool {
        matches!(self, Self::Paid | Self::Shipped | Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Every status.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Failed];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// A status string that names no known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The customer who placed the order.
    Owner,

    /// A store administrator.
    Admin,
}

/// A status change that is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Only pending orders can be cancelled.
    #[error("only pending orders can be cancelled (order is {0})")]
    NotCancellable(OrderStatus),

    /// Customers may only cancel their own pending orders.
    #[error("only administrators can set order status to {0}")]
    AdminOnly(OrderStatus),
}

/// Cancel an order.
///
/// # Errors
///
/// Returns [`TransitionError::NotCancellable`] unless the order is pending.
pub fn cancel(current: OrderStatus) -> Result<OrderStatus, TransitionError> {
    match current {
        OrderStatus::Pending => Ok(OrderStatus::Cancelled),
        other => Err(TransitionError::NotCancellable(other)),
    }
}

/// Move an order to `next` on behalf of `actor`.
///
/// Only pending orders can be cancelled, by either actor. Every other status
/// is administrator-only.
///
/// # Errors
///
/// Returns an error when `actor` may not make the change.
pub fn transition(
    current: OrderStatus,
    next: OrderStatus,
    actor: Actor,
) -> Result<OrderStatus, TransitionError> {
    match (actor, next) {
        (_, OrderStatus::Cancelled) => cancel(current),
        (Actor::Admin, next) => Ok(next),
        (Actor::Owner, next) => Err(TransitionError::AdminOnly(next)),
    }
}
