//! Checkout
//!
//! Validates the checkout form and turns the cart into an order request.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{cart::CartItem, money::MinorUnits};

/// Where an order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Checkout form as submitted by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: ShippingAddress,
}

/// Checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Name,
    Email,
    Phone,
    Street,
    City,
    PostalCode,
    Country,
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Street => "street",
            Self::City => "city",
            Self::PostalCode => "postal_code",
            Self::Country => "country",
        })
    }
}

/// A single invalid form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: &'static str,
}

/// Reasons checkout cannot proceed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// One or more form fields failed validation.
    #[error("{} checkout field(s) invalid", .0.len())]
    InvalidFields(Vec<FieldError>),

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

impl CheckoutDetails {
    /// Check every required field, reporting all failures at once.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidFields`] listing each invalid field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            (CheckoutField::Name, &self.name),
            (CheckoutField::Phone, &self.phone),
            (CheckoutField::Street, &self.address.street),
            (CheckoutField::City, &self.address.city),
            (CheckoutField::PostalCode, &self.address.postal_code),
            (CheckoutField::Country, &self.address.country),
        ];

        let mut errors: Vec<FieldError> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError {
                field,
                message: "is required",
            })
            .collect();

        if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: CheckoutField::Email,
                message: "is required",
            });
        } else if !looks_like_email(self.email.trim()) {
            errors.push(FieldError {
                field: CheckoutField::Email,
                message: "is not a valid email address",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::InvalidFields(errors))
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraftItem {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

/// Order request body for the storefront API. Prices are resolved by the
/// server; `estimated_total` is what the shopper saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub items: Vec<OrderDraftItem>,
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing)]
    pub estimated_total: MinorUnits,
}

/// Build an order request from the cart and checkout form.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, otherwise any form
/// validation failure.
pub fn prepare_order(
    items: &[CartItem],
    details: &CheckoutDetails,
) -> Result<OrderDraft, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    details.validate()?;

    Ok(OrderDraft {
        items: items
            .iter()
            .map(|item| OrderDraftItem {
                product_uuid: item.product_uuid,
                quantity: item.qty,
            })
            .collect(),
        shipping_address: details.address.clone(),
        estimated_total: items
            .iter()
            .fold(0, |total: MinorUnits, item| total.saturating_add(item.line_total())),
    })
}
