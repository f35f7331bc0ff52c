//! Money
//!
//! Prices travel as integer minor units (cents). These helpers turn them into
//! display money and fixed two-place decimal strings.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Currency the shop trades in.
pub const CURRENCY: &Currency = iso::ZAR;

/// Amount in minor units of [`CURRENCY`].
pub type MinorUnits = u64;

/// Decimal places of [`CURRENCY`].
const MINOR_EXPONENT: u32 = 2;

/// Convert minor units into money in the shop currency.
#[must_use]
pub fn from_minor(amount: MinorUnits) -> Money<'static, Currency> {
    Money::from_minor(i64::try_from(amount).unwrap_or(i64::MAX), CURRENCY)
}

/// Decimal value of an amount, e.g. `16000` becomes `160.00`.
#[must_use]
pub fn to_decimal(amount: MinorUnits) -> Decimal {
    *from_minor(amount).amount()
}

/// Fixed two-place representation used on the wire to the payment gateway.
#[must_use]
pub fn to_fixed(amount: MinorUnits) -> String {
    let mut value = to_decimal(amount);

    value.rescale(MINOR_EXPONENT);

    value.to_string()
}

/// Minor units of a decimal amount such as `49.99`.
///
/// Returns `None` for negative amounts and amounts finer than one cent.
#[must_use]
pub fn from_decimal(amount: Decimal) -> Option<MinorUnits> {
    let minor = amount.checked_mul(Decimal::from(10_u64.pow(MINOR_EXPONENT)))?;

    if minor < Decimal::ZERO || !minor.fract().is_zero() {
        return None;
    }

    minor.to_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_decimal_uses_currency_exponent() {
        assert_eq!(to_decimal(16_000), Decimal::new(160, 0));
        assert_eq!(to_decimal(1_999), Decimal::new(1_999, 2));
    }

    #[test]
    fn to_fixed_always_has_two_places() {
        assert_eq!(to_fixed(16_000), "160.00");
        assert_eq!(to_fixed(5), "0.05");
        assert_eq!(to_fixed(0), "0.00");
    }

    #[test]
    fn from_decimal_accepts_whole_cents_only() {
        assert_eq!(from_decimal(Decimal::new(4_999, 2)), Some(4_999));
        assert_eq!(from_decimal(Decimal::new(25, 0)), Some(2_500));
        assert_eq!(from_decimal(Decimal::new(1_001, 3)), None);
        assert_eq!(from_decimal(Decimal::new(-1, 0)), None);
    }
}
