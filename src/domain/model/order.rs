use crate::domain::schema::{Schema, ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Fixed tax multiplier applied to every order (1.2).
pub const TAX_MULTIPLIER: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// `price × quantity × 1.2`, exact.
///
/// A total too large for `Decimal` is reported against `quantity`, the only client-chosen factor.
pub fn order_total(price: Decimal, quantity: i32) -> Result<Decimal, ValidationError> {
    price
        .checked_mul(Decimal::from(quantity))
        .and_then(|subtotal| subtotal.checked_mul(TAX_MULTIPLIER))
        .ok_or_else(|| {
            ValidationError::single(
                "quantity",
                "range",
                "order total exceeds the largest representable amount",
            )
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /orders`. Any client-supplied `total` is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewOrder {
    pub user_id: i64,
    pub product_id: i64,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub quantity: i32,
}

impl Schema for NewOrder {
    const REQUIRED: &'static [&'static str] = &["user_id", "product_id", "quantity"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OrderPatch {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub quantity: Option<i32>,
}

impl Schema for OrderPatch {
    const REQUIRED: &'static [&'static str] = &[];
}

impl OrderPatch {
    /// True when the patch changes something the total is derived from.
    pub fn affects_total(&self) -> bool {
        self.product_id.is_some() || self.quantity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn total_applies_tax_exactly() {
        assert_eq!(order_total(dec("10.00"), 2).unwrap(), dec("24.00"));
        assert_eq!(order_total(dec("9.99"), 3).unwrap(), dec("35.964"));
        assert_eq!(order_total(dec("0.10"), 1).unwrap(), dec("0.12"));
    }

    #[test]
    fn oversized_total_is_a_quantity_error() {
        let err = order_total(dec("100000000000000000000"), 1_000_000_000).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "quantity");
        assert_eq!(err.errors[0].constraint, "range");

        // The tax step alone can overflow too.
        let err = order_total(Decimal::MAX, 1).unwrap_err();
        assert_eq!(err.errors[0].field, "quantity");
    }

    #[test]
    fn tax_multiplier_is_one_point_two() {
        assert_eq!(TAX_MULTIPLIER, dec("1.2"));
    }

    #[test]
    fn affects_total_only_for_price_inputs() {
        assert!(!OrderPatch { user_id: Some(3), ..Default::default() }.affects_total());
        assert!(OrderPatch { quantity: Some(3), ..Default::default() }.affects_total());
        assert!(OrderPatch { product_id: Some(3), ..Default::default() }.affects_total());
    }
}
