//! Input validation for movements and their children.
//!
//! Runs before any store access, so a rejected request never opens a transaction.

use rust_decimal::Decimal;

use super::error::MovementError;
use super::types::{MovementChild, MovementDraft};

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 225;

/// Decimal places stored for prices.
pub const PRICE_SCALE: u32 = 4;

/// Decimal places stored for discount percentages.
pub const DISCOUNT_SCALE: u32 = 2;

/// Normalizes and validates a draft.
///
/// Blank descriptions become `None`; surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns `ZeroQuantity` or `DescriptionTooLong`.
pub fn validate_draft(mut draft: MovementDraft) -> Result<MovementDraft, MovementError> {
    if draft.quantity == 0 {
        return Err(MovementError::ZeroQuantity);
    }

    draft.description = draft
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if let Some(description) = &draft.description {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(MovementError::DescriptionTooLong {
                len,
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    Ok(draft)
}

/// Validates child-specific numeric constraints.
///
/// # Errors
///
/// Returns `NonPositivePrice`, `DiscountOutOfRange` or `TooManyDecimals`.
pub fn validate_child(child: &MovementChild) -> Result<(), MovementError> {
    match child {
        MovementChild::Buy(buy) => ensure_price("unit_price", buy.unit_price),
        MovementChild::Sell(sell) => {
            ensure_price("sale_price", sell.sale_price)?;
            let discount = sell.discount_percentage;
            if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
                return Err(MovementError::DiscountOutOfRange(discount));
            }
            ensure_scale("discount_percentage", discount, DISCOUNT_SCALE)
        }
        MovementChild::Expense(expense) => ensure_price("total_price", expense.total_price),
    }
}

fn ensure_price(field: &'static str, value: Decimal) -> Result<(), MovementError> {
    if value <= Decimal::ZERO {
        return Err(MovementError::NonPositivePrice { field, value });
    }
    ensure_scale(field, value, PRICE_SCALE)
}

// Trailing zeros do not count: 1.50000 is stored as 1.5000.
fn ensure_scale(field: &'static str, value: Decimal, max: u32) -> Result<(), MovementError> {
    if value.normalize().scale() > max {
        return Err(MovementError::TooManyDecimals { field, value, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::types::{BuyDetails, ExpenseDetails, ExpenseType, SellDetails};
    use chrono::Utc;
    use mazerp_shared::types::InventoryId;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn draft(quantity: i32, description: Option<&str>) -> MovementDraft {
        MovementDraft {
            inventory_id: InventoryId::new(1),
            description: description.map(str::to_string),
            quantity,
            movement_date: Utc::now(),
        }
    }

    fn sell(sale_price: Decimal, discount_percentage: Decimal) -> MovementChild {
        MovementChild::Sell(SellDetails {
            sale_price,
            discount_percentage,
        })
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            validate_draft(draft(0, None)),
            Err(MovementError::ZeroQuantity)
        ));
    }

    #[test]
    fn test_negative_quantity_allowed() {
        assert!(validate_draft(draft(-4, None)).is_ok());
    }

    #[test]
    fn test_blank_description_dropped() {
        let d = validate_draft(draft(1, Some("   "))).unwrap();
        assert_eq!(d.description, None);
        let d = validate_draft(draft(1, Some("  restock "))).unwrap();
        assert_eq!(d.description.as_deref(), Some("restock"));
    }

    #[test]
    fn test_description_length_counts_chars() {
        let max = "é".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_draft(draft(1, Some(&max))).is_ok());
        let over = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(
            validate_draft(draft(1, Some(&over))),
            Err(MovementError::DescriptionTooLong { len: 226, max: 225 })
        ));
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(100), true)]
    #[case(dec!(12.5), true)]
    #[case(dec!(100.01), false)]
    #[case(dec!(150), false)]
    #[case(dec!(-1), false)]
    fn test_discount_bounds(#[case] discount: Decimal, #[case] ok: bool) {
        assert_eq!(validate_child(&sell(dec!(10), discount)).is_ok(), ok);
    }

    #[rstest]
    #[case(MovementChild::Buy(BuyDetails { unit_price: dec!(0.00001) }), "unit_price")]
    #[case(sell(dec!(9.99999), dec!(0)), "sale_price")]
    #[case(sell(dec!(10), dec!(12.345)), "discount_percentage")]
    #[case(
        MovementChild::Expense(ExpenseDetails { expense_type: ExpenseType::Rent, total_price: dec!(1.23456) }),
        "total_price"
    )]
    fn test_excess_scale_rejected(#[case] child: MovementChild, #[case] expected: &str) {
        match validate_child(&child) {
            Err(MovementError::TooManyDecimals { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected TooManyDecimals, got {other:?}"),
        }
    }

    #[rstest]
    #[case(MovementChild::Buy(BuyDetails { unit_price: dec!(0.0001) }))]
    #[case(MovementChild::Buy(BuyDetails { unit_price: dec!(2.500000) }))]
    #[case(sell(dec!(10), dec!(12.35)))]
    fn test_scale_within_column_accepted(#[case] child: MovementChild) {
        assert!(validate_child(&child).is_ok());
    }

    #[rstest]
    #[case(MovementChild::Buy(BuyDetails { unit_price: dec!(0) }), "unit_price")]
    #[case(sell(dec!(-3), dec!(0)), "sale_price")]
    #[case(
        MovementChild::Expense(ExpenseDetails { expense_type: ExpenseType::Rent, total_price: dec!(0) }),
        "total_price"
    )]
    fn test_non_positive_prices(#[case] child: MovementChild, #[case] expected: &str) {
        match validate_child(&child) {
            Err(MovementError::NonPositivePrice { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected NonPositivePrice, got {other:?}"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_positive_unit_price_accepted(cents in 1i64..10_000_000) {
            let child = MovementChild::Buy(BuyDetails { unit_price: Decimal::new(cents, 2) });
            prop_assert!(validate_child(&child).is_ok());
        }

        #[test]
        fn prop_non_positive_unit_price_rejected(cents in -10_000_000i64..=0) {
            let child = MovementChild::Buy(BuyDetails { unit_price: Decimal::new(cents, 2) });
            let rejected = matches!(
                validate_child(&child),
                Err(MovementError::NonPositivePrice { .. })
            );
            prop_assert!(rejected);
        }

        #[test]
        fn prop_discount_in_range_accepted(basis_points in 0i64..=10_000) {
            prop_assert!(validate_child(&sell(dec!(1), Decimal::new(basis_points, 2))).is_ok());
        }

        #[test]
        fn prop_nonzero_quantity_accepted(quantity in any::<i32>().prop_filter("non-zero", |q| *q != 0)) {
            prop_assert!(validate_draft(draft(quantity, Some("x"))).is_ok());
        }
    }
}
