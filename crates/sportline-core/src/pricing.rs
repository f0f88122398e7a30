//! # Pricing
//!
//! Order and sale totals, computed once at creation and stored on the header.
//!
//! ```text
//! subtotal = Σ (quantity × unit_price)
//! tax      = subtotal × 13%           (rounded half up to the cent)
//! shipping = 10.00                    (online orders only)
//! total    = subtotal + shipping + tax
//! ```
//!
//! Every sum and product is checked. Lines that passed
//! [`validate_lines`](crate::validation::validate_lines) never overflow, but
//! unvalidated input gets an `OutOfRange` error instead of a panic.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineInput, TaxRate};
use crate::validation::ValidationResult;

/// VAT applied to orders and POS sales (13%).
pub const SALES_TAX_RATE: TaxRate = TaxRate::from_bps(1300);

/// Flat shipping cost charged on every online order.
pub const SHIPPING_COST: Money = Money::from_cents(1000);

/// Totals of an online order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

/// Totals of a POS sale (no shipping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

/// Line total before discounts: quantity × unit price.
#[inline]
pub fn line_total(line: &LineInput) -> ValidationResult<Money> {
    line.unit_price
        .checked_multiply_quantity(line.quantity)
        .ok_or_else(|| overflow("line_total"))
}

pub fn subtotal(lines: &[LineInput]) -> ValidationResult<Money> {
    lines.iter().try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line_total(line)?)
            .ok_or_else(|| overflow("subtotal"))
    })
}

/// Prices an online order.
///
/// ## Example
/// ```rust
/// use sportline_core::money::Money;
/// use sportline_core::pricing::order_totals;
/// use sportline_core::types::LineInput;
///
/// let totals = order_totals(&[LineInput {
///     product_id: 1,
///     quantity: 2,
///     unit_price: Money::from_cents(1000),
/// }]).unwrap();
/// assert_eq!(totals.total.to_string(), "32.60");
/// ```
pub fn order_totals(lines: &[LineInput]) -> ValidationResult<OrderTotals> {
    let subtotal = subtotal(lines)?;
    let tax = subtotal.calculate_tax(SALES_TAX_RATE);
    let shipping = SHIPPING_COST;
    let total = subtotal
        .checked_add(shipping)
        .and_then(|m| m.checked_add(tax))
        .ok_or_else(|| overflow("total"))?;

    Ok(OrderTotals {
        subtotal,
        shipping,
        tax,
        total,
    })
}

/// Prices a POS sale.
pub fn sale_totals(lines: &[LineInput]) -> ValidationResult<SaleTotals> {
    let subtotal = subtotal(lines)?;
    let tax = subtotal.calculate_tax(SALES_TAX_RATE);
    let total = subtotal.checked_add(tax).ok_or_else(|| overflow("total"))?;

    Ok(SaleTotals {
        subtotal,
        tax,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(product_id: i64, quantity: i64, cents: i64) -> LineInput {
        LineInput {
            product_id,
            quantity,
            unit_price: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_single_line_order() {
        let totals = order_totals(&[line(1, 2, 1000)]).unwrap();
        assert_eq!(totals.subtotal.cents(), 2000);
        assert_eq!(totals.tax.cents(), 260);
        assert_eq!(totals.shipping.cents(), 1000);
        assert_eq!(totals.total.cents(), 3260);
    }

    #[test]
    fn test_multi_line_order() {
        // 3 × 19.99 + 1 × 45.50 = 105.47; tax 13.7111 → 13.71
        let totals = order_totals(&[line(1, 3, 1999), line(2, 1, 4550)]).unwrap();
        assert_eq!(totals.subtotal.cents(), 10547);
        assert_eq!(totals.tax.cents(), 1371);
        assert_eq!(totals.total.cents(), 10547 + 1000 + 1371);
    }

    #[test]
    fn test_sale_has_no_shipping() {
        let totals = sale_totals(&[line(1, 2, 1000)]).unwrap();
        assert_eq!(totals.total.cents(), 2260);
    }

    #[test]
    fn test_free_items_still_pay_shipping() {
        let totals = order_totals(&[line(9, 1, 0)]).unwrap();
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, SHIPPING_COST);
    }

    #[test]
    fn test_overflowing_line_is_an_error() {
        let huge = Money::parse_decimal("unit_price", "92233720368547758").unwrap();
        let lines = [LineInput {
            product_id: 1,
            quantity: 2,
            unit_price: huge,
        }];

        assert!(matches!(
            order_totals(&lines),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "line_total"
        ));
        assert!(sale_totals(&lines).is_err());
    }

    #[test]
    fn test_overflowing_subtotal_is_an_error() {
        let half = i64::MAX / 2 + 1;
        let lines = [line(1, 1, half), line(2, 1, half)];
        assert!(matches!(
            subtotal(&lines),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "subtotal"
        ));
    }

    proptest! {
        #[test]
        fn prop_order_total_is_sum_of_parts(
            raw in prop::collection::vec((1i64..500, 1i64..50, 0i64..100_000), 1..20)
        ) {
            let lines: Vec<LineInput> = raw
                .iter()
                .map(|&(p, q, c)| line(p, q, c))
                .collect();
            let totals = order_totals(&lines).unwrap();

            prop_assert_eq!(totals.total, totals.subtotal + totals.shipping + totals.tax);
            prop_assert_eq!(totals.shipping, SHIPPING_COST);
            prop_assert!(!totals.tax.is_negative());
            prop_assert!(totals.tax <= totals.subtotal);
        }

        #[test]
        fn prop_sale_total_is_subtotal_plus_tax(
            raw in prop::collection::vec((1i64..500, 1i64..50, 0i64..100_000), 1..20)
        ) {
            let lines: Vec<LineInput> = raw
                .iter()
                .map(|&(p, q, c)| line(p, q, c))
                .collect();
            let totals = sale_totals(&lines).unwrap();
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
    }
}
