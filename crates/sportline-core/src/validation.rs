//! # Validation Module
//!
//! Checks run on order, sale and adjustment input before any database work.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP extractors (apps/api)                                   │
//! │  └── JSON shape, wire enum names                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── lines non-empty, qty ≥ 1, price ≥ 0, shipping fields present      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  └── CHECK (available >= 0), UNIQUE (product_id, branch_id)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{LineInput, ShippingInfo};
use crate::{MAX_LINE_QUANTITY, MAX_LINES, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a required, length-bounded text field.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a database identifier supplied by a caller.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line or adjustment quantity.
///
/// ## Example
/// ```rust
/// use sportline_core::validation::validate_quantity;
///
/// assert!(validate_quantity("quantity", 1).is_ok());
/// assert!(validate_quantity("quantity", 0).is_err());
/// ```
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates the product lines of an order or sale.
///
/// ## Rules
/// - At least one line, at most [`MAX_LINES`]
/// - Positive product id
/// - Quantity between 1 and [`MAX_LINE_QUANTITY`]
/// - Unit price between 0 and [`MAX_UNIT_PRICE_CENTS`]
pub fn validate_lines(lines: &[LineInput]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "lines".to_string(),
        });
    }
    if lines.len() > MAX_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_LINES as i64,
        });
    }

    for (idx, line) in lines.iter().enumerate() {
        validate_id(&format!("lines[{idx}].product_id"), line.product_id)?;
        validate_quantity(&format!("lines[{idx}].quantity"), line.quantity)?;
        if line.unit_price.is_negative() {
            return Err(ValidationError::MustNotBeNegative {
                field: format!("lines[{idx}].unit_price"),
            });
        }
        if line.unit_price.cents() > MAX_UNIT_PRICE_CENTS {
            return Err(ValidationError::OutOfRange {
                field: format!("lines[{idx}].unit_price"),
                min: 0,
                max: MAX_UNIT_PRICE_CENTS,
            });
        }
    }

    Ok(())
}

/// Validates the shipping block of an online order.
pub fn validate_shipping(shipping: &ShippingInfo) -> ValidationResult<()> {
    validate_text("shipping_address", &shipping.address, 300)?;
    validate_text("shipping_city", &shipping.city, 100)?;
    validate_text("shipping_country", &shipping.country, 100)?;
    validate_text("contact_phone", &shipping.phone, 30)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn line(quantity: i64, cents: i64) -> LineInput {
        LineInput {
            product_id: 1,
            quantity,
            unit_price: Money::from_cents(cents),
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            address: "Av. Arce 2131".to_string(),
            city: "La Paz".to_string(),
            country: "Bolivia".to_string(),
            phone: "+591 70000000".to_string(),
        }
    }

    #[test]
    fn test_empty_lines_rejected() {
        let err = validate_lines(&[]).unwrap_err();
        assert_eq!(err.to_string(), "lines must contain at least one item");
    }

    #[test]
    fn test_line_rules() {
        assert!(validate_lines(&[line(1, 0)]).is_ok());
        assert!(validate_lines(&[line(2, 1000), line(1, 1)]).is_ok());

        let err = validate_lines(&[line(1, 100), line(0, 100)]).unwrap_err();
        assert!(err.to_string().starts_with("lines[1].quantity"));

        let err = validate_lines(&[line(1, -1)]).unwrap_err();
        assert_eq!(err.to_string(), "lines[0].unit_price must not be negative");

        let mut bad = line(1, 100);
        bad.product_id = 0;
        assert!(validate_lines(&[bad]).is_err());
    }

    #[test]
    fn test_unit_price_ceiling() {
        assert!(validate_lines(&[line(MAX_LINE_QUANTITY, MAX_UNIT_PRICE_CENTS)]).is_ok());

        let huge = Money::parse_decimal("unit_price", "92233720368547758").unwrap();
        let mut over = line(2, 0);
        over.unit_price = huge;
        let err = validate_lines(&[line(1, 100), over]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, max: MAX_UNIT_PRICE_CENTS, .. }
                if field == "lines[1].unit_price"
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let lines = vec![line(1, 100); MAX_LINES + 1];
        assert!(validate_lines(&lines).is_err());
    }

    #[test]
    fn test_shipping_fields_required() {
        assert!(validate_shipping(&shipping()).is_ok());

        let mut s = shipping();
        s.city = "   ".to_string();
        assert_eq!(
            validate_shipping(&s).unwrap_err().to_string(),
            "shipping_city is required"
        );

        let mut s = shipping();
        s.phone = "9".repeat(31);
        assert!(validate_shipping(&s).is_err());
    }
}
