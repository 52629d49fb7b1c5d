//! Input validation for reference entities.

use rust_decimal::Decimal;

use super::error::CatalogError;
use super::types::{InventoryInput, ProductInput, WarehouseInput};

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LEN: usize = 40;
/// Maximum warehouse name length.
pub const MAX_WAREHOUSE_NAME_LEN: usize = 30;
/// Maximum warehouse description length.
pub const MAX_WAREHOUSE_DESCRIPTION_LEN: usize = 255;

fn required_name(field: &str, value: &str, max: usize) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Invalid(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(CatalogError::Invalid(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Validates a product.
///
/// # Errors
///
/// `Invalid` for a blank or overlong name, or a negative price.
pub fn validate_product(input: ProductInput) -> Result<ProductInput, CatalogError> {
    let name = required_name("name", &input.name, MAX_PRODUCT_NAME_LEN)?;
    if input.sell_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(CatalogError::Invalid(
            "sell_price must not be negative".to_string(),
        ));
    }
    Ok(ProductInput {
        name,
        sell_price: input.sell_price,
    })
}

/// Validates a warehouse.
///
/// # Errors
///
/// `Invalid` for a blank or overlong name, or an overlong description.
pub fn validate_warehouse(input: WarehouseInput) -> Result<WarehouseInput, CatalogError> {
    let name = required_name("name", &input.name, MAX_WAREHOUSE_NAME_LEN)?;
    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_WAREHOUSE_DESCRIPTION_LEN)
    {
        return Err(CatalogError::Invalid(format!(
            "description must be at most {MAX_WAREHOUSE_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(WarehouseInput { name, description })
}

/// Validates an inventory line.
///
/// # Errors
///
/// `Invalid` when stock or a threshold is negative.
pub fn validate_inventory(input: &InventoryInput) -> Result<(), CatalogError> {
    if input.stock < 0 {
        return Err(CatalogError::Invalid("stock must not be negative".to_string()));
    }
    for (field, value) in [
        ("alert_stock", input.alert_stock),
        ("warning_stock", input.warning_stock),
    ] {
        if value.is_some_and(|v| v < 0) {
            return Err(CatalogError::Invalid(format!("{field} must not be negative")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerp_shared::types::{ProductId, WarehouseId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_name_rules() {
        let ok = validate_product(ProductInput {
            name: "  Yerba 1kg ".to_string(),
            sell_price: Some(dec!(12.5)),
        })
        .unwrap();
        assert_eq!(ok.name, "Yerba 1kg");

        assert!(validate_product(ProductInput {
            name: " ".to_string(),
            sell_price: None
        })
        .is_err());
        assert!(validate_product(ProductInput {
            name: "x".repeat(41),
            sell_price: None
        })
        .is_err());
        assert!(validate_product(ProductInput {
            name: "ok".to_string(),
            sell_price: Some(dec!(-1))
        })
        .is_err());
    }

    #[test]
    fn test_warehouse_rules() {
        let ok = validate_warehouse(WarehouseInput {
            name: "Central".to_string(),
            description: Some(String::new()),
        })
        .unwrap();
        assert_eq!(ok.description, None);

        assert!(validate_warehouse(WarehouseInput {
            name: "x".repeat(31),
            description: None
        })
        .is_err());
        assert!(validate_warehouse(WarehouseInput {
            name: "ok".to_string(),
            description: Some("d".repeat(256))
        })
        .is_err());
    }

    #[test]
    fn test_inventory_rules() {
        let mut input = InventoryInput {
            warehouse_id: WarehouseId::new(1),
            product_id: ProductId::new(1),
            stock: 0,
            alert_stock: Some(2),
            warning_stock: None,
        };
        assert!(validate_inventory(&input).is_ok());
        input.stock = -1;
        assert!(validate_inventory(&input).is_err());
        input.stock = 1;
        input.warning_stock = Some(-5);
        assert!(validate_inventory(&input).is_err());
    }
}
