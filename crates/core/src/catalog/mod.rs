//! Products, warehouses and inventory lines.

mod error;
mod types;
pub mod validation;

pub use error::CatalogError;
pub use types::{Inventory, InventoryInput, Product, ProductInput, Warehouse, WarehouseInput};
pub use validation::{validate_inventory, validate_product, validate_warehouse};
