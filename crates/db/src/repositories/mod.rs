//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod inventory;
pub mod movement;
pub mod product;
pub mod warehouse;

pub use account::{Account, AccountRepository};
pub use inventory::InventoryRepository;
pub use movement::MovementRepository;
pub use product::ProductRepository;
pub use warehouse::WarehouseRepository;
