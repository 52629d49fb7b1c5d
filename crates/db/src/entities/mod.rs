//! `SeaORM` entity definitions.

pub mod buys;
pub mod clients;
pub mod expenses;
pub mod inventories;
pub mod movements;
pub mod products;
pub mod sea_orm_active_enums;
pub mod sells;
pub mod users;
pub mod warehouses;
