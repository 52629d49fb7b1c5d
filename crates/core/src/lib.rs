//! Core business logic for MazERP.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the storage port live here.
//!
//! # Modules
//!
//! - `movement` - Movements, their buy/sell/expense owners, and the integrity guard
//! - `catalog` - Products, warehouses and inventory lines
//! - `auth` - Credentials and password hashing

pub mod auth;
pub mod catalog;
pub mod movement;
