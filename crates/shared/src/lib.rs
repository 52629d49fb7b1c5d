//! Shared types, errors, and configuration for MazERP.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{AccountKind, Claims};
pub use config::{AppConfig, CorsConfig, DatabaseConfig, JwtConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
