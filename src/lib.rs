//! EAV Backend - user and role management with dynamic attributes
//!
//! This crate provides a user/role management backend whose core is a
//! generic Entity-Attribute-Value subsystem: attributes are declared
//! with a typed schema at runtime, values are stored as strings and
//! coerced to their declared type on read.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and value coercion
//! - **services**: Application use cases and the attribute store
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed default roles, entity types and attributes
//! cargo run -- seed
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Attribute, AttributeType, AttributeValue, EntityType, Role, TypedValue, User};
pub use errors::{AppError, AppResult};
pub use infra::Database;
pub use services::{EavStore, FieldAccess, Services};
