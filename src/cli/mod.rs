//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `migrate` - Database migrations
//! - `seed` - Default data seeding

pub mod args;

pub use args::{Cli, Commands};
