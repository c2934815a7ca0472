//! Seed command - Default data seeding.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::db::seed;
use crate::infra::Database;

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding default data...");

    // Migrations must be in place before the seeder can write
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    seed::seed_defaults(db.connection()).await?;
    tracing::info!("Seeding completed successfully");
    Ok(())
}
