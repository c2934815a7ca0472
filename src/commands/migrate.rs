//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_error(e: sea_orm::DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {e}"))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Migrations are driven by the chosen action here, so skip the
    // automatic run that connect() performs
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {e}")))?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Applying pending migrations");
            db.run_migrations().await.map_err(migration_error)?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back the last migration");
            db.rollback_migration().await.map_err(migration_error)?;
            tracing::info!("Rollback complete");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_error)?;
            for (name, applied) in status {
                println!("{}: {}", name, if applied { "applied" } else { "pending" });
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await.map_err(migration_error)?;
            tracing::info!("Fresh schema ready");
        }
    }

    Ok(())
}
