//! # Database Migration System
//!
//! Migrations live in the crate's `migrations/` directory using the
//! `YYYYMMDDHHMMSS_description.sql` naming convention and are embedded at
//! compile time. sqlx's migrator takes a PostgreSQL advisory lock while it
//! runs, so concurrent callers (parallel test binaries, several service
//! instances starting together) apply each migration exactly once.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies the embedded CRM document schema.
pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Run all pending migrations in order
    pub async fn run_all(pool: &PgPool) -> Result<(), MigrateError> {
        MIGRATOR.run(pool).await?;
        tracing::info!(
            migrations = MIGRATOR.iter().count(),
            "database schema is up to date"
        );
        Ok(())
    }

    pub fn migrator() -> &'static Migrator {
        &MIGRATOR
    }
}
