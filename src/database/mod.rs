//! # Database Operations
//!
//! PostgreSQL connection management and schema migrations for the
//! [`PgDocumentStore`](crate::persistence::PgDocumentStore).
//!
//! ## Key Components
//!
//! - [`connection`] - Pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig) and health checks
//! - [`migrations`] - Embedded schema migrations for the CRM document tables
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lead_conversion::config::DatabaseConfig;
//! use lead_conversion::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = DatabaseConnection::connect(&DatabaseConfig::default()).await?;
//! DatabaseMigrations::run_all(connection.pool()).await?;
//! assert!(connection.health_check().await?);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{DatabaseMigrations, MIGRATOR};
