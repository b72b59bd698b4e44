//! # Structured Logging Module
//!
//! Structured logging for the conversion pipeline. Output is human-readable
//! by default or JSON lines when [`LoggingConfig::json`] is set; the filter
//! comes from `RUST_LOG` when present, otherwise from the configured level.

use crate::config::LoggingConfig;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Safe to call more than once.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

        let (plain, json) = if config.json {
            (
                None,
                Some(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                ),
            )
        } else {
            (
                Some(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                ),
                None,
            )
        };

        // Another library (or a test harness) may already own the global subscriber
        if tracing_subscriber::registry()
            .with(filter)
            .with(plain)
            .with(json)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            level = %config.level,
            json = config.json,
            "structured logging initialized"
        );
    });
}

/// Log the outcome of a lead operation
pub fn log_conversion_operation(
    operation: &str,
    lead_id: Uuid,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        lead_id = %lead_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "LEAD_OPERATION"
    );
}

/// Log a store-level transaction event
pub fn log_store_operation(
    operation: &str,
    collection: Option<&str>,
    record_id: Option<Uuid>,
    status: &str,
    duration_ms: Option<u64>,
) {
    tracing::debug!(
        operation = %operation,
        collection = collection,
        record_id = ?record_id,
        status = %status,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "STORE_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, lead_id: Option<Uuid>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        lead_id = ?lead_id,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
