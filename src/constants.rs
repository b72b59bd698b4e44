//! # System Constants
//!
//! Collection names, document field names and default values shared by the
//! conversion pipeline and the store implementations.

/// Lifecycle events recorded when a lead changes state
pub mod events {
    pub const LEAD_MARKED_CONTACTED: &str = "lead.marked_contacted";
    pub const LEAD_QUALIFIED: &str = "lead.qualified";
    pub const LEAD_DISQUALIFIED: &str = "lead.disqualified";
    pub const LEAD_REOPENED: &str = "lead.reopened";
    pub const LEAD_CONVERTED: &str = "lead.converted";
}

/// Document field names the conversion guard and patch are written against
pub mod fields {
    pub const ID: &str = "id";
    pub const STATUS: &str = "status";
    pub const CONVERTED: &str = "converted";
    pub const CONVERTED_AT: &str = "converted_at";
    pub const CONVERTED_ACCOUNT_ID: &str = "converted_account_id";
    pub const CONVERTED_CONTACT_ID: &str = "converted_contact_id";
    pub const CONVERTED_OPPORTUNITY_ID: &str = "converted_opportunity_id";
    pub const UPDATED_AT: &str = "updated_at";
}

/// Defaults applied when configuration omits a value
pub mod defaults {
    pub const DATABASE_URL: &str = "postgresql://localhost/lead_conversion_development";
    pub const MAX_CONNECTIONS: u32 = 10;
    pub const ACQUIRE_TIMEOUT_MS: u64 = 5_000;
    pub const TRANSACTION_TIMEOUT_MS: u64 = 10_000;
    pub const OPPORTUNITY_CLOSE_WINDOW_DAYS: u32 = 30;
    pub const LOG_LEVEL: &str = "info";
}

/// A conflicting commit is re-validated and retried this many times, never more.
pub const CONFLICT_RETRY_LIMIT: u32 = 1;

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "LEAD_CONVERSION";

/// Environment variable naming an optional configuration file
pub const CONFIG_PATH_ENV: &str = "LEAD_CONVERSION_CONFIG";
