//! # Models
//!
//! Documents the conversion pipeline reads and writes. Every model
//! round-trips through a [`Document`](crate::persistence::Document) via serde;
//! field names are the stored JSON keys.

pub mod account;
pub mod address;
pub mod contact;
pub mod lead;
pub mod opportunity;

pub use account::Account;
pub use address::Address;
pub use contact::Contact;
pub use lead::Lead;
pub use opportunity::{Opportunity, OpportunityStage};

/// Trims a value and treats an all-whitespace string as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
