//! # Factory System for Conversion Testing
//!
//! Builder-style factories for leads and accounts. `build()` returns the
//! model; `create()` writes it through a committed store transaction, so the
//! same factories seed both the in-memory and the PostgreSQL store.
//!
//! ```rust,ignore
//! let lead = LeadFactory::new()
//!     .with_company("Acme")
//!     .with_email("a@acme.com")
//!     .create(&store)
//!     .await?;
//! ```

pub mod accounts;
pub mod base;
pub mod leads;
