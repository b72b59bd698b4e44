#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Lead Conversion
//!
//! Atomic promotion of a CRM lead into an account, a contact and optionally
//! an opportunity.
//!
//! ## Overview
//!
//! A conversion creates one to three documents and marks the lead converted
//! in a single store transaction. Either every document becomes visible or
//! none does, and a lead is converted at most once even when several callers
//! race on it: the lead update is conditional on `converted == false`, and a
//! caller that loses that race gets `AlreadyConverted` after one reload.
//!
//! ## Module Organization
//!
//! - [`conversion`] - Service, policy, payload factories and transaction coordinator
//! - [`state_machine`] - Lead statuses, events, guards and the conversion transition
//! - [`persistence`] - Transactional document store traits, in-memory and PostgreSQL stores
//! - [`models`] - Lead, account, contact and opportunity documents
//! - [`authorization`] - Caller permission gate
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Conversion error taxonomy
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lead_conversion::authorization::LeadOwnerGate;
//! use lead_conversion::config::ConversionConfig;
//! use lead_conversion::conversion::{ConversionOptions, LeadConversionService};
//! use lead_conversion::persistence::InMemoryStore;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # async fn example(lead_id: Uuid, caller_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let service = LeadConversionService::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(LeadOwnerGate),
//!     ConversionConfig::default(),
//! );
//!
//! let created = service
//!     .convert(lead_id, caller_id, &ConversionOptions::full())
//!     .await?;
//! println!("account {:?}, contact {:?}", created.account_id, created.contact_id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! DATABASE_URL=postgresql://localhost/lead_conversion_test cargo test -- --ignored
//! ```

pub mod authorization;
pub mod config;
pub mod constants;
pub mod conversion;
#[cfg(feature = "postgres")]
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod state_machine;

pub use authorization::{AllowAll, AuthorizationGate, FnGate, LeadOwnerGate};
pub use config::{ConversionConfig, DatabaseConfig, LeadConversionConfig, LoggingConfig};
pub use conversion::{
    ConversionOptions, ConvertedEntities, LeadConversionService, OpportunityOverrides,
};
pub use error::{ConversionError, ConversionErrorKind, ConversionResult};
pub use models::{Account, Address, Contact, Lead, Opportunity, OpportunityStage};
pub use persistence::{
    Collection, Document, InMemoryStore, PersistenceStore, StoreError, StoreResult, Txn,
};
pub use state_machine::{LeadEvent, LeadStateMachine, LeadStatus};
