//! # Persistence
//!
//! The multi-document transactional store the conversion pipeline writes
//! through. Stores expose whole-document inserts and a conditional update
//! (`update_if`) that only applies a patch when the stored document still
//! contains every key/value pair of a condition document. The conversion
//! guard is built on that primitive.
//!
//! Two implementations ship with the crate:
//!
//! - [`memory::InMemoryStore`] - snapshot-isolated in-process store, used by
//!   tests and embedded callers
//! - [`postgres::PgDocumentStore`] - JSONB document tables on PostgreSQL

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use crate::error::ConversionError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub use memory::{FaultPlan, InMemoryStore, InjectedFailure};
#[cfg(feature = "postgres")]
pub use postgres::PgDocumentStore;

/// A stored document: a JSON object keyed by field name
pub type Document = serde_json::Map<String, Value>;

/// Document collections touched by lead conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Leads,
    Accounts,
    Contacts,
    Opportunities,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Leads,
        Collection::Accounts,
        Collection::Contacts,
        Collection::Opportunities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::Accounts => "accounts",
            Self::Contacts => "contacts",
            Self::Opportunities => "opportunities",
        }
    }

    /// Backing table for SQL stores
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Leads => "crm_leads",
            Self::Accounts => "crm_accounts",
            Self::Contacts => "crm_contacts",
            Self::Opportunities => "crm_opportunities",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Constraint violation: {reason}")]
    ConstraintViolation { reason: String },

    #[error("Write conflict: {reason}")]
    WriteConflict { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Classify a store failure raised while working on `lead_id`.
    pub fn into_conversion_error(self, lead_id: Uuid) -> ConversionError {
        match self {
            Self::WriteConflict { .. } => ConversionError::ConcurrentConversionConflict { lead_id },
            Self::ConstraintViolation { .. } | Self::Serialization(_) => {
                ConversionError::constraint_violation(self.to_string())
            }
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::Database(_) => {
                ConversionError::store_unavailable(self.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// An open unit of work. Nothing written through a `Txn` is visible to other
/// readers until [`Txn::commit`] succeeds; dropping a `Txn` without committing
/// discards every write.
#[async_trait]
pub trait Txn: Send {
    /// Insert a new document and return its identifier. A payload carrying an
    /// `id` field keeps that identifier; otherwise the store assigns one.
    async fn insert(&mut self, collection: Collection, payload: Document) -> StoreResult<Uuid>;

    /// Merge `patch` into the document `id` if it still matches `condition`.
    /// Returns whether the patch was applied.
    async fn update_if(
        &mut self,
        collection: Collection,
        id: Uuid,
        condition: &Document,
        patch: Document,
    ) -> StoreResult<bool>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn abort(self: Box<Self>);
}

#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn begin_transaction(&self) -> StoreResult<Box<dyn Txn>>;

    /// Read the committed version of a document, outside any transaction
    async fn fetch(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Document>>;
}

/// True when every key in `condition` is present in `document` with an equal
/// value. A key missing from `document` matches an expected `false`, the
/// default the models deserialize an absent flag to.
pub fn matches_condition(document: &Document, condition: &Document) -> bool {
    condition.iter().all(|(key, expected)| match document.get(key) {
        Some(actual) => actual == expected,
        None => *expected == Value::Bool(false),
    })
}

/// Shallow merge: top-level keys of `patch` replace those in `document`
pub fn merge_patch(document: &mut Document, patch: Document) {
    for (key, value) in patch {
        document.insert(key, value);
    }
}

pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Identifier carried in a payload's `id` field, if any
pub fn document_id(document: &Document) -> StoreResult<Option<Uuid>> {
    match document.get(crate::constants::fields::ID) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("invalid document id '{raw}': {e}"))),
        Some(other) => Err(StoreError::Serialization(format!(
            "document id must be a string, got {other}"
        ))),
    }
}
