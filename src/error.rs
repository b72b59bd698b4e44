//! Error types for lead conversion.
//!
//! Every failure `convert` can report is a [`ConversionError`]. The HTTP layer
//! maps [`ConversionErrorKind`] values to status codes; the core only promises
//! that no error leaves a lead or a created entity half-converted.

use crate::state_machine::StateMachineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Classification of a [`ConversionError`], stable across variants' payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionErrorKind {
    NotFound,
    Forbidden,
    AlreadyConverted,
    InvalidOptions,
    MissingRequiredField,
    InvalidTransition,
    ConcurrentConversionConflict,
    StoreUnavailable,
    ConstraintViolation,
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::AlreadyConverted => "already_converted",
            Self::InvalidOptions => "invalid_options",
            Self::MissingRequiredField => "missing_required_field",
            Self::InvalidTransition => "invalid_transition",
            Self::ConcurrentConversionConflict => "concurrent_conversion_conflict",
            Self::StoreUnavailable => "store_unavailable",
            Self::ConstraintViolation => "constraint_violation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Lead {lead_id} not found")]
    NotFound { lead_id: Uuid },

    #[error("Caller {caller_id} is not allowed to convert lead {lead_id}")]
    Forbidden { caller_id: Uuid, lead_id: Uuid },

    #[error("Lead {lead_id} has already been converted")]
    AlreadyConverted { lead_id: Uuid },

    #[error("Invalid conversion options: {reason}")]
    InvalidOptions { reason: String },

    #[error("Lead {lead_id} is missing '{field}', required to create {entity}")]
    MissingRequiredField {
        lead_id: Uuid,
        field: &'static str,
        entity: &'static str,
    },

    #[error("Invalid lead transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("Lead {lead_id} was modified by a concurrent conversion")]
    ConcurrentConversionConflict { lead_id: Uuid },

    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Constraint violation: {reason}")]
    ConstraintViolation { reason: String },
}

impl ConversionError {
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            Self::NotFound { .. } => ConversionErrorKind::NotFound,
            Self::Forbidden { .. } => ConversionErrorKind::Forbidden,
            Self::AlreadyConverted { .. } => ConversionErrorKind::AlreadyConverted,
            Self::InvalidOptions { .. } => ConversionErrorKind::InvalidOptions,
            Self::MissingRequiredField { .. } => ConversionErrorKind::MissingRequiredField,
            Self::InvalidTransition { .. } => ConversionErrorKind::InvalidTransition,
            Self::ConcurrentConversionConflict { .. } => {
                ConversionErrorKind::ConcurrentConversionConflict
            }
            Self::StoreUnavailable { .. } => ConversionErrorKind::StoreUnavailable,
            Self::ConstraintViolation { .. } => ConversionErrorKind::ConstraintViolation,
        }
    }

    /// Whether the caller may safely run the whole operation again.
    ///
    /// Nothing is committed on any error path, so retrying after a store
    /// outage or a lost race cannot duplicate entities.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ConversionErrorKind::StoreUnavailable
                | ConversionErrorKind::ConcurrentConversionConflict
        )
    }

    pub fn invalid_options(reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            reason: reason.into(),
        }
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    pub fn constraint_violation(reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            reason: reason.into(),
        }
    }
}

impl From<StateMachineError> for ConversionError {
    fn from(err: StateMachineError) -> Self {
        match err {
            StateMachineError::AlreadyConverted { lead_id } => Self::AlreadyConverted { lead_id },
            StateMachineError::InvalidTransition { .. } | StateMachineError::GuardFailed { .. } => {
                Self::InvalidTransition {
                    reason: err.to_string(),
                }
            }
            StateMachineError::InvariantViolation { .. } | StateMachineError::Serialization(_) => {
                Self::ConstraintViolation {
                    reason: err.to_string(),
                }
            }
        }
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
