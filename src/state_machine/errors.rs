use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateMachineError {
    #[error("Guard condition failed: {reason}")]
    GuardFailed { reason: String },

    #[error("Invalid lead transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Lead {lead_id} has already been converted")]
    AlreadyConverted { lead_id: Uuid },

    #[error("Lead invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardError {
    #[error("Lead {lead_id} has already been converted")]
    AlreadyConverted { lead_id: Uuid },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}

impl From<GuardError> for StateMachineError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::AlreadyConverted { lead_id } => Self::AlreadyConverted { lead_id },
            GuardError::BusinessRuleViolation { .. } => Self::GuardFailed {
                reason: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for StateMachineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type GuardResult<T> = Result<T, GuardError>;

/// Helper function to create business rule violations
pub fn business_rule_violation(rule: impl Into<String>) -> GuardError {
    GuardError::BusinessRuleViolation { rule: rule.into() }
}
