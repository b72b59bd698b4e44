use super::states::LeadStatus;
use crate::constants::events;
use serde::{Deserialize, Serialize};

/// Events that can move a lead through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LeadEvent {
    MarkContacted,
    Qualify,
    Disqualify,
    /// Send the lead back to `New`
    Reopen,
    /// Only applied by the conversion transaction
    Convert,
}

impl LeadEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MarkContacted => "mark_contacted",
            Self::Qualify => "qualify",
            Self::Disqualify => "disqualify",
            Self::Reopen => "reopen",
            Self::Convert => "convert",
        }
    }

    /// Lifecycle event name published for this transition
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MarkContacted => events::LEAD_MARKED_CONTACTED,
            Self::Qualify => events::LEAD_QUALIFIED,
            Self::Disqualify => events::LEAD_DISQUALIFIED,
            Self::Reopen => events::LEAD_REOPENED,
            Self::Convert => events::LEAD_CONVERTED,
        }
    }

    /// Status the event leads to
    pub fn target_status(&self) -> LeadStatus {
        match self {
            Self::MarkContacted => LeadStatus::Contacted,
            Self::Qualify | Self::Convert => LeadStatus::Qualified,
            Self::Disqualify => LeadStatus::Unqualified,
            Self::Reopen => LeadStatus::New,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Convert)
    }
}
