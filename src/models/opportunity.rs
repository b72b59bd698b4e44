use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pipeline stage of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpportunityStage {
    #[default]
    Prospecting,
    Qualification,
    NeedsAnalysis,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }

    /// Win probability (percent) assumed for the stage when none is given
    pub fn default_probability(&self) -> u8 {
        match self {
            Self::Prospecting => 10,
            Self::Qualification => 20,
            Self::NeedsAnalysis => 40,
            Self::Proposal => 60,
            Self::Negotiation => 80,
            Self::ClosedWon => 100,
            Self::ClosedLost => 0,
        }
    }
}

impl fmt::Display for OpportunityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prospecting => write!(f, "Prospecting"),
            Self::Qualification => write!(f, "Qualification"),
            Self::NeedsAnalysis => write!(f, "NeedsAnalysis"),
            Self::Proposal => write!(f, "Proposal"),
            Self::Negotiation => write!(f, "Negotiation"),
            Self::ClosedWon => write!(f, "ClosedWon"),
            Self::ClosedLost => write!(f, "ClosedLost"),
        }
    }
}

impl std::str::FromStr for OpportunityStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prospecting" => Ok(Self::Prospecting),
            "Qualification" => Ok(Self::Qualification),
            "NeedsAnalysis" => Ok(Self::NeedsAnalysis),
            "Proposal" => Ok(Self::Proposal),
            "Negotiation" => Ok(Self::Negotiation),
            "ClosedWon" => Ok(Self::ClosedWon),
            "ClosedLost" => Ok(Self::ClosedLost),
            _ => Err(format!("Invalid opportunity stage: {s}")),
        }
    }
}

/// A pipeline record tied to the account and contact created with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub account_id: Uuid,
    pub contact_id: Uuid,
    pub name: String,
    pub amount: Option<f64>,
    pub stage: OpportunityStage,
    pub probability: u8,
    pub close_date: NaiveDate,
    pub lead_source: Option<String>,
    pub created_at: DateTime<Utc>,
}
