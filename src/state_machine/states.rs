use serde::{Deserialize, Serialize};
use std::fmt;

/// Lead lifecycle status.
///
/// All four statuses are non-terminal and reachable from one another. The
/// terminal condition is the separate `converted` flag on the lead, which
/// pins the status to `Qualified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    /// Initial status when a lead is captured
    #[default]
    New,
    /// Someone has reached out to the lead
    Contacted,
    /// The lead is a genuine prospect
    Qualified,
    /// The lead was judged not to be a prospect
    Unqualified,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Unqualified,
    ];

    /// The only status a converted lead may hold
    pub fn is_conversion_status(&self) -> bool {
        matches!(self, Self::Qualified)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Contacted => write!(f, "Contacted"),
            Self::Qualified => write!(f, "Qualified"),
            Self::Unqualified => write!(f, "Unqualified"),
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Self::New),
            "Contacted" => Ok(Self::Contacted),
            "Qualified" => Ok(Self::Qualified),
            "Unqualified" => Ok(Self::Unqualified),
            _ => Err(format!("Invalid lead status: {s}")),
        }
    }
}
