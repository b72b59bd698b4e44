//! # Lead Conversion
//!
//! Promotes a lead into an account, a contact and optionally an opportunity
//! as one atomic unit of work.
//!
//! ```text
//! LeadConversionService::convert
//!   -> AuthorizationGate::can_convert
//!   -> ConversionPolicy::validate        (plan)
//!   -> EntityFactory::build_payloads     (pure)
//!   -> TransactionCoordinator::execute   (insert account, contact,
//!                                         opportunity; guarded lead update;
//!                                         commit or abort)
//! ```
//!
//! A lead is converted at most once: the lead update only applies while the
//! stored document still has `converted == false`, and stores re-check that
//! condition when they commit.

pub mod coordinator;
pub mod factories;
pub mod options;
pub mod policy;
pub mod service;

pub use coordinator::TransactionCoordinator;
pub use factories::{ConversionPayloads, EntityFactory, ReservedIds};
pub use options::{ConversionOptions, OpportunityOverrides};
pub use policy::{ConversionPlan, ConversionPolicy};
pub use service::LeadConversionService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiers of the entities a committed conversion created.
///
/// Each id is `None` when that entity was not part of the plan. A reused
/// account is not reported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedEntities {
    pub lead_id: Uuid,
    pub account_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub opportunity_id: Option<Uuid>,
    pub converted_at: DateTime<Utc>,
}
