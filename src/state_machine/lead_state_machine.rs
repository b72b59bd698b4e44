use super::{
    errors::{StateMachineError, StateMachineResult},
    events::LeadEvent,
    guards::{ConvertedInvariantGuard, NotConvertedGuard, StateGuard},
    states::LeadStatus,
};
use crate::constants::fields;
use crate::conversion::ConvertedEntities;
use crate::models::Lead;
use crate::persistence::Document;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Lead lifecycle rules.
///
/// Stateless: every method works on a lead value and returns the result,
/// leaving persistence to the transaction coordinator. `apply_conversion` is
/// the only path that sets `converted`.
pub struct LeadStateMachine;

impl LeadStateMachine {
    /// Determine the target status for an ordinary (non-conversion) event
    pub fn determine_target_status(
        current: LeadStatus,
        converted: bool,
        event: LeadEvent,
    ) -> StateMachineResult<LeadStatus> {
        if converted || event == LeadEvent::Convert {
            let from = if converted {
                "converted".to_string()
            } else {
                current.to_string()
            };
            return Err(StateMachineError::InvalidTransition {
                from,
                event: event.event_type().to_string(),
            });
        }

        Ok(event.target_status())
    }

    /// Apply an ordinary lifecycle event to `lead` in place
    pub fn transition(
        lead: &mut Lead,
        event: LeadEvent,
        now: DateTime<Utc>,
    ) -> StateMachineResult<LeadStatus> {
        let target = Self::determine_target_status(lead.status, lead.converted, event)?;
        lead.status = target;
        lead.updated_at = now;
        Ok(target)
    }

    /// Produce the converted form of `lead` for the entities a committed
    /// conversion created. Refuses leads that are already converted.
    pub fn apply_conversion(lead: &Lead, entities: &ConvertedEntities) -> StateMachineResult<Lead> {
        NotConvertedGuard.check(lead)?;

        if entities.lead_id != lead.id {
            return Err(StateMachineError::InvariantViolation {
                reason: format!(
                    "conversion result for lead {} applied to lead {}",
                    entities.lead_id, lead.id
                ),
            });
        }

        let mut converted = lead.clone();
        converted.status = LeadStatus::Qualified;
        converted.converted = true;
        converted.converted_at = Some(entities.converted_at);
        converted.converted_account_id = entities.account_id;
        converted.converted_contact_id = entities.contact_id;
        converted.converted_opportunity_id = entities.opportunity_id;
        converted.updated_at = entities.converted_at;

        ConvertedInvariantGuard.check(&converted)?;
        Ok(converted)
    }

    /// Condition the lead document must satisfy for a conversion to commit
    pub fn conversion_guard() -> Document {
        let mut condition = Document::new();
        condition.insert(fields::CONVERTED.to_string(), Value::Bool(false));
        condition
    }

    /// Fields written to the lead document by a conversion
    pub fn conversion_patch(converted: &Lead) -> StateMachineResult<Document> {
        ConvertedInvariantGuard.check(converted)?;

        let mut patch = Document::new();
        patch.insert(fields::STATUS.to_string(), serde_json::to_value(converted.status)?);
        patch.insert(fields::CONVERTED.to_string(), Value::Bool(true));
        patch.insert(
            fields::CONVERTED_AT.to_string(),
            serde_json::to_value(converted.converted_at)?,
        );
        patch.insert(
            fields::CONVERTED_ACCOUNT_ID.to_string(),
            json!(converted.converted_account_id),
        );
        patch.insert(
            fields::CONVERTED_CONTACT_ID.to_string(),
            json!(converted.converted_contact_id),
        );
        patch.insert(
            fields::CONVERTED_OPPORTUNITY_ID.to_string(),
            json!(converted.converted_opportunity_id),
        );
        patch.insert(
            fields::UPDATED_AT.to_string(),
            serde_json::to_value(converted.updated_at)?,
        );
        Ok(patch)
    }

    /// Condition for a status change: still unconverted and still in the
    /// status the change was computed from
    pub fn status_guard(previous: &Lead) -> StateMachineResult<Document> {
        let mut condition = Self::conversion_guard();
        condition.insert(fields::STATUS.to_string(), serde_json::to_value(previous.status)?);
        Ok(condition)
    }

    pub fn status_patch(updated: &Lead) -> StateMachineResult<Document> {
        let mut patch = Document::new();
        patch.insert(fields::STATUS.to_string(), serde_json::to_value(updated.status)?);
        patch.insert(
            fields::UPDATED_AT.to_string(),
            serde_json::to_value(updated.updated_at)?,
        );
        Ok(patch)
    }
}
