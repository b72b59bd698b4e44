use super::errors::{business_rule_violation, GuardError, GuardResult};
use crate::models::Lead;

/// Trait for implementing state transition guards
pub trait StateGuard<T> {
    /// Check if a transition is allowed
    fn check(&self, entity: &T) -> GuardResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// A lead may only change state while it is unconverted
pub struct NotConvertedGuard;

impl StateGuard<Lead> for NotConvertedGuard {
    fn check(&self, lead: &Lead) -> GuardResult<()> {
        if lead.converted {
            return Err(GuardError::AlreadyConverted { lead_id: lead.id });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Lead must not already be converted"
    }
}

/// A converted lead is `Qualified`, timestamped, and any opportunity it
/// produced sits on the account and contact produced with it
pub struct ConvertedInvariantGuard;

impl StateGuard<Lead> for ConvertedInvariantGuard {
    fn check(&self, lead: &Lead) -> GuardResult<()> {
        if !lead.converted {
            return Err(business_rule_violation(format!(
                "Lead {} is not converted",
                lead.id
            )));
        }
        if !lead.status.is_conversion_status() {
            return Err(business_rule_violation(format!(
                "Converted lead {} has status {}, expected Qualified",
                lead.id, lead.status
            )));
        }
        if lead.converted_at.is_none() {
            return Err(business_rule_violation(format!(
                "Converted lead {} has no conversion timestamp",
                lead.id
            )));
        }
        if lead.converted_opportunity_id.is_some()
            && (lead.converted_account_id.is_none() || lead.converted_contact_id.is_none())
        {
            return Err(business_rule_violation(format!(
                "Lead {} references an opportunity without its account and contact",
                lead.id
            )));
        }
        if lead.converted_account_id.is_none()
            && lead.converted_contact_id.is_none()
            && lead.converted_opportunity_id.is_none()
        {
            return Err(business_rule_violation(format!(
                "Converted lead {} produced no entities",
                lead.id
            )));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Converted lead must satisfy the conversion invariant"
    }
}
