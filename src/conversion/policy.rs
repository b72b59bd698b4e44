use super::options::{ConversionOptions, OpportunityOverrides};
use crate::error::{ConversionError, ConversionResult};
use crate::models::{non_blank, Lead};
use uuid::Uuid;

/// Which entities one conversion call will create, decided before any write
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPlan {
    pub lead_id: Uuid,
    pub owner_id: Uuid,
    pub create_account: bool,
    pub create_contact: bool,
    pub create_opportunity: bool,
    pub existing_account_id: Option<Uuid>,
    pub opportunity_overrides: OpportunityOverrides,
}

impl ConversionPlan {
    pub fn entity_count(&self) -> usize {
        [
            self.create_account,
            self.create_contact,
            self.create_opportunity,
        ]
        .into_iter()
        .filter(|planned| *planned)
        .count()
    }

    /// Short form for log fields, e.g. "account+contact"
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.create_account {
            parts.push("account");
        }
        if self.create_contact {
            parts.push("contact");
        }
        if self.create_opportunity {
            parts.push("opportunity");
        }
        parts.join("+")
    }
}

/// Precondition checks for a conversion request. Pure: no I/O.
pub struct ConversionPolicy;

impl ConversionPolicy {
    /// Checked in order: conversion state, option consistency, lead fields,
    /// then opportunity overrides.
    pub fn validate(lead: &Lead, options: &ConversionOptions) -> ConversionResult<ConversionPlan> {
        if lead.converted {
            return Err(ConversionError::AlreadyConverted { lead_id: lead.id });
        }

        Self::check_options(options)?;
        Self::check_required_fields(lead, options)?;

        if options.create_opportunity {
            options.opportunity_overrides.validate()?;
        }

        Ok(ConversionPlan {
            lead_id: lead.id,
            owner_id: lead.owner_id,
            create_account: options.create_account,
            create_contact: options.create_contact,
            create_opportunity: options.create_opportunity,
            existing_account_id: options.existing_account_id,
            opportunity_overrides: options.opportunity_overrides.clone(),
        })
    }

    fn check_options(options: &ConversionOptions) -> ConversionResult<()> {
        if !options.requests_anything() {
            return Err(ConversionError::invalid_options(
                "at least one of account, contact or opportunity must be requested",
            ));
        }
        if options.create_opportunity && !(options.create_account && options.create_contact) {
            return Err(ConversionError::invalid_options(
                "an opportunity requires both a new account and a new contact",
            ));
        }
        if let Some(account_id) = options.existing_account_id {
            if options.create_account {
                return Err(ConversionError::invalid_options(format!(
                    "existing account {account_id} given while also creating an account"
                )));
            }
            if !options.create_contact {
                return Err(ConversionError::invalid_options(format!(
                    "existing account {account_id} given but no contact will be created"
                )));
            }
        }
        Ok(())
    }

    fn check_required_fields(lead: &Lead, options: &ConversionOptions) -> ConversionResult<()> {
        if (options.create_account || options.create_opportunity) && lead.company_name().is_none() {
            return Err(ConversionError::MissingRequiredField {
                lead_id: lead.id,
                field: "company",
                entity: if options.create_account {
                    "account"
                } else {
                    "opportunity"
                },
            });
        }
        if options.create_contact && non_blank(lead.last_name.as_deref()).is_none() {
            return Err(ConversionError::MissingRequiredField {
                lead_id: lead.id,
                field: "last_name",
                entity: "contact",
            });
        }
        Ok(())
    }
}
