//! Payload builders for the entities a conversion creates.
//!
//! Pure mapping from lead fields; the clock and the identifiers are inputs so
//! the same lead, plan and ids always yield the same payloads.

use super::options::OpportunityOverrides;
use super::policy::ConversionPlan;
use crate::models::{non_blank, Account, Address, Contact, Lead, Opportunity};
use chrono::{DateTime, Days, Utc};
use uuid::Uuid;

/// Identifiers reserved for the planned entities before anything is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedIds {
    pub account_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub opportunity_id: Option<Uuid>,
}

impl ReservedIds {
    pub fn allocate(plan: &ConversionPlan) -> Self {
        let reserve = |planned: bool| planned.then(Uuid::new_v4);
        Self {
            account_id: reserve(plan.create_account),
            contact_id: reserve(plan.create_contact),
            opportunity_id: reserve(plan.create_opportunity),
        }
    }
}

/// The documents one conversion will insert, in write order
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPayloads {
    pub account: Option<Account>,
    pub contact: Option<Contact>,
    pub opportunity: Option<Opportunity>,
    pub converted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct EntityFactory {
    now: DateTime<Utc>,
    close_window_days: u32,
}

impl EntityFactory {
    pub fn new(now: DateTime<Utc>, close_window_days: u32) -> Self {
        Self {
            now,
            close_window_days,
        }
    }

    pub fn build_account_payload(&self, lead: &Lead, account_id: Uuid) -> Account {
        Account {
            id: account_id,
            owner_id: lead.owner_id,
            name: lead.company_name().unwrap_or_default().to_string(),
            industry: lead.industry.clone(),
            website: lead.website.clone(),
            phone: lead.phone.clone(),
            annual_revenue: lead.annual_revenue,
            number_of_employees: lead.number_of_employees,
            billing_address: address_of(lead),
            description: lead.description.clone(),
            created_at: self.now,
        }
    }

    pub fn build_contact_payload(
        &self,
        lead: &Lead,
        contact_id: Uuid,
        account_id: Option<Uuid>,
    ) -> Contact {
        Contact {
            id: contact_id,
            owner_id: lead.owner_id,
            account_id,
            first_name: non_blank(lead.first_name.as_deref()).map(str::to_string),
            last_name: non_blank(lead.last_name.as_deref())
                .unwrap_or_default()
                .to_string(),
            title: lead.title.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            mobile: lead.mobile.clone(),
            mailing_address: address_of(lead),
            lead_source: lead.lead_source.clone(),
            description: lead.description.clone(),
            created_at: self.now,
        }
    }

    pub fn build_opportunity_payload(
        &self,
        lead: &Lead,
        opportunity_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
        overrides: &OpportunityOverrides,
    ) -> Opportunity {
        let stage = overrides.stage.unwrap_or_default();
        let name = overrides
            .name
            .as_deref()
            .and_then(|name| non_blank(Some(name)))
            .map(str::to_string)
            .unwrap_or_else(|| default_opportunity_name(lead));

        Opportunity {
            id: opportunity_id,
            owner_id: lead.owner_id,
            account_id,
            contact_id,
            name,
            amount: overrides.amount,
            stage,
            probability: overrides
                .probability
                .unwrap_or_else(|| stage.default_probability()),
            close_date: overrides.close_date.unwrap_or_else(|| {
                self.now.date_naive() + Days::new(u64::from(self.close_window_days))
            }),
            lead_source: lead.lead_source.clone(),
            created_at: self.now,
        }
    }

    /// Build every payload the plan calls for
    pub fn build_payloads(
        &self,
        lead: &Lead,
        plan: &ConversionPlan,
        ids: &ReservedIds,
    ) -> ConversionPayloads {
        let account = ids
            .account_id
            .map(|account_id| self.build_account_payload(lead, account_id));

        let contact_account_id = ids.account_id.or(plan.existing_account_id);
        let contact = ids
            .contact_id
            .map(|contact_id| self.build_contact_payload(lead, contact_id, contact_account_id));

        let opportunity = match (ids.opportunity_id, ids.account_id, ids.contact_id) {
            (Some(opportunity_id), Some(account_id), Some(contact_id)) => {
                Some(self.build_opportunity_payload(
                    lead,
                    opportunity_id,
                    account_id,
                    contact_id,
                    &plan.opportunity_overrides,
                ))
            }
            _ => None,
        };

        ConversionPayloads {
            account,
            contact,
            opportunity,
            converted_at: self.now,
        }
    }
}

fn address_of(lead: &Lead) -> Option<Address> {
    lead.address.clone().filter(|address| !address.is_empty())
}

/// "<company> - <full name>", or whichever half exists
fn default_opportunity_name(lead: &Lead) -> String {
    match (lead.company_name(), lead.full_name()) {
        (Some(company), Some(person)) => format!("{company} - {person}"),
        (Some(company), None) => company.to_string(),
        (None, Some(person)) => person,
        (None, None) => format!("Lead {}", lead.id),
    }
}
