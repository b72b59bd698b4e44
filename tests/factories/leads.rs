//! # Lead Factories

#![allow(dead_code)]

use super::base::StoreFactory;
use chrono::Utc;
use lead_conversion::models::{Address, Lead};
use lead_conversion::persistence::Collection;
use lead_conversion::state_machine::LeadStatus;
use uuid::Uuid;

/// Factory for unconverted leads with a complete default profile
#[derive(Debug, Clone)]
pub struct LeadFactory {
    id: Uuid,
    owner_id: Uuid,
    first_name: Option<String>,
    last_name: Option<String>,
    title: Option<String>,
    company: Option<String>,
    industry: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    lead_source: Option<String>,
    address: Option<Address>,
    status: LeadStatus,
    converted: bool,
}

impl Default for LeadFactory {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            title: Some("Head of Engineering".to_string()),
            company: Some("Acme".to_string()),
            industry: Some("Technology".to_string()),
            email: Some("a@acme.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            lead_source: Some("Web".to_string()),
            address: Some(Address {
                street: Some("1 Analytical Way".to_string()),
                city: Some("London".to_string()),
                state: None,
                postal_code: Some("EC1A 1BB".to_string()),
                country: Some("UK".to_string()),
            }),
            status: LeadStatus::Qualified,
            converted: false,
        }
    }
}

impl LeadFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn without_company(mut self) -> Self {
        self.company = None;
        self
    }

    pub fn with_industry(mut self, industry: &str) -> Self {
        self.industry = Some(industry.to_string());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn without_last_name(mut self) -> Self {
        self.last_name = None;
        self
    }

    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = status;
        self
    }

    /// A lead some earlier conversion already handled
    pub fn already_converted(mut self) -> Self {
        self.converted = true;
        self.status = LeadStatus::Qualified;
        self
    }
}

impl StoreFactory<Lead> for LeadFactory {
    fn collection(&self) -> Collection {
        Collection::Leads
    }

    fn build(&self) -> Lead {
        let mut lead = Lead::new(self.owner_id);
        lead.id = self.id;
        lead.first_name = self.first_name.clone();
        lead.last_name = self.last_name.clone();
        lead.title = self.title.clone();
        lead.company = self.company.clone();
        lead.industry = self.industry.clone();
        lead.email = self.email.clone();
        lead.phone = self.phone.clone();
        lead.lead_source = self.lead_source.clone();
        lead.address = self.address.clone();
        lead.status = self.status;
        if self.converted {
            lead.converted = true;
            lead.converted_at = Some(Utc::now());
            lead.converted_contact_id = Some(Uuid::new_v4());
        }
        lead
    }
}
