use super::{non_blank, Address};
use crate::persistence::{from_document, to_document, Document, StoreResult};
use crate::state_machine::LeadStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prospective customer prior to conversion.
///
/// `converted` and the `converted_*` back-references are written once, by the
/// conversion transaction, and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub lead_source: Option<String>,
    pub rating: Option<String>,
    pub annual_revenue: Option<f64>,
    pub number_of_employees: Option<u32>,
    pub address: Option<Address>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub converted: bool,
    pub converted_at: Option<DateTime<Utc>>,
    pub converted_account_id: Option<Uuid>,
    pub converted_contact_id: Option<Uuid>,
    pub converted_opportunity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// A fresh, unconverted lead in `New` status
    pub fn new(owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            first_name: None,
            last_name: None,
            title: None,
            company: None,
            email: None,
            phone: None,
            mobile: None,
            website: None,
            industry: None,
            lead_source: None,
            rating: None,
            annual_revenue: None,
            number_of_employees: None,
            address: None,
            description: None,
            status: LeadStatus::New,
            converted: false,
            converted_at: None,
            converted_account_id: None,
            converted_contact_id: None,
            converted_opportunity_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn company_name(&self) -> Option<&str> {
        non_blank(self.company.as_deref())
    }

    /// "First Last", or whichever part is present
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [
            non_blank(self.first_name.as_deref()),
            non_blank(self.last_name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn from_document(document: Document) -> StoreResult<Self> {
        from_document(document)
    }

    pub fn to_document(&self) -> StoreResult<Document> {
        to_document(self)
    }
}
