//! # Account Factories

#![allow(dead_code)]

use super::base::StoreFactory;
use chrono::Utc;
use lead_conversion::models::Account;
use lead_conversion::persistence::Collection;
use uuid::Uuid;

/// Factory for accounts that exist before a conversion runs
#[derive(Debug, Clone)]
pub struct AccountFactory {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    industry: Option<String>,
}

impl Default for AccountFactory {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Globex".to_string(),
            industry: Some("Manufacturing".to_string()),
        }
    }
}

impl AccountFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = owner_id;
        self
    }
}

impl StoreFactory<Account> for AccountFactory {
    fn collection(&self) -> Collection {
        Collection::Accounts
    }

    fn build(&self) -> Account {
        Account {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name.clone(),
            industry: self.industry.clone(),
            website: None,
            phone: None,
            annual_revenue: None,
            number_of_employees: None,
            billing_address: None,
            description: None,
            created_at: Utc::now(),
        }
    }
}
