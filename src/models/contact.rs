use super::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person record. `account_id` is absent when the conversion created no
/// account and reused none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub account_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub mailing_address: Option<Address>,
    pub lead_source: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
