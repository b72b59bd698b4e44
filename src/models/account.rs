use super::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization record, created from a lead's company details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub annual_revenue: Option<f64>,
    pub number_of_employees: Option<u32>,
    pub billing_address: Option<Address>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
