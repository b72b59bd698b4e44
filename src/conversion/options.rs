use crate::error::{ConversionError, ConversionResult};
use crate::models::OpportunityStage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Caller-supplied switches for a single conversion.
///
/// Deserializes from the inbound request body; any field left out takes its
/// default (account and contact on, opportunity off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    #[serde(alias = "createContact")]
    pub create_contact: bool,
    #[serde(alias = "createAccount")]
    pub create_account: bool,
    #[serde(alias = "createOpportunity")]
    pub create_opportunity: bool,
    #[serde(alias = "opportunityOverrides")]
    pub opportunity_overrides: OpportunityOverrides,
    /// Link the new contact to this account instead of creating one
    #[serde(alias = "existingAccountId")]
    pub existing_account_id: Option<Uuid>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            create_contact: true,
            create_account: true,
            create_opportunity: false,
            opportunity_overrides: OpportunityOverrides::default(),
            existing_account_id: None,
        }
    }
}

impl ConversionOptions {
    /// Account, contact and opportunity
    pub fn full() -> Self {
        Self {
            create_opportunity: true,
            ..Self::default()
        }
    }

    /// A contact with no account reference
    pub fn contact_only() -> Self {
        Self {
            create_account: false,
            ..Self::default()
        }
    }

    pub fn with_contact(mut self, create: bool) -> Self {
        self.create_contact = create;
        self
    }

    pub fn with_account(mut self, create: bool) -> Self {
        self.create_account = create;
        self
    }

    pub fn with_opportunity(mut self, create: bool) -> Self {
        self.create_opportunity = create;
        self
    }

    pub fn with_overrides(mut self, overrides: OpportunityOverrides) -> Self {
        self.opportunity_overrides = overrides;
        self
    }

    /// Attach the contact to an account that already exists
    pub fn reusing_account(mut self, account_id: Uuid) -> Self {
        self.existing_account_id = Some(account_id);
        self.create_account = false;
        self
    }

    pub fn requests_anything(&self) -> bool {
        self.create_account || self.create_contact || self.create_opportunity
    }
}

/// Caller values that replace the derived opportunity fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpportunityOverrides {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub stage: Option<OpportunityStage>,
    #[serde(alias = "closeDate")]
    pub close_date: Option<NaiveDate>,
    pub probability: Option<u8>,
}

impl OpportunityOverrides {
    /// Parse an untyped override map, rejecting unknown keys and ill-typed values
    pub fn from_map(map: &Map<String, Value>) -> ConversionResult<Self> {
        let overrides: Self = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ConversionError::invalid_options(format!("opportunity overrides: {e}")))?;
        overrides.validate()?;
        Ok(overrides)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> ConversionResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ConversionError::invalid_options(
                    "opportunity name override must not be blank",
                ));
            }
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ConversionError::invalid_options(format!(
                    "opportunity amount must be a non-negative number, got {amount}"
                )));
            }
        }
        if let Some(probability) = self.probability {
            if probability > 100 {
                return Err(ConversionError::invalid_options(format!(
                    "opportunity probability must be within 0..=100, got {probability}"
                )));
            }
        }
        Ok(())
    }
}
