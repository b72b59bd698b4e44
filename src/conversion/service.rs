//! # Lead Conversion Service
//!
//! Public entry point: load, authorize, validate, build, execute. Errors are
//! returned to the caller unlogged; the HTTP layer decides what to report.

use super::coordinator::{before_deadline, TransactionCoordinator};
use super::factories::{EntityFactory, ReservedIds};
use super::options::ConversionOptions;
use super::policy::ConversionPolicy;
use super::ConvertedEntities;
use crate::authorization::AuthorizationGate;
use crate::config::ConversionConfig;
use crate::constants::CONFLICT_RETRY_LIMIT;
use crate::error::{ConversionError, ConversionResult};
use crate::models::Lead;
use crate::persistence::{Collection, PersistenceStore};
use crate::state_machine::{LeadEvent, LeadStateMachine};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

pub struct LeadConversionService {
    coordinator: TransactionCoordinator,
    gate: Arc<dyn AuthorizationGate>,
    config: ConversionConfig,
}

impl LeadConversionService {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        gate: Arc<dyn AuthorizationGate>,
        config: ConversionConfig,
    ) -> Self {
        Self {
            coordinator: TransactionCoordinator::new(store),
            gate,
            config,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a lead within the configured transaction timeout
    pub async fn convert(
        &self,
        lead_id: Uuid,
        caller_id: Uuid,
        options: &ConversionOptions,
    ) -> ConversionResult<ConvertedEntities> {
        let deadline = Instant::now() + self.config.transaction_timeout();
        self.convert_with_deadline(lead_id, caller_id, options, deadline)
            .await
    }

    /// Convert a lead, giving up at `deadline`.
    ///
    /// An expired deadline rolls back the in-flight transaction and reports
    /// `StoreUnavailable`. The deadline is not applied to a commit that has
    /// already been issued; that commit's own outcome is returned.
    pub async fn convert_with_deadline(
        &self,
        lead_id: Uuid,
        caller_id: Uuid,
        options: &ConversionOptions,
        deadline: Instant,
    ) -> ConversionResult<ConvertedEntities> {
        let mut lead = before_deadline(deadline, lead_id, self.load_lead(lead_id)).await?;

        let allowed = before_deadline(deadline, lead_id, async {
            Ok(self.gate.can_convert(caller_id, &lead).await)
        })
        .await?;
        if !allowed {
            return Err(ConversionError::Forbidden { caller_id, lead_id });
        }

        let mut conflicts = 0;
        loop {
            // A lead reloaded after a lost race fails here as AlreadyConverted
            let plan = ConversionPolicy::validate(&lead, options)?;
            if let Some(account_id) = plan.existing_account_id {
                before_deadline(
                    deadline,
                    lead_id,
                    self.ensure_account_exists(account_id, lead_id),
                )
                .await?;
            }

            let factory = EntityFactory::new(Utc::now(), self.config.opportunity_close_window_days);
            let ids = ReservedIds::allocate(&plan);
            let payloads = factory.build_payloads(&lead, &plan, &ids);

            match self
                .coordinator
                .execute(&plan, &lead, payloads, deadline)
                .await
            {
                Err(ConversionError::ConcurrentConversionConflict { .. })
                    if conflicts < CONFLICT_RETRY_LIMIT =>
                {
                    conflicts += 1;
                    lead = before_deadline(deadline, lead_id, self.load_lead(lead_id)).await?;
                }
                result => return result,
            }
        }
    }

    /// Read the committed lead
    pub async fn load_lead(&self, lead_id: Uuid) -> ConversionResult<Lead> {
        let document = self
            .coordinator
            .store()
            .fetch(Collection::Leads, lead_id)
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?
            .ok_or(ConversionError::NotFound { lead_id })?;

        Lead::from_document(document).map_err(|e| e.into_conversion_error(lead_id))
    }

    /// Move an unconverted lead to another status. Conversion itself is not
    /// reachable this way.
    pub async fn advance_status(&self, lead_id: Uuid, event: LeadEvent) -> ConversionResult<Lead> {
        let previous = self.load_lead(lead_id).await?;
        let mut updated = previous.clone();
        LeadStateMachine::transition(&mut updated, event, Utc::now())?;

        self.coordinator
            .record_status_transition(&previous, &updated, event)
            .await?;
        Ok(updated)
    }

    async fn ensure_account_exists(&self, account_id: Uuid, lead_id: Uuid) -> ConversionResult<()> {
        let found = self
            .coordinator
            .store()
            .fetch(Collection::Accounts, account_id)
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?;

        match found {
            Some(_) => Ok(()),
            None => Err(ConversionError::invalid_options(format!(
                "existing account {account_id} does not exist"
            ))),
        }
    }
}
