//! # Transaction Coordinator
//!
//! The only writer of lead, account, contact and opportunity documents during
//! a conversion. All inserts and the guarded lead update run inside one store
//! transaction; any failure aborts it, so readers see either every document
//! or none of them.

use super::factories::ConversionPayloads;
use super::policy::ConversionPlan;
use super::ConvertedEntities;
use crate::constants::events;
use crate::error::{ConversionError, ConversionResult};
use crate::logging::{log_conversion_operation, log_error, log_store_operation};
use crate::models::Lead;
use crate::persistence::{to_document, Collection, PersistenceStore, Txn};
use crate::state_machine::{LeadEvent, LeadStateMachine};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

pub struct TransactionCoordinator {
    store: Arc<dyn PersistenceStore>,
}

impl TransactionCoordinator {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PersistenceStore> {
        &self.store
    }

    /// Write the planned entities and mark the lead converted, atomically.
    ///
    /// Fails with `ConcurrentConversionConflict` when the lead no longer
    /// satisfies the `converted == false` guard at write or commit time.
    /// `deadline` bounds opening the transaction and staging the writes.
    /// Once the commit is issued it runs to completion, so a reported error
    /// always means nothing was committed.
    #[instrument(skip_all, fields(lead_id = %plan.lead_id, plan = %plan.summary()))]
    pub async fn execute(
        &self,
        plan: &ConversionPlan,
        lead: &Lead,
        payloads: ConversionPayloads,
        deadline: tokio::time::Instant,
    ) -> ConversionResult<ConvertedEntities> {
        let started = Instant::now();
        let lead_id = plan.lead_id;

        let mut txn = before_deadline(deadline, lead_id, async {
            self.store
                .begin_transaction()
                .await
                .map_err(|e| e.into_conversion_error(lead_id))
        })
        .await?;
        debug!("conversion transaction opened");

        let outcome = before_deadline(
            deadline,
            lead_id,
            Self::write_all(txn.as_mut(), plan, lead, payloads),
        )
        .await;
        let entities = match outcome {
            Ok(entities) => entities,
            Err(err) => {
                txn.abort().await;
                warn!(error = %err, kind = %err.kind(), "conversion transaction aborted");
                return Err(err);
            }
        };

        txn.commit().await.map_err(|e| {
            let err = e.into_conversion_error(lead_id);
            match err {
                ConversionError::ConcurrentConversionConflict { .. } => {
                    warn!("conversion lost the race at commit");
                }
                _ => log_error("coordinator", "commit", &err.to_string(), Some(lead_id)),
            }
            err
        })?;

        log_store_operation(
            "commit",
            Some(Collection::Leads.name()),
            Some(lead_id),
            "committed",
            Some(started.elapsed().as_millis() as u64),
        );
        log_conversion_operation(
            events::LEAD_CONVERTED,
            lead_id,
            "committed",
            Some(&plan.summary()),
        );
        Ok(entities)
    }

    async fn write_all(
        txn: &mut dyn Txn,
        plan: &ConversionPlan,
        lead: &Lead,
        payloads: ConversionPayloads,
    ) -> ConversionResult<ConvertedEntities> {
        let lead_id = plan.lead_id;

        let account_id = match &payloads.account {
            Some(account) => Some(
                Self::insert_entity(txn, Collection::Accounts, account.id, account, lead_id).await?,
            ),
            None => None,
        };
        let contact_id = match &payloads.contact {
            Some(contact) => Some(
                Self::insert_entity(txn, Collection::Contacts, contact.id, contact, lead_id).await?,
            ),
            None => None,
        };
        let opportunity_id = match &payloads.opportunity {
            Some(opportunity) => Some(
                Self::insert_entity(
                    txn,
                    Collection::Opportunities,
                    opportunity.id,
                    opportunity,
                    lead_id,
                )
                .await?,
            ),
            None => None,
        };

        let entities = ConvertedEntities {
            lead_id,
            account_id,
            contact_id,
            opportunity_id,
            converted_at: payloads.converted_at,
        };

        let converted = LeadStateMachine::apply_conversion(lead, &entities)?;
        let patch = LeadStateMachine::conversion_patch(&converted)?;
        let applied = txn
            .update_if(
                Collection::Leads,
                lead_id,
                &LeadStateMachine::conversion_guard(),
                patch,
            )
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?;

        if !applied {
            debug!("conversion guard missed");
            return Err(ConversionError::ConcurrentConversionConflict { lead_id });
        }

        Ok(entities)
    }

    async fn insert_entity<T: Serialize + Sync>(
        txn: &mut dyn Txn,
        collection: Collection,
        expected_id: Uuid,
        entity: &T,
        lead_id: Uuid,
    ) -> ConversionResult<Uuid> {
        let document = to_document(entity).map_err(|e| e.into_conversion_error(lead_id))?;
        let id = txn
            .insert(collection, document)
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?;

        if id != expected_id {
            return Err(ConversionError::constraint_violation(format!(
                "{collection} insert returned id {id}, expected {expected_id}"
            )));
        }

        debug!(collection = %collection, record_id = %id, "staged insert");
        Ok(id)
    }

    /// Persist an ordinary status change computed from `previous`.
    ///
    /// The write only lands if the stored lead is still unconverted and still
    /// in `previous.status`.
    #[instrument(skip_all, fields(lead_id = %updated.id, event = event.event_type()))]
    pub async fn record_status_transition(
        &self,
        previous: &Lead,
        updated: &Lead,
        event: LeadEvent,
    ) -> ConversionResult<()> {
        let lead_id = updated.id;
        let condition = LeadStateMachine::status_guard(previous)?;
        let patch = LeadStateMachine::status_patch(updated)?;

        let mut txn = self
            .store
            .begin_transaction()
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?;

        let outcome = txn
            .update_if(Collection::Leads, lead_id, &condition, patch)
            .await;
        let applied = match outcome {
            Ok(applied) => applied,
            Err(e) => {
                txn.abort().await;
                return Err(e.into_conversion_error(lead_id));
            }
        };

        if !applied {
            txn.abort().await;
            warn!("lead changed underneath status transition");
            return Err(ConversionError::ConcurrentConversionConflict { lead_id });
        }

        txn.commit()
            .await
            .map_err(|e| e.into_conversion_error(lead_id))?;
        log_conversion_operation(
            event.event_name(),
            lead_id,
            "committed",
            Some(&updated.status.to_string()),
        );
        Ok(())
    }
}

/// Run `operation` unless `deadline` passes first. An elapsed deadline is
/// reported as `StoreUnavailable`.
pub async fn before_deadline<T, F>(
    deadline: tokio::time::Instant,
    lead_id: Uuid,
    operation: F,
) -> ConversionResult<T>
where
    F: Future<Output = ConversionResult<T>>,
{
    match tokio::time::timeout_at(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(ConversionError::store_unavailable(format!(
            "deadline elapsed while converting lead {lead_id}"
        ))),
    }
}
