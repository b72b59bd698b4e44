#![allow(dead_code)]

pub mod strategies;

use lead_conversion::authorization::{AllowAll, AuthorizationGate};
use lead_conversion::config::ConversionConfig;
use lead_conversion::conversion::LeadConversionService;
use lead_conversion::models::Lead;
use lead_conversion::persistence::{Collection, InMemoryStore};
use std::sync::Arc;
use uuid::Uuid;

/// A service over `store` that lets every caller convert
pub fn permissive_service(store: &InMemoryStore) -> LeadConversionService {
    service_with_gate(store, Arc::new(AllowAll))
}

pub fn service_with_gate(
    store: &InMemoryStore,
    gate: Arc<dyn AuthorizationGate>,
) -> LeadConversionService {
    LeadConversionService::new(Arc::new(store.clone()), gate, ConversionConfig::default())
}

/// The committed lead, read straight from the store
pub fn stored_lead(store: &InMemoryStore, lead_id: Uuid) -> Lead {
    let document = store
        .get(Collection::Leads, lead_id)
        .expect("lead should exist");
    Lead::from_document(document).expect("lead should deserialize")
}

/// Number of account, contact and opportunity documents in the store
pub fn created_entity_count(store: &InMemoryStore) -> usize {
    store.count(Collection::Accounts)
        + store.count(Collection::Contacts)
        + store.count(Collection::Opportunities)
}
