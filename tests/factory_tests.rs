//! Integration tests for the factory system

mod factories;

use factories::accounts::AccountFactory;
use factories::base::StoreFactory;
use factories::leads::LeadFactory;
use lead_conversion::models::Lead;
use lead_conversion::persistence::{Collection, InMemoryStore, PersistenceStore};
use lead_conversion::state_machine::LeadStatus;

#[tokio::test]
async fn test_lead_factory_persists_through_a_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let store = InMemoryStore::new();
    let lead = LeadFactory::new()
        .with_company("Initech")
        .with_name("Peter", "Gibbons")
        .with_status(LeadStatus::Contacted)
        .create(&store)
        .await?;

    let document = store
        .fetch(Collection::Leads, lead.id)
        .await?
        .expect("lead committed");
    let stored = Lead::from_document(document)?;

    assert_eq!(stored, lead);
    assert_eq!(stored.company.as_deref(), Some("Initech"));
    assert_eq!(stored.full_name().as_deref(), Some("Peter Gibbons"));
    assert_eq!(stored.status, LeadStatus::Contacted);
    assert!(!stored.converted);
    Ok(())
}

#[tokio::test]
async fn test_converted_lead_factory_satisfies_invariant() -> Result<(), Box<dyn std::error::Error>> {
    let lead = LeadFactory::new().already_converted().build();
    assert!(lead.converted);
    assert_eq!(lead.status, LeadStatus::Qualified);
    assert!(lead.converted_at.is_some());
    assert!(lead.converted_contact_id.is_some());
    Ok(())
}

#[tokio::test]
async fn test_account_factory() -> Result<(), Box<dyn std::error::Error>> {
    let store = InMemoryStore::new();
    let account = AccountFactory::new().with_name("Umbrella").create(&store).await?;

    assert_eq!(store.count(Collection::Accounts), 1);
    assert!(store.get(Collection::Accounts, account.id).is_some());
    assert_eq!(account.name, "Umbrella");
    Ok(())
}
