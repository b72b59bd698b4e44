//! Property tests over option combinations and injected failures

mod common;
mod factories;

use common::strategies::*;
use common::{created_entity_count, permissive_service, stored_lead};
use factories::base::StoreFactory;
use factories::leads::LeadFactory;
use lead_conversion::conversion::{ConversionOptions, ConversionPolicy};
use lead_conversion::error::ConversionErrorKind;
use lead_conversion::models::Lead;
use lead_conversion::persistence::{Collection, InMemoryStore};
use proptest::prelude::*;
use uuid::Uuid;

fn is_valid_combination(options: &ConversionOptions) -> bool {
    options.requests_anything()
        && (!options.create_opportunity || (options.create_account && options.create_contact))
}

proptest! {
    /// Property: a successful conversion creates exactly the planned entities
    /// and a failed one creates nothing
    #[test]
    fn conversion_creates_exactly_what_was_planned(options in conversion_options_strategy()) {
        let store = InMemoryStore::new();
        let service = permissive_service(&store);

        tokio_test::block_on(async {
            let lead = LeadFactory::new().create(&store).await.unwrap();
            let outcome = service.convert(lead.id, lead.owner_id, &options).await;

            if is_valid_combination(&options) {
                let result = outcome.unwrap();
                prop_assert_eq!(result.account_id.is_some(), options.create_account);
                prop_assert_eq!(result.contact_id.is_some(), options.create_contact);
                prop_assert_eq!(result.opportunity_id.is_some(), options.create_opportunity);
                prop_assert_eq!(store.count(Collection::Accounts), usize::from(options.create_account));
                prop_assert_eq!(store.count(Collection::Contacts), usize::from(options.create_contact));
                prop_assert_eq!(
                    store.count(Collection::Opportunities),
                    usize::from(options.create_opportunity)
                );
                prop_assert!(stored_lead(&store, lead.id).converted);
            } else {
                let err = outcome.unwrap_err();
                prop_assert_eq!(err.kind(), ConversionErrorKind::InvalidOptions);
                prop_assert_eq!(created_entity_count(&store), 0);
                prop_assert!(!stored_lead(&store, lead.id).converted);
            }
            Ok(())
        })?;
    }

    /// Property: whatever fails inside the transaction, nothing it wrote survives
    #[test]
    fn injected_failures_leave_no_partial_state(
        options in conversion_options_strategy(),
        faults in fault_strategy(),
    ) {
        prop_assume!(is_valid_combination(&options));
        let store = InMemoryStore::new();
        let service = permissive_service(&store);

        tokio_test::block_on(async {
            let lead = LeadFactory::new().create(&store).await.unwrap();
            let fails_insert = match faults.fail_insert {
                Some((Collection::Accounts, _)) => options.create_account,
                Some((Collection::Contacts, _)) => options.create_contact,
                Some((Collection::Opportunities, _)) => options.create_opportunity,
                _ => true,
            };
            store.set_faults(faults);

            match service.convert(lead.id, lead.owner_id, &options).await {
                Ok(_) => {
                    // the injected insert fault targeted an entity outside the plan
                    prop_assert!(!fails_insert);
                    prop_assert!(stored_lead(&store, lead.id).converted);
                }
                Err(err) => {
                    prop_assert_ne!(err.kind(), ConversionErrorKind::AlreadyConverted);
                    prop_assert_eq!(created_entity_count(&store), 0);
                    let stored = stored_lead(&store, lead.id);
                    prop_assert!(!stored.converted);
                    prop_assert_eq!(stored.converted_at, None);
                }
            }
            Ok(())
        })?;
    }

    /// Property: the policy never plans an opportunity without both dependents
    #[test]
    fn planned_opportunities_have_dependents(
        options in conversion_options_strategy(),
        company in optional_text_strategy(),
        last_name in optional_text_strategy(),
    ) {
        let mut lead = Lead::new(Uuid::new_v4());
        lead.company = company;
        lead.last_name = last_name;

        if let Ok(plan) = ConversionPolicy::validate(&lead, &options) {
            prop_assert!(plan.entity_count() > 0);
            if plan.create_opportunity {
                prop_assert!(plan.create_account && plan.create_contact);
            }
            if plan.create_account {
                prop_assert!(lead.company_name().is_some());
            }
        }
    }
}
