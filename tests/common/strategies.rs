use lead_conversion::conversion::ConversionOptions;
use lead_conversion::persistence::{Collection, FaultPlan, InjectedFailure};
use proptest::prelude::*;

/// Every combination of the three create switches
pub fn conversion_options_strategy() -> impl Strategy<Value = ConversionOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(create_account, create_contact, create_opportunity)| ConversionOptions {
            create_account,
            create_contact,
            create_opportunity,
            ..ConversionOptions::default()
        },
    )
}

/// Faults that must abort a conversion without leaving a trace
pub fn fault_strategy() -> impl Strategy<Value = FaultPlan> {
    let insert_target = prop_oneof![
        Just(Collection::Accounts),
        Just(Collection::Contacts),
        Just(Collection::Opportunities),
    ];
    let failure = prop_oneof![
        Just(InjectedFailure::Unavailable),
        Just(InjectedFailure::ConstraintViolation),
    ];

    prop_oneof![
        (insert_target, failure).prop_map(|(collection, failure)| FaultPlan {
            fail_insert: Some((collection, failure)),
            ..FaultPlan::default()
        }),
        Just(FaultPlan {
            fail_commit: true,
            ..FaultPlan::default()
        }),
        // two misses outlast the single internal retry
        Just(FaultPlan {
            guard_misses: 2,
            ..FaultPlan::default()
        }),
    ]
}

/// Optional lead text fields, including blanks
pub fn optional_text_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        "[A-Z][a-z]{1,12}".prop_map(Some),
    ]
}
