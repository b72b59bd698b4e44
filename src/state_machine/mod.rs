// Lead lifecycle state machine.
//
// Statuses move freely among New / Contacted / Qualified / Unqualified until
// the lead is converted; conversion is terminal and pins the status to
// Qualified.

pub mod errors;
pub mod events;
pub mod guards;
pub mod lead_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{GuardError, GuardResult, StateMachineError, StateMachineResult};
pub use events::LeadEvent;
pub use guards::{ConvertedInvariantGuard, NotConvertedGuard, StateGuard};
pub use lead_state_machine::LeadStateMachine;
pub use states::LeadStatus;
