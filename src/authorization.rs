//! # Authorization
//!
//! The yes/no decision "may this caller convert this lead". Role and
//! ownership rules live in the implementation handed to the service; the
//! conversion core never inspects roles itself.

use crate::models::Lead;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    async fn can_convert(&self, caller_id: Uuid, lead: &Lead) -> bool;
}

/// Permits every caller
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl AuthorizationGate for AllowAll {
    async fn can_convert(&self, _caller_id: Uuid, _lead: &Lead) -> bool {
        true
    }
}

/// Permits only the lead's owner
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadOwnerGate;

#[async_trait]
impl AuthorizationGate for LeadOwnerGate {
    async fn can_convert(&self, caller_id: Uuid, lead: &Lead) -> bool {
        lead.owner_id == caller_id
    }
}

/// Adapts a synchronous predicate
pub struct FnGate<F>(pub F);

#[async_trait]
impl<F> AuthorizationGate for FnGate<F>
where
    F: Fn(Uuid, &Lead) -> bool + Send + Sync,
{
    async fn can_convert(&self, caller_id: Uuid, lead: &Lead) -> bool {
        (self.0)(caller_id, lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stock_gates() {
        let owner = Uuid::new_v4();
        let lead = Lead::new(owner);
        let stranger = Uuid::new_v4();

        assert!(AllowAll.can_convert(stranger, &lead).await);
        assert!(LeadOwnerGate.can_convert(owner, &lead).await);
        assert!(!LeadOwnerGate.can_convert(stranger, &lead).await);
    }

    #[tokio::test]
    async fn test_fn_gate() {
        let admin = Uuid::new_v4();
        let gate = FnGate(move |caller: Uuid, lead: &Lead| {
            caller == admin || caller == lead.owner_id
        });
        let lead = Lead::new(Uuid::new_v4());

        assert!(gate.can_convert(admin, &lead).await);
        assert!(gate.can_convert(lead.owner_id, &lead).await);
        assert!(!gate.can_convert(Uuid::new_v4(), &lead).await);
    }
}
