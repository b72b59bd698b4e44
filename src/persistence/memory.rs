//! In-process document store with optimistic, snapshot-style transactions.
//!
//! Writes are staged inside the transaction. `update_if` evaluates its
//! condition against the transaction's own view, and `commit` re-checks every
//! recorded condition against the latest committed state under the write lock
//! before publishing anything. A condition that no longer holds fails the
//! commit with [`StoreError::WriteConflict`] and nothing is applied.

use super::{
    document_id, matches_condition, merge_patch, Collection, Document, PersistenceStore,
    StoreError, StoreResult, Txn,
};
use crate::constants::fields;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

type Collections = HashMap<Collection, HashMap<Uuid, Document>>;

/// Failure raised by an injected fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Unavailable,
    ConstraintViolation,
}

impl InjectedFailure {
    fn into_error(self, collection: Collection) -> StoreError {
        match self {
            Self::Unavailable => StoreError::Unavailable {
                reason: format!("injected failure writing {collection}"),
            },
            Self::ConstraintViolation => StoreError::ConstraintViolation {
                reason: format!("injected constraint violation in {collection}"),
            },
        }
    }
}

/// Faults the store injects into transactions, for failure-path testing
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    /// Every insert into this collection fails until the plan is cleared
    pub fail_insert: Option<(Collection, InjectedFailure)>,
    /// The next N `update_if` calls report a condition mismatch
    pub guard_misses: u32,
    /// Every commit fails as unavailable
    pub fail_commit: bool,
    /// Sleep before committing
    pub commit_delay: Option<Duration>,
    /// Sleep before staging each insert
    pub write_delay: Option<Duration>,
}

#[derive(Default)]
struct StoreState {
    collections: RwLock<Collections>,
    faults: Mutex<FaultPlan>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(self, plan: FaultPlan) -> Self {
        self.set_faults(plan);
        self
    }

    pub fn set_faults(&self, plan: FaultPlan) {
        *self.state.faults.lock() = plan;
    }

    pub fn clear_faults(&self) {
        self.set_faults(FaultPlan::default());
    }

    /// Write a committed document directly, bypassing transactions
    pub fn seed(&self, collection: Collection, mut document: Document) -> StoreResult<Uuid> {
        let id = assign_id(&mut document)?;
        let mut collections = self.state.collections.write();
        let documents = collections.entry(collection).or_default();
        if documents.contains_key(&id) {
            return Err(duplicate_id(collection, id));
        }
        documents.insert(id, document);
        Ok(id)
    }

    pub fn get(&self, collection: Collection, id: Uuid) -> Option<Document> {
        self.state
            .collections
            .read()
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .cloned()
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.state
            .collections
            .read()
            .get(&collection)
            .map_or(0, HashMap::len)
    }

    pub fn documents(&self, collection: Collection) -> Vec<Document> {
        self.state
            .collections
            .read()
            .get(&collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn begin_transaction(&self) -> StoreResult<Box<dyn Txn>> {
        Ok(Box::new(MemoryTxn {
            state: Arc::clone(&self.state),
            txn_id: Uuid::new_v4(),
            writes: Vec::new(),
        }))
    }

    async fn fetch(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Document>> {
        Ok(self.get(collection, id))
    }
}

enum StagedWrite {
    Insert {
        collection: Collection,
        id: Uuid,
        document: Document,
    },
    Update {
        collection: Collection,
        id: Uuid,
        condition: Document,
        patch: Document,
    },
}

pub struct MemoryTxn {
    state: Arc<StoreState>,
    txn_id: Uuid,
    writes: Vec<StagedWrite>,
}

impl MemoryTxn {
    /// The document as this transaction sees it: committed state plus staged writes
    fn visible(&self, committed: &Collections, collection: Collection, id: Uuid) -> Option<Document> {
        let mut document = committed
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .cloned();

        for write in &self.writes {
            match write {
                StagedWrite::Insert {
                    collection: c,
                    id: i,
                    document: staged,
                } if *c == collection && *i == id => document = Some(staged.clone()),
                StagedWrite::Update {
                    collection: c,
                    id: i,
                    patch,
                    ..
                } if *c == collection && *i == id => {
                    if let Some(current) = document.as_mut() {
                        merge_patch(current, patch.clone());
                    }
                }
                _ => {}
            }
        }

        document
    }
}

#[async_trait]
impl Txn for MemoryTxn {
    async fn insert(&mut self, collection: Collection, mut payload: Document) -> StoreResult<Uuid> {
        let (injected, delay) = {
            let faults = self.state.faults.lock();
            (faults.fail_insert, faults.write_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((target, failure)) = injected {
            if target == collection {
                return Err(failure.into_error(collection));
            }
        }

        let id = assign_id(&mut payload)?;
        let exists = {
            let committed = self.state.collections.read();
            self.visible(&committed, collection, id).is_some()
        };
        if exists {
            return Err(duplicate_id(collection, id));
        }

        self.writes.push(StagedWrite::Insert {
            collection,
            id,
            document: payload,
        });
        Ok(id)
    }

    async fn update_if(
        &mut self,
        collection: Collection,
        id: Uuid,
        condition: &Document,
        patch: Document,
    ) -> StoreResult<bool> {
        {
            let mut faults = self.state.faults.lock();
            if faults.guard_misses > 0 {
                faults.guard_misses -= 1;
                return Ok(false);
            }
        }

        let matches = {
            let committed = self.state.collections.read();
            self.visible(&committed, collection, id)
                .is_some_and(|document| matches_condition(&document, condition))
        };
        if !matches {
            return Ok(false);
        }

        self.writes.push(StagedWrite::Update {
            collection,
            id,
            condition: condition.clone(),
            patch,
        });
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let (delay, fail_commit) = {
            let faults = self.state.faults.lock();
            (faults.commit_delay, faults.fail_commit)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail_commit {
            return Err(StoreError::Unavailable {
                reason: "injected commit failure".to_string(),
            });
        }

        let mut committed = self.state.collections.write();
        let mut touched: HashMap<(Collection, Uuid), Option<Document>> = HashMap::new();

        for write in &self.writes {
            match write {
                StagedWrite::Insert {
                    collection,
                    id,
                    document,
                } => {
                    let slot = touched.entry((*collection, *id)).or_insert_with(|| {
                        committed
                            .get(collection)
                            .and_then(|documents| documents.get(id))
                            .cloned()
                    });
                    if slot.is_some() {
                        return Err(duplicate_id(*collection, *id));
                    }
                    *slot = Some(document.clone());
                }
                StagedWrite::Update {
                    collection,
                    id,
                    condition,
                    patch,
                } => {
                    let slot = touched.entry((*collection, *id)).or_insert_with(|| {
                        committed
                            .get(collection)
                            .and_then(|documents| documents.get(id))
                            .cloned()
                    });
                    let holds = slot
                        .as_ref()
                        .is_some_and(|document| matches_condition(document, condition));
                    if !holds {
                        tracing::debug!(
                            txn_id = %self.txn_id,
                            collection = %collection,
                            document_id = %id,
                            "update condition no longer holds at commit"
                        );
                        return Err(StoreError::WriteConflict {
                            reason: format!("condition on {collection}/{id} no longer holds"),
                        });
                    }
                    if let Some(document) = slot.as_mut() {
                        merge_patch(document, patch.clone());
                    }
                }
            }
        }

        for ((collection, id), document) in touched {
            if let Some(document) = document {
                committed.entry(collection).or_default().insert(id, document);
            }
        }

        tracing::debug!(
            txn_id = %self.txn_id,
            writes = self.writes.len(),
            "memory transaction committed"
        );
        Ok(())
    }

    async fn abort(self: Box<Self>) {
        tracing::debug!(
            txn_id = %self.txn_id,
            discarded_writes = self.writes.len(),
            "memory transaction aborted"
        );
    }
}

fn assign_id(document: &mut Document) -> StoreResult<Uuid> {
    match document_id(document)? {
        Some(id) => Ok(id),
        None => {
            let id = Uuid::new_v4();
            document.insert(fields::ID.to_string(), Value::String(id.to_string()));
            Ok(id)
        }
    }
}

fn duplicate_id(collection: Collection, id: Uuid) -> StoreError {
    StoreError::ConstraintViolation {
        reason: format!("duplicate id {id} in {collection}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn unconverted() -> Document {
        doc(json!({"converted": false}))
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let store = InMemoryStore::new();
        let mut txn = store.begin_transaction().await.unwrap();
        let id = txn
            .insert(Collection::Accounts, doc(json!({"name": "Acme"})))
            .await
            .unwrap();

        assert!(store.get(Collection::Accounts, id).is_none());
        txn.commit().await.unwrap();
        assert_eq!(
            store.get(Collection::Accounts, id).unwrap()["name"],
            json!("Acme")
        );
    }

    #[tokio::test]
    async fn test_abort_and_drop_discard_writes() {
        let store = InMemoryStore::new();

        let mut txn = store.begin_transaction().await.unwrap();
        txn.insert(Collection::Contacts, doc(json!({"last_name": "Doe"})))
            .await
            .unwrap();
        txn.abort().await;

        let mut dropped = store.begin_transaction().await.unwrap();
        dropped
            .insert(Collection::Contacts, doc(json!({"last_name": "Roe"})))
            .await
            .unwrap();
        drop(dropped);

        assert_eq!(store.count(Collection::Contacts), 0);
    }

    #[tokio::test]
    async fn test_insert_honours_payload_id_and_rejects_duplicates() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        store
            .seed(Collection::Accounts, doc(json!({"id": id.to_string()})))
            .unwrap();

        let mut txn = store.begin_transaction().await.unwrap();
        let err = txn
            .insert(Collection::Accounts, doc(json!({"id": id.to_string()})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation { .. }));

        let fresh = Uuid::new_v4();
        let inserted = txn
            .insert(Collection::Accounts, doc(json!({"id": fresh.to_string()})))
            .await
            .unwrap();
        assert_eq!(inserted, fresh);
    }

    #[tokio::test]
    async fn test_update_if_applies_only_when_condition_holds() {
        let store = InMemoryStore::new();
        let lead_id = store
            .seed(Collection::Leads, doc(json!({"converted": true})))
            .unwrap();

        let mut txn = store.begin_transaction().await.unwrap();
        let applied = txn
            .update_if(
                Collection::Leads,
                lead_id,
                &unconverted(),
                doc(json!({"status": "Qualified"})),
            )
            .await
            .unwrap();
        assert!(!applied);

        let missing = txn
            .update_if(
                Collection::Leads,
                Uuid::new_v4(),
                &unconverted(),
                doc(json!({"converted": true})),
            )
            .await
            .unwrap();
        assert!(!missing);
    }

    #[tokio::test]
    async fn test_losing_commit_is_a_write_conflict() {
        let store = InMemoryStore::new();
        let lead_id = store
            .seed(Collection::Leads, doc(json!({"converted": false})))
            .unwrap();

        let mut first = store.begin_transaction().await.unwrap();
        let mut second = store.begin_transaction().await.unwrap();
        for txn in [&mut first, &mut second] {
            txn.insert(Collection::Accounts, doc(json!({"name": "Acme"})))
                .await
                .unwrap();
            let applied = txn
                .update_if(
                    Collection::Leads,
                    lead_id,
                    &unconverted(),
                    doc(json!({"converted": true})),
                )
                .await
                .unwrap();
            assert!(applied);
        }

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(matches!(err, StoreError::WriteConflict { .. }));

        assert_eq!(store.count(Collection::Accounts), 1);
        assert_eq!(
            store.get(Collection::Leads, lead_id).unwrap()["converted"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn test_injected_faults() {
        let store = InMemoryStore::new().with_faults(FaultPlan {
            fail_insert: Some((Collection::Contacts, InjectedFailure::Unavailable)),
            guard_misses: 1,
            ..FaultPlan::default()
        });
        let lead_id = store
            .seed(Collection::Leads, doc(json!({"converted": false})))
            .unwrap();

        let mut txn = store.begin_transaction().await.unwrap();
        let err = txn
            .insert(Collection::Contacts, Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));

        let first = txn
            .update_if(Collection::Leads, lead_id, &unconverted(), Document::new())
            .await
            .unwrap();
        let second = txn
            .update_if(Collection::Leads, lead_id, &unconverted(), Document::new())
            .await
            .unwrap();
        assert!(!first);
        assert!(second);

        store.set_faults(FaultPlan {
            fail_commit: true,
            ..FaultPlan::default()
        });
        assert!(matches!(
            txn.commit().await.unwrap_err(),
            StoreError::Unavailable { .. }
        ));
    }
}
