//! Shared factory plumbing

#![allow(dead_code)]

use async_trait::async_trait;
use lead_conversion::persistence::{to_document, Collection, PersistenceStore, StoreResult, Txn};
use serde::Serialize;

pub type FactoryResult<T> = StoreResult<T>;

/// Factories that can persist what they build
#[async_trait]
pub trait StoreFactory<T>
where
    T: Serialize + Send + Sync + 'static,
{
    fn collection(&self) -> Collection;

    fn build(&self) -> T;

    async fn create(&self, store: &dyn PersistenceStore) -> FactoryResult<T> {
        let model = self.build();
        insert_committed(store, self.collection(), &model).await?;
        Ok(model)
    }
}

/// Insert one document in its own committed transaction
pub async fn insert_committed<T: Serialize + Sync>(
    store: &dyn PersistenceStore,
    collection: Collection,
    model: &T,
) -> FactoryResult<()> {
    let document = to_document(model)?;
    let mut txn = store.begin_transaction().await?;
    txn.insert(collection, document).await?;
    txn.commit().await
}
