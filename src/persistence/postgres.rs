//! PostgreSQL-backed document store.
//!
//! Each collection is a table of `(id UUID PRIMARY KEY, body JSONB)` rows.
//! The conditional update is a single statement,
//! `UPDATE … SET body = body || $patch WHERE id = $id AND body @> $condition`,
//! where condition keys expecting `false` are checked separately so that an
//! absent key also matches. PostgreSQL evaluates the condition and the write
//! atomically:
//! a concurrent transaction holding the row lock makes this one wait, and
//! once it commits the condition is re-evaluated against the new row.

use super::{
    document_id, Collection, Document, PersistenceStore, StoreError, StoreResult, Txn,
};
use crate::config::DatabaseConfig;
use crate::constants::fields;
use crate::database::{DatabaseConnection, DatabaseMigrations};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let connection = DatabaseConnection::connect(config)
            .await
            .map_err(|e| classify(e, "connect"))?;
        Ok(Self::new(connection.into_pool()))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        DatabaseMigrations::run_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {e}")))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PersistenceStore for PgDocumentStore {
    async fn begin_transaction(&self) -> StoreResult<Box<dyn Txn>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(e, "begin"))?;
        Ok(Box::new(PgTxn { tx }))
    }

    async fn fetch(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Document>> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", collection.table_name());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "fetch"))?;

        match row {
            Some(row) => {
                let Json(body): Json<Value> = row
                    .try_get("body")
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                match body {
                    Value::Object(document) => Ok(Some(document)),
                    other => Err(StoreError::Serialization(format!(
                        "{collection}/{id} body is not an object: {other}"
                    ))),
                }
            }
            None => Ok(None),
        }
    }
}

/// An open PostgreSQL transaction; dropping it rolls back
pub struct PgTxn {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Txn for PgTxn {
    async fn insert(&mut self, collection: Collection, mut payload: Document) -> StoreResult<Uuid> {
        let id = match document_id(&payload)? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                payload.insert(fields::ID.to_string(), Value::String(id.to_string()));
                id
            }
        };

        let sql = format!(
            "INSERT INTO {} (id, body, created_at, updated_at) VALUES ($1, $2, NOW(), NOW())",
            collection.table_name()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(payload)))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| classify(e, "insert"))?;

        Ok(id)
    }

    async fn update_if(
        &mut self,
        collection: Collection,
        id: Uuid,
        condition: &Document,
        patch: Document,
    ) -> StoreResult<bool> {
        let (contained, false_or_absent) = split_condition(condition);
        let sql = format!(
            "UPDATE {} SET body = body || $3, updated_at = NOW() \
             WHERE id = $1 AND body @> $2 \
             AND NOT EXISTS (SELECT 1 FROM unnest($4::text[]) AS flag(key) \
                             WHERE COALESCE(body -> flag.key, 'false'::jsonb) <> 'false'::jsonb)",
            collection.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(contained)))
            .bind(Json(Value::Object(patch)))
            .bind(false_or_absent)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| classify(e, "update_if"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await.map_err(|e| classify(e, "commit"))
    }

    async fn abort(self: Box<Self>) {
        if let Err(e) = self.tx.rollback().await {
            tracing::warn!(error = %e, "rollback failed; connection will be discarded");
        }
    }
}

/// Separate keys expecting `false`, which may also be absent, from keys
/// that must be contained in the stored body
fn split_condition(condition: &Document) -> (Document, Vec<String>) {
    let mut contained = Document::new();
    let mut false_or_absent = Vec::new();
    for (key, expected) in condition {
        if *expected == Value::Bool(false) {
            false_or_absent.push(key.clone());
        } else {
            contained.insert(key.clone(), expected.clone());
        }
    }
    (contained, false_or_absent)
}

/// Map a driver error onto the store taxonomy
fn classify(err: sqlx::Error, operation: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // unique, foreign key, check, not-null
            Some("23505" | "23503" | "23514" | "23502") => StoreError::ConstraintViolation {
                reason: format!("{operation}: {}", db.message()),
            },
            // serialization failure, deadlock
            Some("40001" | "40P01") => StoreError::WriteConflict {
                reason: format!("{operation}: {}", db.message()),
            },
            _ => StoreError::Database(format!("{operation}: {err}")),
        },
        sqlx::Error::PoolTimedOut => StoreError::Timeout {
            operation: operation.to_string(),
        },
        sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable {
            reason: format!("{operation}: {err}"),
        },
        _ => StoreError::Database(format!("{operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_condition_keys_are_split_out() {
        let mut condition = Document::new();
        condition.insert("converted".to_string(), Value::Bool(false));
        condition.insert("status".to_string(), Value::String("New".to_string()));

        let (contained, false_or_absent) = split_condition(&condition);

        assert_eq!(false_or_absent, vec!["converted".to_string()]);
        assert_eq!(contained.len(), 1);
        assert_eq!(contained["status"], Value::String("New".to_string()));
    }

    #[test]
    fn test_pool_errors_are_classified_as_unavailable() {
        assert_eq!(
            classify(sqlx::Error::PoolTimedOut, "begin"),
            StoreError::Timeout {
                operation: "begin".to_string()
            }
        );
        assert!(matches!(
            classify(sqlx::Error::PoolClosed, "commit"),
            StoreError::Unavailable { .. }
        ));
        assert!(matches!(
            classify(sqlx::Error::RowNotFound, "fetch"),
            StoreError::Database(_)
        ));
    }
}
