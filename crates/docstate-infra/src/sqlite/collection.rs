//! SQLite implementation of `DocumentStore`.
//!
//! Documents live as JSON text in the `documents` table, scoped by
//! collection name. Natural order is insertion order (ascending `seq`
//! rowid). Filter matching is evaluated client-side with the same
//! top-level subset semantics the reconciler's contract specifies, so
//! "first match" always means first in insertion order.

use chrono::Utc;
use futures_util::TryStreamExt;
use sqlx::Row;
use tracing::debug;

use docstate_core::store::DocumentStore;
use docstate_types::document::{Document, DocumentId};
use docstate_types::error::StoreError;

use crate::oid;
use super::pool::DatabasePool;

/// SQLite-backed document collection.
pub struct SqliteDocumentStore {
    pool: DatabasePool,
    collection: String,
}

impl SqliteDocumentStore {
    /// Create a store over one named collection in the given database.
    pub fn new(pool: DatabasePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }

    /// Scan the collection in natural order and return the first document
    /// matching the filter, if any. Rows are streamed; the scan stops at
    /// the first match instead of materializing the whole collection.
    async fn first_match(&self, filter: &Document) -> Result<Option<DocumentId>, StoreError> {
        let mut rows =
            sqlx::query("SELECT doc_id, body FROM documents WHERE collection = ? ORDER BY seq")
                .bind(&self.collection)
                .fetch(&self.pool.reader);

        while let Some(row) = rows
            .try_next()
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?
        {
            let doc_id: String = row
                .try_get("doc_id")
                .map_err(|e| StoreError::Operation(e.to_string()))?;
            let body: String = row
                .try_get("body")
                .map_err(|e| StoreError::Operation(e.to_string()))?;

            let stored: Document = serde_json::from_str(&body)
                .map_err(|e| StoreError::Operation(format!("corrupt stored document: {e}")))?;

            if filter.matches(&stored) {
                return Ok(Some(DocumentId::new(doc_id)));
            }
        }

        Ok(None)
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool.reader)
            .await
            .map(|_| ())
            .map_err(|_| StoreError::Unavailable)
    }

    async fn find_one(&self, filter: &Document) -> Result<Option<DocumentId>, StoreError> {
        self.first_match(filter).await
    }

    async fn insert_one(&self, document: &Document) -> Result<DocumentId, StoreError> {
        let id = oid::generate();
        let body = serde_json::to_string(&document.to_value())
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        sqlx::query(
            "INSERT INTO documents (collection, doc_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&self.collection)
        .bind(id.as_str())
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Operation(e.to_string()))?;

        debug!(collection = %self.collection, %id, "inserted document");
        Ok(id)
    }

    async fn delete_one(&self, filter: &Document) -> Result<(), StoreError> {
        // Re-applies the filter; whichever document is first in natural
        // order at this moment is the one removed.
        let Some(id) = self.first_match(filter).await? else {
            return Ok(());
        };

        sqlx::query("DELETE FROM documents WHERE doc_id = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        debug!(collection = %self.collection, %id, "deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstate_core::reconcile::reconcile;
    use docstate_types::reconcile::{DesiredState, ReconcileRequest};
    use serde_json::json;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn doc(value: serde_json::Value) -> Document {
        Document::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_ping_on_fresh_database() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_ping_on_closed_pool_is_unavailable() {
        let pool = test_pool().await;
        let store = SqliteDocumentStore::new(pool.clone(), "mycollection");
        pool.close().await;

        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));
        assert_eq!(err.to_string(), "Server not available");
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");

        let id = store.insert_one(&doc(json!({"key": "value"}))).await.unwrap();
        let found = store.find_one(&doc(json!({"key": "value"}))).await.unwrap();

        assert_eq!(found, Some(id));
    }

    #[tokio::test]
    async fn test_find_no_match_returns_none() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        store.insert_one(&doc(json!({"key": "value"}))).await.unwrap();

        let found = store.find_one(&doc(json!({"key": "other"}))).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_find_honors_insertion_order() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");

        let first = store
            .insert_one(&doc(json!({"key": "value", "n": 1})))
            .await
            .unwrap();
        let _second = store
            .insert_one(&doc(json!({"key": "value", "n": 2})))
            .await
            .unwrap();

        let found = store.find_one(&doc(json!({"key": "value"}))).await.unwrap();
        assert_eq!(found, Some(first));
    }

    #[tokio::test]
    async fn test_find_matches_subset_filter() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        let id = store
            .insert_one(&doc(json!({"key": "value", "dictionary": {"item1": "val1"}})))
            .await
            .unwrap();

        let found = store.find_one(&doc(json!({"key": "value"}))).await.unwrap();
        assert_eq!(found, Some(id));
    }

    #[tokio::test]
    async fn test_delete_removes_only_first_match() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");

        let first = store
            .insert_one(&doc(json!({"key": "value", "n": 1})))
            .await
            .unwrap();
        let second = store
            .insert_one(&doc(json!({"key": "value", "n": 2})))
            .await
            .unwrap();

        store.delete_one(&doc(json!({"key": "value"}))).await.unwrap();

        let remaining = store.find_one(&doc(json!({"key": "value"}))).await.unwrap();
        assert_eq!(remaining, Some(second));
        assert_ne!(remaining, Some(first));
    }

    async fn insert_raw_row(pool: &DatabasePool, collection: &str, doc_id: &str, body: &str) {
        sqlx::query(
            "INSERT INTO documents (collection, doc_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(doc_id)
        .bind(body)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_scan_stops_at_first_match() {
        let pool = test_pool().await;
        let store = SqliteDocumentStore::new(pool.clone(), "mycollection");

        let id = store.insert_one(&doc(json!({"key": "value"}))).await.unwrap();
        // A row after the first match is never reached, so even an
        // unreadable body there cannot fail the scan.
        insert_raw_row(&pool, "mycollection", "ffffffffffffffffffffffff", "{broken").await;

        let found = store.find_one(&doc(json!({"key": "value"}))).await.unwrap();
        assert_eq!(found, Some(id));
    }

    #[tokio::test]
    async fn test_corrupt_row_before_match_fails_the_scan() {
        let pool = test_pool().await;
        let store = SqliteDocumentStore::new(pool.clone(), "mycollection");

        insert_raw_row(&pool, "mycollection", "ffffffffffffffffffffffff", "{broken").await;
        store.insert_one(&doc(json!({"key": "value"}))).await.unwrap();

        let err = store.find_one(&doc(json!({"key": "value"}))).await.unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));
        assert!(err.to_string().contains("corrupt stored document"));
    }

    #[tokio::test]
    async fn test_delete_without_match_is_noop() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        store.delete_one(&doc(json!({"key": "value"}))).await.unwrap();
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let pool = test_pool().await;
        let a = SqliteDocumentStore::new(pool.clone(), "alpha");
        let b = SqliteDocumentStore::new(pool, "beta");

        a.insert_one(&doc(json!({"key": "value"}))).await.unwrap();

        assert!(b.find_one(&doc(json!({"key": "value"}))).await.unwrap().is_none());
    }

    // --- End-to-end reconciliation against the real adapter ---

    #[tokio::test]
    async fn test_reconcile_present_then_absent_lifecycle() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        let document = doc(json!({"key": "value", "dictionary": {"item1": "val1"}}));

        let create = reconcile(
            &store,
            &ReconcileRequest::new(document.clone(), DesiredState::Present, false),
        )
        .await
        .unwrap();
        assert!(!create.found);
        assert!(create.changed);
        let id = create.id.clone().unwrap();
        assert_ne!(id, DocumentId::placeholder());

        let repeat = reconcile(
            &store,
            &ReconcileRequest::new(document.clone(), DesiredState::Present, false),
        )
        .await
        .unwrap();
        assert!(repeat.found);
        assert!(!repeat.changed);
        assert_eq!(repeat.id, Some(id.clone()));

        let remove = reconcile(
            &store,
            &ReconcileRequest::new(document.clone(), DesiredState::Absent, false),
        )
        .await
        .unwrap();
        assert!(remove.found);
        assert!(remove.changed);
        assert_eq!(remove.id, Some(id));

        let gone = reconcile(
            &store,
            &ReconcileRequest::new(document, DesiredState::Absent, false),
        )
        .await
        .unwrap();
        assert!(!gone.found);
        assert!(!gone.changed);
    }

    #[tokio::test]
    async fn test_reconcile_check_mode_leaves_store_untouched() {
        let store = SqliteDocumentStore::new(test_pool().await, "mycollection");
        let document = doc(json!({"key": "value"}));

        let outcome = reconcile(
            &store,
            &ReconcileRequest::new(document.clone(), DesiredState::Present, true),
        )
        .await
        .unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.id, Some(DocumentId::placeholder()));
        assert!(store.find_one(&document).await.unwrap().is_none());
    }
}
