//! In-process document store.
//!
//! Implements `DocumentStore` over a mutex-guarded `Vec`, keeping the
//! same contract as the SQLite adapter: insertion order is the natural
//! order and filter matching is top-level subset. Useful in tests and as
//! a throwaway backend; nothing persists beyond the process.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use docstate_core::store::DocumentStore;
use docstate_types::document::{Document, DocumentId};
use docstate_types::error::StoreError;

use crate::oid;

/// Mutex-guarded in-process document collection.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<Vec<(DocumentId, Document)>>,
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next pings fail, simulating an unreachable store.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.docs.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    async fn find_one(&self, filter: &Document) -> Result<Option<DocumentId>, StoreError> {
        let docs = self.docs.lock().expect("store mutex poisoned");
        Ok(docs
            .iter()
            .find(|(_, doc)| filter.matches(doc))
            .map(|(id, _)| id.clone()))
    }

    async fn insert_one(&self, document: &Document) -> Result<DocumentId, StoreError> {
        let id = oid::generate();
        self.docs
            .lock()
            .expect("store mutex poisoned")
            .push((id.clone(), document.clone()));
        Ok(id)
    }

    async fn delete_one(&self, filter: &Document) -> Result<(), StoreError> {
        let mut docs = self.docs.lock().expect("store mutex poisoned");
        if let Some(pos) = docs.iter().position(|(_, doc)| filter.matches(doc)) {
            docs.remove(pos);
        }
        Ok(())
    }
}
