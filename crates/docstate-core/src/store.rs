//! Document store trait.
//!
//! Defines the collection interface the reconciler runs against.
//! Uses RPITIT (native async fn in traits, Rust 2024 edition).
//! Implementations live in docstate-infra.

use docstate_types::document::{Document, DocumentId};
use docstate_types::error::StoreError;

/// A collection of documents with store-assigned identifiers and a stable
/// natural order (insertion order for the shipped implementations).
///
/// The reconciler assumes a ready-to-use handle: connection establishment,
/// authentication, and pooling are the implementation's concern.
pub trait DocumentStore: Send + Sync {
    /// Cheap liveness probe. Must not mutate anything and must fail with
    /// `StoreError::Unavailable` when the store cannot be reached.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Find the first document matching the filter, in natural order,
    /// projected down to its identifier. Existence check only -- at most
    /// one result, and nothing beyond the id is returned.
    fn find_one(
        &self,
        filter: &Document,
    ) -> impl std::future::Future<Output = Result<Option<DocumentId>, StoreError>> + Send;

    /// Insert one document and return the identifier the store assigned.
    fn insert_one(
        &self,
        document: &Document,
    ) -> impl std::future::Future<Output = Result<DocumentId, StoreError>> + Send;

    /// Delete the first document matching the filter, in natural order.
    /// No-op if nothing matches.
    fn delete_one(
        &self,
        filter: &Document,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
