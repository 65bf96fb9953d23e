//! SQLite-backed document store.

pub mod collection;
pub mod pool;

pub use collection::SqliteDocumentStore;
pub use pool::DatabasePool;
