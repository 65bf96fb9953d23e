//! Reconciliation logic and store traits for docstate.
//!
//! The `store` module defines the collection interface; implementations
//! live in docstate-infra. The `reconcile` module brings a store's state
//! into agreement with a caller-declared desired state using at most one
//! corrective mutation.

pub mod reconcile;
pub mod store;
