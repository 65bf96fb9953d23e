//! Shared domain types for docstate.
//!
//! This crate contains the types that cross component boundaries:
//! Document, DocumentId, ReconcileRequest, ReconcileOutcome, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod document;
pub mod error;
pub mod reconcile;
