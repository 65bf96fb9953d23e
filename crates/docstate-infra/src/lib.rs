//! Infrastructure implementations for docstate.
//!
//! `sqlite` holds the SQLite-backed `DocumentStore`, `memory` an in-process
//! one, and `crypto` the text cipher filter pair. Identifier minting is
//! shared between adapters in `oid`.

pub mod crypto;
pub mod memory;
pub mod oid;
pub mod sqlite;
