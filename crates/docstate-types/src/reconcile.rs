//! Reconciliation request and outcome types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentId};
use crate::error::RequestError;

/// The state the caller declares for the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// The document must exist in the collection.
    #[default]
    Present,
    /// No document matching the filter may remain.
    Absent,
}

impl FromStr for DesiredState {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(RequestError::InvalidState(other.to_string())),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// One reconciliation's input, immutable for the duration of the call.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub document: Document,
    pub state: DesiredState,
    /// Check mode: report what would change without mutating the store.
    pub check_mode: bool,
}

impl ReconcileRequest {
    pub fn new(document: Document, state: DesiredState, check_mode: bool) -> Self {
        Self {
            document,
            state,
            check_mode,
        }
    }
}

/// What one reconciliation did (or, in check mode, would have done).
///
/// Serializes to the host-facing record `{changed, found, _id}`; `_id` is
/// omitted when no document was matched or created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub changed: bool,
    pub found: bool,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
}

impl ReconcileOutcome {
    /// The starting point: nothing changed, nothing found.
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            found: false,
            id: None,
        }
    }
}
