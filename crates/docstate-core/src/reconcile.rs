//! Idempotent document reconciliation.
//!
//! One call brings a collection into agreement with a declared desired
//! state: probe liveness, check existence, perform at most one corrective
//! mutation, report what happened. No retries; every failure is terminal
//! for the current call.

use tracing::debug;

use docstate_types::document::DocumentId;
use docstate_types::error::StoreError;
use docstate_types::reconcile::{DesiredState, ReconcileOutcome, ReconcileRequest};

use crate::store::DocumentStore;

/// Reconcile a single document against the store.
///
/// Exactly one of {no mutation, one insert, one delete} occurs per call,
/// and never more than the first matching document is touched. In check
/// mode the outcome reports the intended change but no mutation is
/// performed; a check-mode insert reports the all-zero placeholder id in
/// place of the identifier the store would have assigned.
///
/// Fails with `StoreError::Unavailable` if the liveness probe fails; in
/// that case no find/insert/delete is issued and no partial outcome is
/// returned. Errors from the mutation itself propagate untouched.
pub async fn reconcile<S: DocumentStore>(
    store: &S,
    request: &ReconcileRequest,
) -> Result<ReconcileOutcome, StoreError> {
    store.ping().await?;

    // Existence check only: id projection, first match in natural order.
    let existing = store.find_one(&request.document).await?;
    debug!(
        state = %request.state,
        check_mode = request.check_mode,
        found = existing.is_some(),
        "probed collection"
    );

    let mut outcome = ReconcileOutcome::unchanged();

    match existing {
        None => {
            outcome.found = false;
            if request.state == DesiredState::Present {
                if request.check_mode {
                    outcome.id = Some(DocumentId::placeholder());
                } else {
                    let id = store.insert_one(&request.document).await?;
                    debug!(%id, "inserted document");
                    outcome.id = Some(id);
                }
                outcome.changed = true;
            }
        }
        Some(id) => {
            outcome.found = true;
            if request.state == DesiredState::Absent {
                if !request.check_mode {
                    // The delete re-applies the filter rather than using the
                    // matched id; if the collection changed since the probe,
                    // a different first match may be removed. Known
                    // limitation carried over from the original behavior.
                    store.delete_one(&request.document).await?;
                    debug!(%id, "deleted first matching document");
                }
                outcome.changed = true;
            }
            outcome.id = Some(id);
        }
    }

    Ok(outcome)
}
