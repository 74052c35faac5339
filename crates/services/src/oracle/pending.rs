// Path: crates/services/src/oracle/pending.rs
//! The FIFO of request IDs that reached quorum and await resolution.

use zoracle_api::state::{get_decoded, put_encoded, StateAccess};
use zoracle_types::app::RequestId;
use zoracle_types::keys::PENDING_LIST_KEY;
use zoracle_types::OracleError;

pub(crate) fn load_pending(state: &dyn StateAccess) -> Result<Vec<RequestId>, OracleError> {
    Ok(get_decoded(state, PENDING_LIST_KEY)?.unwrap_or_default())
}

pub(crate) fn store_pending(
    state: &mut dyn StateAccess,
    pending: &[RequestId],
) -> Result<(), OracleError> {
    if pending.is_empty() {
        state.delete(PENDING_LIST_KEY)?;
    } else {
        put_encoded(state, PENDING_LIST_KEY, &pending.to_vec())?;
    }
    Ok(())
}

/// Appends `id`. Enqueueing an ID that is already queued is an invariant
/// violation and reported as `Duplicate`.
pub(crate) fn enqueue_pending(state: &mut dyn StateAccess, id: RequestId) -> Result<(), OracleError> {
    let mut pending = load_pending(&*state)?;
    if pending.contains(&id) {
        return Err(OracleError::Duplicate(format!(
            "request {} is already pending resolution",
            id
        )));
    }
    pending.push(id);
    store_pending(state, &pending)
}
