// Path: crates/api/src/state/mod.rs
//! Key-value state access.
//!
//! - `StateAccess`: the key-ordered store the oracle module reads and writes.
//! - `StateOverlay`: a copy-on-write layer giving commit-or-discard semantics
//!   per processed message.

use std::sync::Arc;
use zoracle_types::codec::{from_bytes_canonical, to_bytes_canonical};
use zoracle_types::error::StateError;

/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod overlay;

pub use accessor::*;
pub use overlay::*;

/// Reads and decodes a SCALE value.
pub fn get_decoded<T: parity_scale_codec::Decode>(
    state: &dyn StateAccess,
    key: &[u8],
) -> Result<Option<T>, StateError> {
    match state.get(key)? {
        Some(bytes) => from_bytes_canonical(&bytes)
            .map(Some)
            .map_err(StateError::Decode),
        None => Ok(None),
    }
}

/// Encodes and writes a SCALE value.
pub fn put_encoded<T: parity_scale_codec::Encode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    value: &T,
) -> Result<(), StateError> {
    state.insert(key, &to_bytes_canonical(value))
}

/// Collects and decodes every value under `prefix`, in key order.
pub fn scan_decoded<T: parity_scale_codec::Decode>(
    state: &dyn StateAccess,
    prefix: &[u8],
) -> Result<Vec<T>, StateError> {
    state
        .prefix_scan(prefix)?
        .map(|item| {
            let (_, value) = item?;
            from_bytes_canonical(&value).map_err(StateError::Decode)
        })
        .collect()
}
