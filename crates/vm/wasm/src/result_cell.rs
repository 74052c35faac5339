// Path: crates/vm/wasm/src/result_cell.rs

/// Holds the bytes a script passes to `save_result`.
///
/// The cell is single-assignment in intent: a well-behaved script saves once.
/// A script that saves more than once is not rejected; the last write wins
/// and `writes` records how many times it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCell {
    value: Option<Vec<u8>>,
    writes: u32,
}

impl ResultCell {
    /// Stores `bytes`, replacing any earlier value.
    pub fn set(&mut self, bytes: Vec<u8>) {
        if self.value.is_some() {
            log::debug!("save_result called again; previous value replaced");
        }
        self.value = Some(bytes);
        self.writes = self.writes.saturating_add(1);
    }

    /// True once `set` has been called.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// How many times `set` was called.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// The stored bytes, or empty if nothing was saved.
    pub fn into_inner(self) -> Vec<u8> {
        self.value.unwrap_or_default()
    }
}
