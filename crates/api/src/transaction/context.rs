// Path: crates/api/src/transaction/context.rs
//! Defines the context a message or end-block hook executes in.

use crate::transaction::GasMeter;
use zoracle_types::app::{AccAddress, OracleEvent};

/// Per-execution context handed to services.
///
/// Carries the block height, the authenticated signer, the transaction gas
/// meter and the events emitted so far.
#[derive(Debug, Clone)]
pub struct TxContext {
    /// The current block height being processed.
    pub block_height: u64,
    /// The account that signed the current transaction. Authoritative for
    /// permission checks.
    pub signer: AccAddress,
    /// Gas charged to the transaction.
    pub gas_meter: GasMeter,
    /// True when the chain itself initiated the call (end-block, genesis).
    pub is_internal: bool,
    /// Events emitted during execution, in order.
    pub events: Vec<OracleEvent>,
}

impl TxContext {
    /// A context for a user transaction.
    pub fn new(block_height: u64, signer: AccAddress, gas_limit: u64) -> Self {
        Self {
            block_height,
            signer,
            gas_meter: GasMeter::new(gas_limit),
            is_internal: false,
            events: Vec::new(),
        }
    }

    /// A context for chain-initiated work at `block_height`.
    pub fn internal(block_height: u64) -> Self {
        Self {
            block_height,
            signer: AccAddress::default(),
            gas_meter: GasMeter::infinite(),
            is_internal: true,
            events: Vec::new(),
        }
    }

    /// Records an event.
    pub fn emit(&mut self, event: OracleEvent) {
        self.events.push(event);
    }
}
