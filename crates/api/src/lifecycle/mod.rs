// Path: crates/api/src/lifecycle/mod.rs
//! Block lifecycle hooks. The oracle module resolves its pending queue and
//! sweeps expired requests here.

use crate::services::BlockchainService;
use crate::state::StateAccess;
use crate::transaction::TxContext;
use async_trait::async_trait;
use zoracle_types::OracleError;

/// Implemented by services that run once per block, after the last transaction.
///
/// Writes go to `state` directly; a hook that must stay atomic per item wraps
/// each item in its own overlay.
#[async_trait]
pub trait OnEndBlock: BlockchainService {
    /// `ctx.block_height` is the height of the block being closed.
    async fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
    ) -> Result<(), OracleError>;
}
