// Path: crates/api/src/services/mod.rs
//! Traits for services dispatched by the host.

use crate::lifecycle::OnEndBlock;
use crate::state::StateAccess;
use crate::transaction::TxContext;
use async_trait::async_trait;
use std::any::Any;
use zoracle_types::OracleError;

/// The base trait for any service managed by the chain.
///
/// The host routes each message to `handle_service_call` with the state of the
/// current transaction. An `Err` return means the host must discard every write
/// the call made; services that need finer atomicity use a
/// [`crate::state::StateOverlay`] internally.
#[async_trait]
pub trait BlockchainService: Any + Send + Sync {
    /// A unique, static, lowercase identifier used for dispatch.
    fn id(&self) -> &str;

    /// The version of the ABI the service expects from the host.
    fn abi_version(&self) -> u32;

    /// A string identifying the schema of the state this service reads/writes.
    fn state_schema(&self) -> &str;

    /// Provides access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Handles a dispatched call. The default rejects every method.
    async fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext,
    ) -> Result<(), OracleError> {
        let _ = (state, params, ctx);
        Err(OracleError::InvalidMessage(format!(
            "service '{}' does not implement method '{}'",
            self.id(),
            method
        )))
    }

    /// Attempts to downcast this service to an `OnEndBlock` trait object.
    fn as_on_end_block(&self) -> Option<&dyn OnEndBlock> {
        None
    }
}
