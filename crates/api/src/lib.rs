// Path: crates/api/src/lib.rs

//! # zoracle API Crate Lints
//!
//! Panics are disallowed in non-test code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # zoracle API
//!
//! The traits the oracle module consumes from its host: a key-ordered store with
//! transactional overlays, a transaction context with gas metering, service and
//! end-block hooks, validator selection, reporter authorisation and the script
//! sandbox.

/// Re-exports the error types from `zoracle-types`.
pub mod error;
/// Defines traits for services that hook into the block processing lifecycle.
pub mod lifecycle;
/// Pluggable strategies the oracle consults: validator selection and reporter authorisation.
pub mod oracle;
/// The base trait for services dispatched by the host.
pub mod services;
/// Key-value state access and copy-on-write overlays.
pub mod state;
/// Transaction context and gas metering.
pub mod transaction;
/// The deterministic script sandbox seam.
pub mod vm;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::error::{ErrorCode, OracleError, StateError, VmError};
    pub use crate::lifecycle::OnEndBlock;
    pub use crate::oracle::{ReporterAuthorization, ValidatorSelector};
    pub use crate::services::BlockchainService;
    pub use crate::state::{StateAccess, StateOverlay};
    pub use crate::transaction::{GasMeter, TxContext};
    pub use crate::vm::{
        EntryPoint, ExecutionEnvironment, ExecutionOutput, ExecutionStatus, ScriptRuntime,
    };
}
