// Path: crates/api/src/transaction/mod.rs
//! Transaction context and gas metering.

mod context;
mod gas;

pub use context::TxContext;
pub use gas::GasMeter;
