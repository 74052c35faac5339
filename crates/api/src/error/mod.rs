// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use zoracle_types::error::{ErrorCode, OracleError, StateError, VmError};
