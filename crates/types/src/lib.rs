// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! # zoracle Types
//!
//! The foundational library of the oracle module: identifiers, registry records,
//! requests and reports, module parameters, messages, packet payloads and the
//! error taxonomy shared by every other crate in the workspace.
//!
//! ## Architectural Role
//!
//! `zoracle-types` has no dependency on state, the VM or the services. Everything
//! that is written to consensus state is defined here together with its canonical
//! encoding, so two validators can never disagree on the bytes of a record.

/// Records, identifiers, addresses and coins.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Module parameters and sandbox configuration.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Genesis import/export state.
pub mod genesis;
/// The cross-chain packet payload.
pub mod ibc;
/// Constructors for the state keys owned by the oracle module.
pub mod keys;
/// Messages accepted by the oracle module and the message registry.
pub mod msgs;

pub use error::{ErrorCode, OracleError};
