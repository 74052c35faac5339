// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]
//! # zoracle Services
//!
//! The oracle module as a [`zoracle_api::services::BlockchainService`]: data
//! source and oracle script registry, request creation, report collection and
//! end-block resolution.

pub mod oracle;

pub use oracle::{OracleModule, StaticValidatorSet, StoreReporterRegistry};
