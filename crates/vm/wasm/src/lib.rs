// Path: crates/vm/wasm/src/lib.rs
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]
//! # zoracle WASM sandbox
//!
//! Runs the `prepare` and `execute` entry points of oracle scripts under
//! wasmtime with fuel metering, bounded memory and tables, canonical NaNs and
//! no SIMD or threads. Scripts talk to the host through the functions in the
//! `env` import module (see [`host`]).

pub mod host;
mod result_cell;
mod runtime;
mod validate;

pub use result_cell::ResultCell;
pub use runtime::OwasmRuntime;
