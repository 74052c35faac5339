// Path: crates/state/src/lib.rs
//! # zoracle State Crate Lints
//!
//! Panics are disallowed in non-test code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # zoracle State
//!
//! State backends implementing [`zoracle_api::state::StateAccess`].

pub mod memory;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::memory::InMemoryState;
}
