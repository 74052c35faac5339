// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for the oracle module.

mod address;
mod coin;
mod events;
mod oracle;

pub use address::*;
pub use coin::*;
pub use events::*;
pub use oracle::*;
