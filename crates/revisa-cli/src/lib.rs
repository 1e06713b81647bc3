//! Revisa CLI support
//!
//! Settings resolution and snapshot file handling shared by the `revisa`
//! binary and its tests.

pub mod config;
pub mod logging;
pub mod snapshot;
