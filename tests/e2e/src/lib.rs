//! End-to-end test support for Revisa
//!
//! Fixture factory shared by the journey tests.

pub mod mocks;
