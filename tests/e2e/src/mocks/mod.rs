//! Test data

pub mod fixtures;
