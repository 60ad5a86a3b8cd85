//! Rules engine test support utilities
//!
//! This crate provides utilities shared by the engine's integration tests:
//! unified logging initialization and a common proptest configuration.

pub mod proptest_config;
pub mod test_logging;
