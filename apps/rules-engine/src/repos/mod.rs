//! Repository traits for domain layer.

pub mod matches;

pub use matches::{MatchRecord, MatchStore, Versioned, INITIAL_VERSION};
