//! Service layer - orchestration on top of the pure rules and the match store.

pub mod match_flow;

pub use match_flow::{MatchFlowService, MutationResult, PlayerCommand, SeatOptions};
