#![allow(dead_code)]

pub mod scripted_resolver;

pub use match_setup::{pid, play_round_passing, service, service_with, TestService};
pub use scripted_resolver::ScriptedResolver;
