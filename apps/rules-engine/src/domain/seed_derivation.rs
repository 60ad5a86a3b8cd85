//! RNG seed derivation for deterministic combat replay.
//!
//! The seed key is the plain concatenation of match id, round and sector id,
//! kept alongside every combat report so a battle can be replayed and audited.

use xxhash_rust::xxh3::xxh3_64;

use crate::domain::state::SectorId;

/// Human-readable key a combat seed is derived from.
pub fn combat_seed_key(match_id: &str, round_no: u8, sector_id: &SectorId) -> String {
    format!("{match_id}:{round_no}:{sector_id}")
}

/// Derive the resolver seed for one battle.
///
/// Same (match, round, sector) always yields the same seed.
pub fn derive_combat_seed(match_id: &str, round_no: u8, sector_id: &SectorId) -> u64 {
    xxh3_64(combat_seed_key(match_id, round_no, sector_id).as_bytes())
}
