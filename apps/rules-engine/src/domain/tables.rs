//! Fixed lookup tables for population production and influence upkeep.
//!
//! Both tables are literal values taken from the physical board, not formulas.
//! They are a compatibility contract: change them only together with every
//! stored match that depends on them.

/// Population cubes per resource track.
pub const MAX_CUBES: i32 = 13;
/// Influence disks a player starts with on the track.
pub const STARTING_DISKS: i32 = 13;
/// Disks the track can hold, including up to three bonus disks.
pub const MAX_TRACK_DISKS: i32 = 16;

/// Production per round indexed by cubes remaining on the track (0..=13).
pub const PRODUCTION_TABLE: [i32; 14] = [13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];

/// Money upkeep per round indexed by disks left on the track (0..=16).
pub const UPKEEP_TABLE: [i32; 17] = [30, 28, 26, 24, 21, 18, 15, 12, 10, 8, 6, 5, 3, 0, 0, 0, 0];

/// Production for a track with `cubes_remaining` cubes; out of range is 0.
pub fn production_value(cubes_remaining: i32) -> i32 {
    usize::try_from(cubes_remaining)
        .ok()
        .and_then(|idx| PRODUCTION_TABLE.get(idx).copied())
        .unwrap_or(0)
}

/// Upkeep for `disks_on_track` disks; out of range costs the maximum.
pub fn upkeep_cost(disks_on_track: i32) -> i32 {
    usize::try_from(disks_on_track)
        .ok()
        .and_then(|idx| UPKEEP_TABLE.get(idx).copied())
        .unwrap_or(UPKEEP_TABLE[0])
}
