//! Seeded dice battle resolver.
//!
//! Volleys run until one side has no live ships. Within a volley, ships fire
//! in descending initiative; on equal initiative the defender (`player_b`)
//! fires first. Every die is a d6: a 6 always hits, a 1 always misses, and
//! otherwise the roll must reach `TO_HIT + shield` of the target.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::combat::{CombatOutcome, CombatResolver, ShipSnapshot};
use crate::domain::PlayerId;

/// Base roll needed to hit an unshielded ship.
pub const TO_HIT: u8 = 5;
/// Volley cap; a fleet that cannot finish the job loses to the defender.
pub const MAX_VOLLEYS: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct DiceCombatResolver;

impl DiceCombatResolver {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

fn live(fleet: &[ShipSnapshot]) -> bool {
    fleet.iter().any(|s| s.alive)
}

/// Firing order for one volley: (side, ship index).
fn firing_order(fleet_a: &[ShipSnapshot], fleet_b: &[ShipSnapshot]) -> Vec<(Side, usize)> {
    let mut order: Vec<(Side, usize, u8)> = fleet_a
        .iter()
        .enumerate()
        .map(|(i, s)| (Side::A, i, s.initiative))
        .chain(fleet_b.iter().enumerate().map(|(i, s)| (Side::B, i, s.initiative)))
        .collect();
    order.sort_by(|x, y| {
        y.2.cmp(&x.2)
            .then_with(|| (x.0 == Side::A).cmp(&(y.0 == Side::A)))
            .then_with(|| x.1.cmp(&y.1))
    });
    order.into_iter().map(|(side, idx, _)| (side, idx)).collect()
}

fn roll_hits(roll: u8, shield: u8) -> bool {
    match roll {
        6 => true,
        1 => false,
        r => r >= TO_HIT.saturating_add(shield),
    }
}

/// Roll one die and apply `damage` to the first live ship it hits.
fn assign_hit(targets: &mut [ShipSnapshot], rng: &mut ChaCha8Rng, damage: u8) -> Option<usize> {
    let roll: u8 = rng.random_range(1..=6);
    let idx = targets.iter().position(|s| s.alive && roll_hits(roll, s.shield))?;
    let target = &mut targets[idx];
    target.hull -= i32::from(damage);
    if target.hull <= 0 {
        target.hull = 0;
        target.alive = false;
    }
    Some(idx)
}

impl CombatResolver for DiceCombatResolver {
    fn simulate(
        &self,
        seed: u64,
        player_a: &PlayerId,
        player_b: &PlayerId,
        fleet_a: &[ShipSnapshot],
        fleet_b: &[ShipSnapshot],
    ) -> CombatOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut a = fleet_a.to_vec();
        let mut b = fleet_b.to_vec();
        let mut round_log = Vec::new();
        let order = firing_order(&a, &b);

        let mut volley = 0;
        while live(&a) && live(&b) && volley < MAX_VOLLEYS {
            volley += 1;
            for &(side, idx) in &order {
                let (shooter, targets, owner) = match side {
                    Side::A => (&a[idx], &mut b, player_a),
                    Side::B => (&b[idx], &mut a, player_b),
                };
                if !shooter.alive {
                    continue;
                }
                for weapon in &shooter.weapons {
                    for _ in 0..weapon.dice {
                        if let Some(hit) = assign_hit(targets, &mut rng, weapon.damage) {
                            round_log.push(format!(
                                "volley {volley}: {owner} ship {idx} hits ship {hit} for {}",
                                weapon.damage
                            ));
                        }
                    }
                }
                if !live(targets) {
                    break;
                }
            }
        }

        let winner = if live(&a) && !live(&b) {
            player_a.clone()
        } else {
            player_b.clone()
        };
        round_log.push(format!("{winner} holds the sector after {volley} volleys"));

        CombatOutcome {
            winner,
            round_log,
            final_fleet_a: a,
            final_fleet_b: b,
        }
    }
}
