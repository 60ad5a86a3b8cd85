//! Property-based tests for economy invariants.
//! Random operation sequences must never break conservation or bounds.

use proptest::prelude::*;

use crate::domain::economy_validation::validate_economy;
use crate::domain::population::{place_population_cube, remove_population_cube};
use crate::domain::production::execute_upkeep;
use crate::domain::tables::{production_value, upkeep_cost, MAX_CUBES};
use crate::domain::test_gens::{apply_op, econ_ops, resource};
use crate::domain::{test_prelude, PlayerEconomy, PlayerId};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: Conservation
    /// After every public operation, disks and colony ships are conserved and
    /// no counter leaves its bounds.
    #[test]
    fn prop_economy_invariants_hold_after_every_op(ops in econ_ops()) {
        let mut econ = PlayerEconomy::new(PlayerId::from("p1"));
        for op in &ops {
            match apply_op(&econ, op) {
                Ok(next) => econ = next,
                Err(err) => prop_assert!(err.is_rule_violation(), "{op:?} -> {err:?}"),
            }
            let violations = validate_economy(&econ);
            prop_assert!(violations.is_empty(), "after {op:?}: {violations:?}");

            let inf = &econ.influence;
            prop_assert_eq!(inf.on_track + inf.on_actions + inf.on_sectors, inf.total_available);
            prop_assert_eq!(inf.upkeep_cost, upkeep_cost(inf.on_track));
            let ships = &econ.colony_ships;
            prop_assert_eq!(ships.available + ships.used, ships.total);
        }
    }

    /// Property: Upkeep clamps money at zero and reports exactly the uncovered part.
    #[test]
    fn prop_upkeep_shortfall_accounts_for_clamp(
        ops in econ_ops(),
        money in 0i32..40,
    ) {
        let mut econ = PlayerEconomy::new(PlayerId::from("p1"));
        for op in &ops {
            if let Ok(next) = apply_op(&econ, op) {
                econ = next;
            }
        }
        econ.resources.money = money;

        let outcome = execute_upkeep(&econ).unwrap();
        prop_assert!(outcome.economy.resources.money >= 0);
        prop_assert!(outcome.shortfall >= 0);
        prop_assert_eq!(
            outcome.economy.resources.money - outcome.shortfall,
            money + outcome.production.net_money_income
        );
        prop_assert_eq!(
            outcome.economy.resources.science,
            econ.resources.science + outcome.production.science_income
        );
    }

    /// Property: Round-trip
    /// Placing then removing a cube (within bounds) restores the track.
    #[test]
    fn prop_place_remove_round_trip(
        resource in resource(),
        remaining in 1i32..=MAX_CUBES,
    ) {
        let mut econ = PlayerEconomy::new(PlayerId::from("p1"));
        let track = econ.population.get_mut(resource);
        track.cubes_remaining = remaining;
        track.production_value = production_value(remaining);

        let placed = place_population_cube(&econ, resource).unwrap();
        prop_assert_eq!(placed.population.get(resource).cubes_remaining, remaining - 1);
        let restored = remove_population_cube(&placed, resource).unwrap();
        prop_assert_eq!(restored.population.get(resource), econ.population.get(resource));
    }

    /// Property: Monotonic production table
    #[test]
    fn prop_production_non_increasing(a in -5i32..20, b in -5i32..20) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if (0..=MAX_CUBES).contains(&lo) && (0..=MAX_CUBES).contains(&hi) {
            prop_assert!(production_value(lo) >= production_value(hi));
        }
    }

    /// Property: Monotonic upkeep table
    #[test]
    fn prop_upkeep_non_increasing(a in 0i32..=16, b in 0i32..=16) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(upkeep_cost(lo) >= upkeep_cost(hi));
    }
}
