use crate::domain::colony_ships::{add_bonus_colony_ship, refresh_colony_ships, use_colony_ship};
use crate::domain::economy::{add_resources, can_afford, spend_resources, trade_resources};
use crate::domain::economy_types::PopulationTrack;
use crate::domain::economy_validation::{require_valid_economy, validate_economy};
use crate::domain::influence::{
    add_bonus_influence, place_influence_on_action, place_influence_on_sector,
    return_influence_from_action, return_influence_from_sector,
};
use crate::domain::population::{place_population_cube, remove_population_cube};
use crate::domain::production::{calculate_production, execute_upkeep, reset_influence_after_round};
use crate::domain::tables::upkeep_cost;
use crate::domain::{PlayerEconomy, PlayerId, Resource, ResourceCost, ResourcePool};
use crate::errors::domain::{DomainError, ValidationKind};

fn econ() -> PlayerEconomy {
    PlayerEconomy::new(PlayerId::from("p1"))
}

fn assert_validation(err: DomainError, expected: ValidationKind) {
    match err {
        DomainError::Validation(kind, _) => assert_eq!(kind, expected),
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

#[test]
fn spend_covers_every_listed_resource() {
    let start = econ();
    let cost = ResourceCost::from([(Resource::Money, 3), (Resource::Materials, 2)]);

    assert!(can_afford(&start, &cost));
    let next = spend_resources(&start, &cost).unwrap();
    assert_eq!(next.resources, ResourcePool::new(7, 5, 1));
    // Input untouched
    assert_eq!(start.resources, ResourcePool::new(10, 5, 3));
}

#[test]
fn spend_fails_without_partial_deduction() {
    let start = econ();
    let cost = ResourceCost::from([(Resource::Money, 3), (Resource::Materials, 4)]);

    assert!(!can_afford(&start, &cost));
    let err = spend_resources(&start, &cost).unwrap_err();
    assert_validation(err, ValidationKind::InsufficientResources);
}

#[test]
fn negative_amounts_are_rejected() {
    let cost = ResourceCost::from([(Resource::Science, -1)]);
    assert!(spend_resources(&econ(), &cost).unwrap_err().is_rule_violation());
    assert!(add_resources(&econ(), &cost).unwrap_err().is_rule_violation());
}

#[test]
fn add_resources_accumulates() {
    let next = add_resources(&econ(), &ResourceCost::from([(Resource::Science, 4)])).unwrap();
    assert_eq!(next.resources.science, 9);
}

#[test]
fn add_resources_overflow_is_an_invariant_breach() {
    let rich = econ().with_resources(ResourcePool::new(i32::MAX, 0, 0));
    let err = add_resources(&rich, &ResourceCost::from([(Resource::Money, 1)])).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));
}

#[test]
fn trade_overflow_is_an_invariant_breach() {
    let hoard = econ().with_resources(ResourcePool::new(10, i32::MAX - 1, 0));
    let err = trade_resources(&hoard, Resource::Money, Resource::Science, 2).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));

    // Landing exactly on the ceiling is fine
    let next = trade_resources(&hoard, Resource::Money, Resource::Science, 1).unwrap();
    assert_eq!(next.resources, ResourcePool::new(8, i32::MAX, 0));
}

#[test]
fn upkeep_overflow_is_an_invariant_breach() {
    for pool in [
        ResourcePool::new(i32::MAX, 0, 0),
        ResourcePool::new(10, i32::MAX, 0),
        ResourcePool::new(10, 0, i32::MAX),
    ] {
        let err = execute_upkeep(&econ().with_resources(pool)).unwrap_err();
        assert!(matches!(err, DomainError::Invariant(_)), "{pool:?}");
    }
}

#[test]
fn action_disk_raises_upkeep() {
    let next = place_influence_on_action(&econ()).unwrap();
    assert_eq!(next.influence.on_track, 12);
    assert_eq!(next.influence.on_actions, 1);
    assert_eq!(next.influence.upkeep_cost, 3);
    assert_eq!(next.influence.total_available, 13);
}

#[test]
fn empty_track_blocks_disk_placement() {
    let mut e = econ();
    for _ in 0..13 {
        e = place_influence_on_sector(&e).unwrap();
    }
    assert_eq!(e.influence.on_track, 0);
    assert_eq!(e.influence.upkeep_cost, upkeep_cost(0));

    assert_validation(
        place_influence_on_action(&e).unwrap_err(),
        ValidationKind::InsufficientInfluence,
    );
}

#[test]
fn returning_disks_requires_one_placed() {
    assert_validation(
        return_influence_from_action(&econ()).unwrap_err(),
        ValidationKind::TrackExhausted,
    );
    assert_validation(
        return_influence_from_sector(&econ()).unwrap_err(),
        ValidationKind::TrackExhausted,
    );

    let placed = place_influence_on_sector(&econ()).unwrap();
    let back = return_influence_from_sector(&placed).unwrap();
    assert_eq!(back.influence, econ().influence);
}

#[test]
fn bonus_influence_respects_track_size() {
    let e = add_bonus_influence(&econ(), 3).unwrap();
    assert_eq!(e.influence.total_available, 16);
    assert_eq!(e.influence.on_track, 16);
    assert_validation(
        add_bonus_influence(&e, 1).unwrap_err(),
        ValidationKind::TrackExhausted,
    );
    assert!(add_bonus_influence(&econ(), 0).is_err());
}

#[test]
fn trade_pays_ratio_times_amount() {
    let next = trade_resources(&econ(), Resource::Money, Resource::Science, 2).unwrap();
    assert_eq!(next.resources.money, 6);
    assert_eq!(next.resources.science, 7);

    let poor = econ().with_resources(ResourcePool::new(10, 0, 3));
    let next = trade_resources(&poor, Resource::Money, Resource::Science, 2).unwrap();
    assert_eq!((next.resources.money, next.resources.science), (6, 2));
}

#[test]
fn trade_uses_faction_ratio() {
    let e = econ().with_trade_ratio(3);
    let next = trade_resources(&e, Resource::Money, Resource::Materials, 3).unwrap();
    assert_eq!(next.resources.money, 1);
    assert_eq!(next.resources.materials, 6);

    assert_validation(
        trade_resources(&e, Resource::Money, Resource::Materials, 4).unwrap_err(),
        ValidationKind::InsufficientResources,
    );
}

#[test]
fn trade_rejects_same_resource_and_non_positive_amounts() {
    assert_validation(
        trade_resources(&econ(), Resource::Money, Resource::Money, 1).unwrap_err(),
        ValidationKind::InvalidTrade,
    );
    assert_validation(
        trade_resources(&econ(), Resource::Money, Resource::Science, 0).unwrap_err(),
        ValidationKind::InvalidTrade,
    );
}

#[test]
fn population_cubes_stay_within_track() {
    let mut e = econ();
    e.population.science = PopulationTrack::with_remaining(0);
    assert_validation(
        place_population_cube(&e, Resource::Science).unwrap_err(),
        ValidationKind::TrackExhausted,
    );

    e.population.science = PopulationTrack::with_remaining(13);
    assert_eq!(e.population.science.production_value, 0);
    assert_validation(
        remove_population_cube(&e, Resource::Science).unwrap_err(),
        ValidationKind::TrackExhausted,
    );

    let placed = place_population_cube(&econ(), Resource::Money).unwrap();
    assert_eq!(placed.population.money.cubes_remaining, 10);
    assert_eq!(placed.population.money.production_value, 3);
}

#[test]
fn colony_ships_deplete_and_refresh() {
    let mut e = econ();
    for _ in 0..3 {
        e = use_colony_ship(&e).unwrap();
    }
    assert_eq!(e.colony_ships.available, 0);
    assert_eq!(e.colony_ships.used, 3);
    assert_validation(use_colony_ship(&e).unwrap_err(), ValidationKind::PoolExhausted);

    let refreshed = refresh_colony_ships(&e);
    assert_eq!(refreshed.colony_ships.available, 3);
    assert_eq!(refreshed.colony_ships.used, 0);

    let bonus = add_bonus_colony_ship(&e);
    assert_eq!(bonus.colony_ships.total, 4);
    assert_eq!(bonus.colony_ships.available, 1);
}

#[test]
fn upkeep_shortfall_clamps_money_at_zero() {
    let mut e = econ().with_resources(ResourcePool::new(3, 0, 0));
    for _ in 0..5 {
        e = place_influence_on_action(&e).unwrap();
    }
    assert_eq!(e.influence.on_track, 8);
    assert_eq!(e.influence.upkeep_cost, 10);

    let report = calculate_production(&e);
    assert_eq!(report.money_income, 2);
    assert_eq!(report.net_money_income, -8);

    let outcome = execute_upkeep(&e).unwrap();
    assert_eq!(outcome.shortfall, 5);
    assert_eq!(outcome.economy.resources.money, 0);
    assert_eq!(outcome.economy.resources.science, 2);
    assert_eq!(outcome.economy.resources.materials, 2);
    assert!(validate_economy(&outcome.economy).is_empty());
}

#[test]
fn upkeep_with_surplus_adds_income() {
    let outcome = execute_upkeep(&econ()).unwrap();
    assert_eq!(outcome.shortfall, 0);
    assert_eq!(outcome.economy.resources, ResourcePool::new(12, 7, 5));
}

#[test]
fn round_reset_returns_action_disks_only() {
    let mut e = place_influence_on_action(&econ()).unwrap();
    e = place_influence_on_action(&e).unwrap();
    e = place_influence_on_sector(&e).unwrap();
    e = use_colony_ship(&e).unwrap();

    let reset = reset_influence_after_round(&e);
    assert_eq!(reset.influence.on_actions, 0);
    assert_eq!(reset.influence.on_sectors, 1);
    assert_eq!(reset.influence.on_track, 12);
    assert_eq!(reset.influence.upkeep_cost, upkeep_cost(12));
    assert_eq!(reset.colony_ships.available, 3);
}

#[test]
fn validation_lists_every_broken_invariant() {
    let mut broken = econ();
    broken.resources.money = -1;
    broken.influence.on_actions = 2;
    broken.colony_ships.used = 1;

    let violations = validate_economy(&broken);
    assert_eq!(violations.len(), 3, "{violations:?}");
    assert!(violations[0].contains("money is negative"));
    assert!(violations.iter().any(|v| v.contains("influence not conserved")));
    assert!(violations.iter().any(|v| v.contains("colony ships not conserved")));

    let err = require_valid_economy(&broken).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));
    assert!(require_valid_economy(&econ()).is_ok());
}
