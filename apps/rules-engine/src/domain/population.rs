//! Population cube moves between a track and the map.

use crate::domain::economy_types::PlayerEconomy;
use crate::domain::resources::Resource;
use crate::domain::tables::{production_value, MAX_CUBES};
use crate::errors::domain::{DomainError, ValidationKind};

/// Deploy one cube from the `resource` track, raising its production.
pub fn place_population_cube(
    economy: &PlayerEconomy,
    resource: Resource,
) -> Result<PlayerEconomy, DomainError> {
    let track = economy.population.get(resource);
    if track.cubes_remaining <= 0 {
        return Err(DomainError::validation(
            ValidationKind::TrackExhausted,
            format!("No {resource} population cubes left to place"),
        ));
    }

    let mut next = economy.clone();
    let track = next.population.get_mut(resource);
    track.cubes_remaining -= 1;
    track.production_value = production_value(track.cubes_remaining);
    Ok(next)
}

/// Return one deployed cube to the `resource` track.
pub fn remove_population_cube(
    economy: &PlayerEconomy,
    resource: Resource,
) -> Result<PlayerEconomy, DomainError> {
    let track = economy.population.get(resource);
    if track.cubes_remaining >= MAX_CUBES {
        return Err(DomainError::validation(
            ValidationKind::TrackExhausted,
            format!("{resource} population track is already full"),
        ));
    }

    let mut next = economy.clone();
    let track = next.population.get_mut(resource);
    track.cubes_remaining += 1;
    track.production_value = production_value(track.cubes_remaining);
    Ok(next)
}
