//! Builds battle-ready combatants from species templates.
use crate::battle::catch::Ball;
use crate::battle::state::TurnRng;
use crate::errors::MoveDataResult;
use crate::pokemon::{height_for_size, Combatant, Gender, Nature};
use schema::PokemonSpecies;
use std::ops::RangeInclusive;
use tracing::debug;

pub const SHINY_ODDS: u32 = 8192;

/// Spawn a combatant at a level rolled uniformly from `levels`.
///
/// `caught_with` is `None` for wild combatants. Rolls, in order: level, personality,
/// six IVs, size, shininess, gender and ability.
pub fn spawn(
    species: &PokemonSpecies,
    levels: RangeInclusive<u8>,
    caught_with: Option<Ball>,
    rng: &mut TurnRng,
) -> MoveDataResult<Combatant> {
    let (min, max) = (*levels.start(), *levels.end());
    let level = if min >= max {
        min
    } else {
        rng.next(min as u32..=max as u32, "spawn level") as u8
    };
    let level = level.max(1);

    let nature = Nature::from_personality(rng.next(0..=24, "personality") as u8);
    let mut ivs = [0u8; 6];
    for iv in ivs.iter_mut() {
        *iv = rng.next(0..=31, "individual value") as u8;
    }

    let mut combatant = Combatant::new(species, level, ivs, nature, caught_with)?;

    combatant.size = rng.next(0..=65_535, "size") as u16;
    combatant.height = height_for_size(species.height, combatant.size);
    combatant.shiny = rng.next(1..=SHINY_ODDS, "shiny") == 1;
    combatant.gender = if rng.next(0..=1, "gender") == 0 {
        Gender::Male
    } else {
        Gender::Female
    };
    if species.abilities.len() > 1 {
        let pick = rng.next(0..=1, "ability") as usize;
        combatant.ability = species.abilities[pick].clone();
    }

    debug!(
        species = %combatant.name,
        level,
        nature = nature.name(),
        shiny = combatant.shiny,
        "spawned combatant"
    );
    Ok(combatant)
}
