use crate::errors::MoveDataResult;
use crate::pokemon::{Combatant, MoveSlot};
use schema::PokemonSpecies;
use tracing::info;

// Multipliers the engine does not model
const XP_SHARE: u32 = 1;
const LUCKY_EGG_MULTIPLIER: u32 = 1;
const TRAINER_MULTIPLIER: u32 = 1;
const TRADED_MULTIPLIER: u32 = 1;

/// Experience awarded for defeating `defeated`: `floor(base_exp * level / 7)`.
pub fn experience_yield(defeated: &Combatant) -> u32 {
    defeated.base_exp as u32 * defeated.level as u32 / (7 * XP_SHARE)
        * LUCKY_EGG_MULTIPLIER
        * TRAINER_MULTIPLIER
        * TRADED_MULTIPLIER
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceGain {
    pub amount: u32,
    pub old_level: u8,
    pub new_level: u8,
}

impl ExperienceGain {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Add experience and raise the level while xp exceeds the next threshold.
///
/// Stats are not touched here; call [`finish_level_up`] once the xp bar has filled.
pub fn apply_experience(combatant: &mut Combatant, amount: u32, level_cap: u8) -> ExperienceGain {
    let old_level = combatant.level;
    combatant.xp = combatant.xp.saturating_add(amount);

    while combatant.xp > combatant.xp_next_level && combatant.level < level_cap {
        combatant.level += 1;
        combatant.xp_current_level = combatant.growth_rate.experience_for_level(combatant.level);
        combatant.xp_next_level = combatant
            .growth_rate
            .experience_for_level(combatant.level.saturating_add(1));
    }

    ExperienceGain {
        amount,
        old_level,
        new_level: combatant.level,
    }
}

/// A move picked up on level-up, with the slot it pushed out.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedMove {
    pub move_id: String,
    pub forgotten: Option<MoveSlot>,
}

/// Recompute stats for the new level and learn the first move the species learns exactly
/// at that level. Moves already known are not learned twice.
pub fn finish_level_up(
    combatant: &mut Combatant,
    species: &PokemonSpecies,
) -> MoveDataResult<Option<LearnedMove>> {
    combatant.recompute_stats(species);
    info!(pokemon = %combatant.name, level = combatant.level, "level up");

    let Some(entry) = species.move_learned_at(combatant.level) else {
        return Ok(None);
    };
    if combatant.moves.iter().any(|slot| slot.move_id == entry.move_id) {
        return Ok(None);
    }

    let forgotten = combatant.learn_move(&entry.move_id)?;
    info!(pokemon = %combatant.name, move_id = %entry.move_id, "learned move");
    Ok(Some(LearnedMove {
        move_id: entry.move_id.clone(),
        forgotten,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;
    use crate::species::get_species_data;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_experience_yield_floors() {
        // zigzagoon base 56 at level 3: 168 / 7 = 24
        let wild = TestCombatantBuilder::new(263, 3).build();
        assert_eq!(experience_yield(&wild), 24);
        // wurmple base 56 at level 2: 112 / 7 = 16
        let wild = TestCombatantBuilder::new(265, 2).build();
        assert_eq!(experience_yield(&wild), 16);
        // lotad base 44 at level 4: 176 / 7 = 25.1
        let wild = TestCombatantBuilder::new(270, 4).build();
        assert_eq!(experience_yield(&wild), 25);
    }

    #[test]
    fn test_no_level_when_xp_equals_threshold() {
        // mudkip is medium-slow: level 5 = 135, level 6 = 179
        let mut mudkip = TestCombatantBuilder::new(258, 5).build();
        assert_eq!(mudkip.xp, 135);
        let gain = apply_experience(&mut mudkip, 44, 100);
        assert_eq!(mudkip.xp, 179);
        assert!(!gain.leveled_up());

        let gain = apply_experience(&mut mudkip, 1, 100);
        assert!(gain.leveled_up());
        assert_eq!(mudkip.level, 6);
        assert_eq!(mudkip.xp_current_level, 179);
        assert_eq!(mudkip.xp_next_level, 236);
    }

    #[test]
    fn test_multiple_levels_in_one_gain() {
        let mut mudkip = TestCombatantBuilder::new(258, 5).build();
        let gain = apply_experience(&mut mudkip, 1000, 100);
        assert_eq!(gain.old_level, 5);
        // 1135 xp: level 12 needs 973, level 13 needs 1261
        assert_eq!(gain.new_level, 12);
    }

    #[test]
    fn test_level_cap_stops_levels_not_xp() {
        let mut mudkip = TestCombatantBuilder::new(258, 99).build();
        let before = mudkip.xp;
        apply_experience(&mut mudkip, 10_000_000, 100);
        assert_eq!(mudkip.level, 100);
        assert_eq!(mudkip.xp, before + 10_000_000);
    }

    #[test]
    fn test_finish_level_up_learns_move_at_new_level() {
        // mudkip learns water-gun at 10
        let species = get_species_data(258).unwrap();
        let mut mudkip = TestCombatantBuilder::new(258, 9).build();
        mudkip.take_damage(3);
        let missing = mudkip.max_hp() - mudkip.current_hp();

        let needed = species.growth_rate.experience_for_level(10) - mudkip.xp + 1;
        apply_experience(&mut mudkip, needed, 100);
        assert_eq!(mudkip.level, 10);

        let learned = finish_level_up(&mut mudkip, &species).unwrap();
        assert_eq!(
            learned.map(|l| l.move_id),
            Some("water-gun".to_string())
        );
        assert_eq!(mudkip.max_hp() - mudkip.current_hp(), missing);
        assert_eq!(mudkip.moves.last().map(|m| m.move_id.as_str()), Some("water-gun"));
    }

    #[test]
    fn test_finish_level_up_without_new_move() {
        let species = get_species_data(258).unwrap();
        let mut mudkip = TestCombatantBuilder::new(258, 7).build();
        assert_eq!(finish_level_up(&mut mudkip, &species).unwrap(), None);
    }
}
