use crate::battle::state::TurnRng;
use crate::battle::stats::{accuracy_multiplier, stage_multiplier};
use crate::pokemon::Combatant;
use schema::{DamageClass, MoveData, PokemonType};
use tracing::debug;

// Modifiers the engine does not model; kept at 1 so the formula reads in full.
pub const CRITICAL_MULTIPLIER: f64 = 1.0;
pub const WEATHER_MULTIPLIER: f64 = 1.0;
pub const SCREEN_MULTIPLIER: f64 = 1.0;
pub const BURN_MULTIPLIER: f64 = 1.0;
pub const TARGETS_MULTIPLIER: f64 = 1.0;
pub const FLASH_FIRE_MULTIPLIER: f64 = 1.0;
pub const ITEM_MULTIPLIER: f64 = 1.0;
pub const CHARGE_MULTIPLIER: f64 = 1.0;
pub const HELPING_HAND_MULTIPLIER: f64 = 1.0;
pub const ACCURACY_MODIFIER: f64 = 1.0;

pub const STAB_MULTIPLIER: f64 = 1.5;
pub const MIN_DAMAGE_ROLL: u32 = 85;
pub const MAX_DAMAGE_ROLL: u32 = 100;

/// Effective hit chance in percent, or `None` for moves that never miss.
pub fn hit_chance(move_data: &MoveData, attacker: &Combatant, defender: &Combatant) -> Option<f64> {
    let base = move_data.accuracy?;
    let stage = attacker.stages.accuracy - defender.stages.evasion;
    Some(base as f64 * accuracy_multiplier(stage) as f64 * ACCURACY_MODIFIER)
}

/// Roll whether a move connects. Moves without accuracy do not consume a roll.
pub fn move_hits(
    move_data: &MoveData,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut TurnRng,
) -> bool {
    match hit_chance(move_data, attacker, defender) {
        Some(chance) => {
            let roll = rng.next(1..=100, "accuracy check");
            let hit = roll as f64 <= chance;
            debug!(move_name = %move_data.name, roll, chance, hit, "accuracy check");
            hit
        }
        None => true,
    }
}

/// Type multiplier of the move against every type of the defender.
pub fn type_multiplier(move_type: PokemonType, defender: &Combatant) -> f64 {
    PokemonType::effectiveness_against(move_type, &defender.types) as f64
}

/// Damage before the random factor, or `None` when the move has no power.
pub fn damage_before_random(move_data: &MoveData, attacker: &Combatant, defender: &Combatant) -> Option<f64> {
    let power = match move_data.power {
        Some(power) if power > 0 => power as f64,
        _ => return None,
    };

    let (attack, attack_stage, defense, defense_stage) = match move_data.damage_class {
        DamageClass::Physical => (
            attacker.stats.attack,
            attacker.stages.attack,
            defender.stats.defense,
            defender.stages.defense,
        ),
        DamageClass::Special | DamageClass::Status => (
            attacker.stats.sp_attack,
            attacker.stages.sp_attack,
            defender.stats.sp_defense,
            defender.stages.sp_defense,
        ),
    };

    let level = attacker.level as f64;
    let attack = attack as f64 * stage_multiplier(attack_stage) as f64;
    let defense = (defense as f64 * stage_multiplier(defense_stage) as f64).max(1.0);
    let ratio = attack / defense;

    let base = ((2.0 * level / 5.0 + 2.0) * power * ratio) / 50.0
        * BURN_MULTIPLIER
        * SCREEN_MULTIPLIER
        * TARGETS_MULTIPLIER
        * WEATHER_MULTIPLIER
        * FLASH_FIRE_MULTIPLIER
        + 2.0;

    let stab = if attacker.has_type(move_data.move_type) {
        STAB_MULTIPLIER
    } else {
        1.0
    };

    Some(
        base * CRITICAL_MULTIPLIER
            * ITEM_MULTIPLIER
            * CHARGE_MULTIPLIER
            * HELPING_HAND_MULTIPLIER
            * stab
            * type_multiplier(move_data.move_type, defender),
    )
}

/// Apply a random roll in `85..=100` and truncate.
pub fn apply_roll(damage: f64, roll: u32) -> u16 {
    (damage * roll as f64 / 100.0) as u16
}

/// Full damage calculation for one move use; 0 for moves without power.
pub fn calculate_damage(
    move_data: &MoveData,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut TurnRng,
) -> u16 {
    let Some(damage) = damage_before_random(move_data, attacker, defender) else {
        return 0;
    };
    let roll = rng.next(MIN_DAMAGE_ROLL..=MAX_DAMAGE_ROLL, "damage roll");
    let result = apply_roll(damage, roll);
    debug!(move_name = %move_data.name, roll, damage = result, "damage calculated");
    result
}
