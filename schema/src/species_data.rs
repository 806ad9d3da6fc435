use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Six-stat spread used for base stats and effort yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp as u16
            + self.attack as u16
            + self.defense as u16
            + self.sp_attack as u16
            + self.sp_defense as u16
            + self.speed as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpMove {
    pub move_id: String,
    pub level: u8,
}

/// Named experience curve mapping a level to its cumulative xp threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum GrowthRate {
    Erratic,
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Fluctuating,
}

impl GrowthRate {
    /// Cumulative experience needed to reach `level`, floored and never negative.
    pub fn experience_for_level(self, level: u8) -> u32 {
        let n = level as i64;
        let cube = n * n * n;

        // Integer arithmetic keeps the floor exact; div_euclid floors negative values too.
        let xp = match self {
            GrowthRate::Erratic => match level {
                0..=49 => cube * (100 - n) / 50,
                50..=67 => cube * (150 - n) / 100,
                68..=97 => cube * ((1911 - 10 * n) / 3) / 500,
                _ => cube * (160 - n) / 100,
            },
            GrowthRate::Fast => 4 * cube / 5,
            GrowthRate::MediumFast => cube,
            GrowthRate::MediumSlow => (6 * cube - 75 * n * n + 500 * n - 700).div_euclid(5),
            GrowthRate::Slow => 5 * cube / 4,
            GrowthRate::Fluctuating => match level {
                0..=14 => cube * ((n + 1) / 3 + 24) / 50,
                15..=35 => cube * (n + 14) / 50,
                _ => cube * (n / 2 + 32) / 50,
            },
        };

        xp.max(0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub pokedex_number: u16,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    /// Effort values granted by this species, copied onto every spawned combatant.
    pub effort: BaseStats,
    pub base_exp: u16,
    pub growth_rate: GrowthRate,
    pub capture_rate: u8,
    pub base_happiness: u8,
    /// In order of definition; spawn and level-up move rules depend on this order.
    pub level_up_moves: Vec<LevelUpMove>,
    pub abilities: Vec<String>,
    /// Height in decimetres, scaled by the size roll.
    pub height: u16,
}

impl PokemonSpecies {
    /// Moves learnable at or below `level`, in table order.
    pub fn moves_up_to_level(&self, level: u8) -> impl Iterator<Item = &LevelUpMove> {
        self.level_up_moves.iter().filter(move |m| m.level <= level)
    }

    /// First move in table order learned exactly at `level`.
    pub fn move_learned_at(&self, level: u8) -> Option<&LevelUpMove> {
        self.level_up_moves.iter().find(|m| m.level == level)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }
}
