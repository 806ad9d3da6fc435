use crate::battle::catch::Ball;
use crate::battle::stats::StatStages;
use crate::errors::{BattleResult, BattleStateError, MoveDataResult};
use crate::move_data::get_move_data;
use schema::{BaseStats, GrowthRate, PokemonSpecies, PokemonType};
use serde::{Deserialize, Serialize};

/// Stats a nature can raise or lower, in personality order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NatureStat {
    Attack,
    Defense,
    Speed,
    SpecialAttack,
    SpecialDefense,
}

const NATURE_ORDER: [NatureStat; 5] = [
    NatureStat::Attack,
    NatureStat::Defense,
    NatureStat::Speed,
    NatureStat::SpecialAttack,
    NatureStat::SpecialDefense,
];

const NATURE_NAMES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish",
    "Lax", "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful",
    "Rash", "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

/// Nature derived from a personality roll in `0..=24`.
///
/// The raised stat is `personality / 5` and the lowered stat `personality % 5`; when both
/// point at the same stat the nature is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nature {
    personality: u8,
}

impl Nature {
    pub fn from_personality(personality: u8) -> Self {
        Self {
            personality: personality % 25,
        }
    }

    pub fn neutral() -> Self {
        Self::from_personality(0)
    }

    pub fn personality(&self) -> u8 {
        self.personality
    }

    pub fn name(&self) -> &'static str {
        NATURE_NAMES[self.personality as usize]
    }

    pub fn raised(&self) -> Option<NatureStat> {
        let (up, down) = self.buckets();
        (up != down).then(|| NATURE_ORDER[up])
    }

    pub fn lowered(&self) -> Option<NatureStat> {
        let (up, down) = self.buckets();
        (up != down).then(|| NATURE_ORDER[down])
    }

    /// Percentage applied to `stat`: 110, 90 or 100.
    pub fn percent(&self, stat: NatureStat) -> u32 {
        if self.raised() == Some(stat) {
            110
        } else if self.lowered() == Some(stat) {
            90
        } else {
            100
        }
    }

    fn buckets(&self) -> (usize, usize) {
        ((self.personality / 5) as usize, (self.personality % 5) as usize)
    }
}

/// Derived battle stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

// Index order shared by IV and EV arrays
const HP: usize = 0;
const ATTACK: usize = 1;
const DEFENSE: usize = 2;
const SP_ATTACK: usize = 3;
const SP_DEFENSE: usize = 4;
const SPEED: usize = 5;

/// Compute stats from base stats, individual values, effort values, nature and level.
pub fn compute_stats(base: &BaseStats, level: u8, ivs: &[u8; 6], evs: &[u8; 6], nature: Nature) -> Stats {
    let level = level as u32;
    let core = |base: u8, index: usize| {
        (2 * base as u32 + ivs[index] as u32 + evs[index] as u32 / 4) * level / 100
    };
    let other = |base: u8, index: usize, stat: NatureStat| {
        ((core(base, index) + 5) * nature.percent(stat) / 100) as u16
    };

    Stats {
        hp: (core(base.hp, HP) + level + 10) as u16,
        attack: other(base.attack, ATTACK, NatureStat::Attack),
        defense: other(base.defense, DEFENSE, NatureStat::Defense),
        sp_attack: other(base.sp_attack, SP_ATTACK, NatureStat::SpecialAttack),
        sp_defense: other(base.sp_defense, SP_DEFENSE, NatureStat::SpecialDefense),
        speed: other(base.speed, SPEED, NatureStat::Speed),
    }
}

pub fn effort_array(effort: &BaseStats) -> [u8; 6] {
    [
        effort.hp,
        effort.attack,
        effort.defense,
        effort.sp_attack,
        effort.sp_defense,
        effort.speed,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: String,
    pub move_type: PokemonType,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(move_id: &str) -> MoveDataResult<Self> {
        let data = get_move_data(move_id)?;
        Ok(Self {
            move_id: move_id.to_string(),
            move_type: data.move_type,
            pp: data.max_pp,
            max_pp: data.max_pp,
        })
    }

    pub fn use_pp(&mut self) -> bool {
        if self.pp == 0 {
            return false;
        }
        self.pp -= 1;
        true
    }
}

pub const MAX_MOVES: usize = 4;

/// One creature's full in-battle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species_id: u16,
    /// Cosmetic generation bucket (0, 1 or 2).
    pub generation: u8,
    pub name: String,
    pub gender: Gender,
    pub shiny: bool,
    pub size: u16,
    pub height: u32,
    pub ability: String,
    pub level: u8,
    pub xp: u32,
    pub xp_current_level: u32,
    pub xp_next_level: u32,
    pub growth_rate: GrowthRate,
    pub ivs: [u8; 6],  // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],  // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub nature: Nature,
    pub stats: Stats,
    /// Float so the health bar can drain smoothly; truncated for display and faint checks.
    pub health: f32,
    pub moves: Vec<MoveSlot>,
    /// Battle-only; never persisted.
    #[serde(skip)]
    pub stages: StatStages,
    /// `None` while wild.
    pub caught_with: Option<Ball>,
    pub capture_rate: u8,
    pub base_happiness: u8,
    pub base_exp: u16,
    pub types: Vec<PokemonType>,
}

impl Combatant {
    /// Deterministic construction at full health with the given individual values and nature.
    ///
    /// Known moves are the last four level-up moves at or below `level`, in table order.
    pub fn new(
        species: &PokemonSpecies,
        level: u8,
        ivs: [u8; 6],
        nature: Nature,
        caught_with: Option<Ball>,
    ) -> MoveDataResult<Self> {
        let evs = effort_array(&species.effort);
        let stats = compute_stats(&species.base_stats, level, &ivs, &evs, nature);

        let known: Vec<&str> = species
            .moves_up_to_level(level)
            .map(|m| m.move_id.as_str())
            .collect();
        let skip = known.len().saturating_sub(MAX_MOVES);
        let moves = known[skip..]
            .iter()
            .map(|id| MoveSlot::new(id))
            .collect::<MoveDataResult<Vec<_>>>()?;

        Ok(Self {
            species_id: species.pokedex_number,
            generation: generation_bucket(species.pokedex_number),
            name: crate::species::display_name(species),
            gender: Gender::Male,
            shiny: false,
            size: 0,
            height: height_for_size(species.height, 0),
            ability: species.abilities.first().cloned().unwrap_or_default(),
            level,
            xp: species.growth_rate.experience_for_level(level),
            xp_current_level: species.growth_rate.experience_for_level(level),
            xp_next_level: species.growth_rate.experience_for_level(level.saturating_add(1)),
            growth_rate: species.growth_rate,
            ivs,
            evs,
            nature,
            stats,
            health: stats.hp as f32,
            moves,
            stages: StatStages::default(),
            caught_with,
            capture_rate: species.capture_rate,
            base_happiness: species.base_happiness,
            base_exp: species.base_exp,
            types: species.types.clone(),
        })
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.health.max(0.0) as u16
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp() == 0
    }

    /// Set health, clamped to `[0, max_hp]`.
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.stats.hp as f32);
    }

    pub fn take_damage(&mut self, amount: u16) {
        self.set_health(self.health - amount as f32);
    }

    /// Restore up to `amount` hit points, or to full when `None`. Returns the amount restored.
    pub fn heal(&mut self, amount: Option<u16>) -> u16 {
        let before = self.current_hp();
        let target = match amount {
            Some(amount) => self.health + amount as f32,
            None => self.stats.hp as f32,
        };
        self.set_health(target);
        self.current_hp() - before
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// Append a move, evicting the slot at index 0 when the list is full.
    pub fn learn_move(&mut self, move_id: &str) -> MoveDataResult<Option<MoveSlot>> {
        let slot = MoveSlot::new(move_id)?;
        self.moves.push(slot);
        if self.moves.len() > MAX_MOVES {
            return Ok(Some(self.moves.remove(0)));
        }
        Ok(None)
    }

    /// Recompute stats for the current level, keeping damage taken.
    pub fn recompute_stats(&mut self, species: &PokemonSpecies) {
        let old_max = self.stats.hp;
        self.stats = compute_stats(&species.base_stats, self.level, &self.ivs, &self.evs, self.nature);
        let gained = self.stats.hp as f32 - old_max as f32;
        self.set_health(self.health + gained);
    }

    pub fn reset_stages(&mut self) {
        self.stages = StatStages::default();
    }

    /// Serialize the persistent part of this combatant.
    pub fn to_snapshot(&self) -> BattleResult<Vec<u8>> {
        postcard::to_allocvec(self)
            .map_err(|e| BattleStateError::Snapshot(e.to_string()).into())
    }

    pub fn from_snapshot(bytes: &[u8]) -> BattleResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| BattleStateError::Snapshot(e.to_string()).into())
    }
}

/// Cosmetic generation bucket for a pokedex number.
pub fn generation_bucket(pokedex_number: u16) -> u8 {
    if pokedex_number <= 151 {
        0
    } else if pokedex_number < 251 {
        1
    } else {
        2
    }
}

// (max size, base height, divisor, offset) bands for the size roll
const SIZE_BANDS: [(u16, u32, u32, u32); 16] = [
    (9, 290, 1, 0),
    (109, 300, 1, 10),
    (309, 400, 2, 110),
    (709, 500, 4, 310),
    (2709, 600, 20, 710),
    (7709, 700, 50, 2710),
    (17709, 800, 100, 7710),
    (32709, 900, 150, 17710),
    (47709, 1000, 150, 32710),
    (57709, 1100, 100, 47710),
    (62709, 1200, 50, 57710),
    (64709, 1300, 20, 62710),
    (65209, 1400, 5, 64710),
    (65409, 1500, 2, 65210),
    (65509, 1600, 1, 65410),
    (65535, 1700, 1, 65510),
];

/// Height for a size roll in `0..=65535`, scaled from the species height.
pub fn height_for_size(species_height: u16, size: u16) -> u32 {
    let (_, base, divisor, offset) = SIZE_BANDS
        .iter()
        .copied()
        .find(|(max, ..)| size <= *max)
        .unwrap_or(SIZE_BANDS[SIZE_BANDS.len() - 1]);
    let scale = (size as u32).saturating_sub(offset) / divisor + base;
    species_height as u32 * scale / 10
}
