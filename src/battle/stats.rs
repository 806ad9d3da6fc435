use schema::StageStat;
use serde::{Deserialize, Serialize};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Multipliers for attack, defense, special and speed stages, indexed by `stage + 6`.
pub const NORMAL_STAGE_MULTIPLIERS: [f32; 13] = [
    2.0 / 8.0,
    2.0 / 7.0,
    2.0 / 6.0,
    2.0 / 5.0,
    2.0 / 4.0,
    2.0 / 3.0,
    1.0,
    3.0 / 2.0,
    2.0,
    5.0 / 2.0,
    3.0,
    7.0 / 2.0,
    4.0,
];

/// Multipliers for accuracy and evasion stages, indexed by `stage + 6`.
pub const ACCURACY_STAGE_MULTIPLIERS: [f32; 13] = [
    0.33, 0.36, 0.43, 0.50, 0.60, 0.75, 1.0, 1.33, 1.66, 2.0, 2.5, 2.66, 3.0,
];

fn stage_index(stage: i8) -> usize {
    (stage.clamp(MIN_STAGE, MAX_STAGE) - MIN_STAGE) as usize
}

/// Multiplier for a stat stage; out-of-range stages are clamped first.
pub fn stage_multiplier(stage: i8) -> f32 {
    NORMAL_STAGE_MULTIPLIERS[stage_index(stage)]
}

pub fn accuracy_multiplier(stage: i8) -> f32 {
    ACCURACY_STAGE_MULTIPLIERS[stage_index(stage)]
}

/// Result of applying a stage delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub stat: StageStat,
    /// Delta actually applied after clamping; 0 when already at the limit.
    pub applied: i8,
    pub requested: i8,
    pub new_stage: i8,
}

impl StageChange {
    /// Battle text describing the change.
    pub fn message(&self) -> &'static str {
        match (self.applied, self.requested) {
            (0, r) if r > 0 => "won't go any higher!",
            (0, r) if r < 0 => "won't go any lower!",
            (0, _) => "didn't change!",
            (_, r) if r <= -3 => "severely fell!",
            (_, -2) => "harshly fell!",
            (_, r) if r < 0 => "fell!",
            (_, 1) => "rose!",
            (_, 2) => "sharply rose!",
            _ => "rose drastically!",
        }
    }
}

/// Per-battle stat stages, each in `-6..=6`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: StageStat) -> i8 {
        match stat {
            StageStat::Attack => self.attack,
            StageStat::Defense => self.defense,
            StageStat::SpecialAttack => self.sp_attack,
            StageStat::SpecialDefense => self.sp_defense,
            StageStat::Speed => self.speed,
            StageStat::Accuracy => self.accuracy,
            StageStat::Evasion => self.evasion,
        }
    }

    fn get_mut(&mut self, stat: StageStat) -> &mut i8 {
        match stat {
            StageStat::Attack => &mut self.attack,
            StageStat::Defense => &mut self.defense,
            StageStat::SpecialAttack => &mut self.sp_attack,
            StageStat::SpecialDefense => &mut self.sp_defense,
            StageStat::Speed => &mut self.speed,
            StageStat::Accuracy => &mut self.accuracy,
            StageStat::Evasion => &mut self.evasion,
        }
    }

    /// Add `delta` to a stage, clamping to `-6..=6`.
    pub fn apply(&mut self, stat: StageStat, delta: i8) -> StageChange {
        let stage = self.get_mut(stat);
        let old = *stage;
        *stage = old.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        StageChange {
            stat,
            applied: *stage - old,
            requested: delta,
            new_stage: *stage,
        }
    }
}
