use crate::move_data::move_display_name;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::StageStat;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::trace;

/// Everything notable that happens during a battle, in order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    BattleStarted {
        wild: String,
        level: u8,
    },
    MoveUsed {
        pokemon: String,
        move_id: String,
    },
    MoveMissed {
        pokemon: String,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    StatStageChanged {
        target: String,
        stat: StageStat,
        applied: i8,
        new_stage: i8,
    },
    NothingHappened,
    ItemUsed {
        trainer: String,
        item: String,
    },
    PokemonHealed {
        target: String,
        amount: u16,
    },
    BallShook {
        shake: u8,
    },
    PokemonBrokeFree {
        pokemon: String,
    },
    PokemonCaught {
        pokemon: String,
    },
    EscapeAttempted {
        attempts: u32,
        success: bool,
    },
    ExperienceGained {
        pokemon: String,
        amount: u32,
    },
    LevelUp {
        pokemon: String,
        new_level: u8,
    },
    MoveLearned {
        pokemon: String,
        move_id: String,
        forgotten: Option<String>,
    },
    PokemonFainted {
        pokemon: String,
    },
    BattleEnded {
        won: bool,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { wild, level } => {
                Some(format!("Wild {} (Lv. {}) appeared!", wild, level))
            }
            BattleEvent::MoveUsed { pokemon, move_id } => {
                Some(format!("{} used {}!", pokemon, move_display_name(move_id)))
            }
            BattleEvent::MoveMissed { pokemon } => Some(format!("{}'s attack missed!", pokemon)),
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::StatStageChanged { .. } => None,
            BattleEvent::NothingHappened => Some("But nothing happened!".to_string()),
            BattleEvent::ItemUsed { trainer, item } => Some(format!("{} used {}!", trainer, item)),
            BattleEvent::PokemonHealed { target, amount } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::BallShook { .. } => None,
            BattleEvent::PokemonBrokeFree { pokemon } => {
                Some(format!("Oh no! {} broke free!", pokemon))
            }
            BattleEvent::PokemonCaught { pokemon } => Some(format!("Gotcha! {} was caught!", pokemon)),
            BattleEvent::EscapeAttempted { success, .. } => Some(if *success {
                "Got away safely!".to_string()
            } else {
                "Can't escape!".to_string()
            }),
            BattleEvent::ExperienceGained { pokemon, amount } => {
                Some(format!("{} gained {} EXP. Points!", pokemon, amount))
            }
            BattleEvent::LevelUp { pokemon, new_level } => {
                Some(format!("{} grew to LV. {}!", pokemon, new_level))
            }
            BattleEvent::MoveLearned { pokemon, move_id, .. } => {
                Some(format!("{} learned {}!", pokemon, move_display_name(move_id)))
            }
            BattleEvent::PokemonFainted { pokemon } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::BattleEnded { .. } => None,
        }
    }
}

/// Event bus for collecting battle events.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted text of every non-silent event.
    pub fn formatted(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    /// One line per event, using the formatted text when available.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            match event.format() {
                Some(text) => writeln!(f, "  {}", text)?,
                None => writeln!(f, "  {:?}", event)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u32>, index: usize },
    Random(StdRng),
}

/// Source of every random draw in a battle.
///
/// Scripted sources replay fixed outcomes so tests can pin each roll.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Random(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Random(StdRng::from_os_rng()),
        }
    }

    /// Draw a uniform integer from `range`.
    ///
    /// # Panics
    /// A scripted source panics when exhausted or when the scripted value falls outside
    /// `range`; both mean the test scripted the wrong rolls.
    pub fn next(&mut self, range: RangeInclusive<u32>, reason: &str) -> u32 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                let Some(&outcome) = outcomes.get(*index) else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                assert!(
                    range.contains(&outcome),
                    "scripted value {} for '{}' is outside {:?}",
                    outcome,
                    reason,
                    range
                );
                *index += 1;
                outcome
            }
            RngSource::Random(rng) => rng.random_range(range.clone()),
        };

        trace!(outcome, reason, ?range, "rng draw");
        outcome
    }

    /// Number of scripted values not yet consumed; `None` for random sources.
    pub fn remaining(&self) -> Option<usize> {
        match &self.source {
            RngSource::Scripted { outcomes, index } => Some(outcomes.len() - index),
            RngSource::Random(_) => None,
        }
    }
}
