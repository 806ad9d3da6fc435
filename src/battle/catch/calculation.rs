use crate::battle::state::TurnRng;
use crate::pokemon::Combatant;
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shakes a ball must survive for a capture.
pub const REQUIRED_SHAKES: u8 = 4;
/// Capture odds at or above this value always succeed.
pub const CERTAIN_CAPTURE_ODDS: f64 = 255.0;

/// Ball kinds, numbered in sprite-sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ball {
    Repeat,
    Nest,
    Poke,
    Great,
    Safari,
    Ultra,
    Master,
    Net,
    Dive,
    Timer,
    Luxury,
    Premier,
}

impl Ball {
    pub fn from_item_id(item_id: &str) -> Option<Ball> {
        let ball = match item_id {
            "repeat-ball" => Ball::Repeat,
            "nest-ball" => Ball::Nest,
            "poke-ball" => Ball::Poke,
            "great-ball" => Ball::Great,
            "safari-ball" => Ball::Safari,
            "ultra-ball" => Ball::Ultra,
            "master-ball" => Ball::Master,
            "net-ball" => Ball::Net,
            "dive-ball" => Ball::Dive,
            "timer-ball" => Ball::Timer,
            "luxury-ball" => Ball::Luxury,
            "premier-ball" => Ball::Premier,
            _ => return None,
        };
        Some(ball)
    }

    pub fn sprite_index(self) -> u8 {
        self as u8
    }
}

/// Battle facts some balls scale with.
#[derive(Debug, Clone, Copy)]
pub struct BallContext<'a> {
    pub target: &'a Combatant,
    /// Whether the player already owns this species, in the party or in storage.
    pub species_owned: bool,
    pub turns_passed: i32,
}

/// Ball bonus factor for a throw.
pub fn ball_bonus(ball: Ball, context: &BallContext<'_>) -> f64 {
    match ball {
        Ball::Master => 255.0,
        Ball::Ultra => 2.0,
        Ball::Great | Ball::Safari => 1.5,
        Ball::Poke | Ball::Luxury | Ball::Premier | Ball::Dive => 1.0,
        Ball::Net => {
            if context.target.has_type(PokemonType::Water) || context.target.has_type(PokemonType::Bug) {
                3.5
            } else {
                1.0
            }
        }
        Ball::Nest => ((41.0 - context.target.level as f64) / 10.0).max(1.0),
        Ball::Repeat => {
            if context.species_owned {
                3.5
            } else {
                1.0
            }
        }
        Ball::Timer => ((context.turns_passed as f64 + 10.0) / 10.0).min(4.0),
    }
}

/// Modified capture odds `a`. Status conditions are not modelled, so the status bonus is 1.
pub fn capture_odds(max_hp: u16, current_hp: u16, capture_rate: u8, ball_bonus: f64) -> f64 {
    let max_hp = max_hp.max(1) as f64;
    let current_hp = (current_hp as f64).min(max_hp);
    let status_bonus = 1.0;
    ((3.0 * max_hp - 2.0 * current_hp) * capture_rate as f64 * ball_bonus) / (3.0 * max_hp)
        * status_bonus
}

/// Shake threshold `b`, truncating after each square root as the shake check requires.
pub fn shake_threshold(odds: f64) -> u32 {
    if odds <= 0.0 {
        return 0;
    }
    let inner = (16_711_680.0 / odds).sqrt().floor();
    let outer = inner.sqrt().floor().max(1.0);
    (1_048_560.0 / outer).floor() as u32
}

/// Run one shake. Certain captures pass without a roll.
pub fn shake_check(odds: f64, rng: &mut TurnRng) -> bool {
    if odds >= CERTAIN_CAPTURE_ODDS {
        return true;
    }
    let threshold = shake_threshold(odds);
    if threshold == 0 {
        return false;
    }
    let roll = rng.next(0..=65_535, "capture shake");
    roll < threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Shakes that passed.
    pub shakes: u8,
    pub caught: bool,
}

/// Resolve a whole throw: up to four independent shakes, stopping at the first failure.
/// A certain capture resolves after a single shake.
pub fn resolve_capture(odds: f64, rng: &mut TurnRng) -> CaptureOutcome {
    if odds >= CERTAIN_CAPTURE_ODDS {
        return CaptureOutcome { shakes: 1, caught: true };
    }
    let mut shakes = 0;
    while shakes < REQUIRED_SHAKES {
        if !shake_check(odds, rng) {
            debug!(odds, shakes, "capture failed");
            return CaptureOutcome { shakes, caught: false };
        }
        shakes += 1;
    }
    CaptureOutcome { shakes, caught: true }
}
