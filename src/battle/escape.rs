use crate::battle::state::TurnRng;
use tracing::debug;

/// Escape odds out of 256 for the given attempt count (already including this attempt).
pub fn escape_odds(player_speed: u16, enemy_speed: u16, attempts: u32) -> u32 {
    if enemy_speed == 0 {
        return 255;
    }
    let base = player_speed as u32 * 128 / enemy_speed as u32;
    (base + 30 * attempts) % 256
}

/// Resolve one Run attempt. A player at least as fast as the enemy always escapes
/// without consuming a roll.
pub fn attempt_escape(player_speed: u16, enemy_speed: u16, attempts: u32, rng: &mut TurnRng) -> bool {
    if player_speed >= enemy_speed {
        debug!(player_speed, enemy_speed, "escape guaranteed");
        return true;
    }
    let odds = escape_odds(player_speed, enemy_speed, attempts);
    let roll = rng.next(0..=255, "escape roll");
    let escaped = roll < odds;
    debug!(player_speed, enemy_speed, attempts, odds, roll, escaped, "escape check");
    escaped
}
