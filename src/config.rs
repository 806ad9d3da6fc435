//! Battle timing configuration.
use crate::errors::DataLoadError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Distance and speed of one positional animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenSettings {
    /// Pixels travelled.
    pub distance: f32,
    /// Pixels per second.
    pub speed: f32,
}

impl TweenSettings {
    pub const fn new(distance: f32, speed: f32) -> Self {
        Self { distance, speed }
    }
}

/// Every rate and duration the battle controller depends on.
///
/// The defaults match `data/battle_config.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Characters typed per second in the dialogue box.
    pub text_speed: f32,
    /// Scales how long a finished second line stays on screen.
    pub text_hold_factor: f32,
    /// Hit points drained per second on the health bar.
    pub health_drain_speed: f32,
    /// Experience points filled per second on the xp bar.
    pub xp_fill_speed: f32,
    /// Upper bound on a single frame delta, in seconds.
    pub max_frame_delta: f32,
    pub fade_delay: f32,
    /// Opacity units per second.
    pub fade_speed: f32,
    /// Pause before a status or special move resolves.
    pub move_effect_delay: f32,
    /// Pause while a damaging move's animation plays.
    pub attack_animation: f32,
    pub slide_in: TweenSettings,
    pub slide_out: TweenSettings,
    pub pokemon_throw: TweenSettings,
    pub ball_throw: TweenSettings,
    pub ball_bounce: TweenSettings,
    pub ball_shake: TweenSettings,
    pub faint: TweenSettings,
    pub bag_switch: TweenSettings,
    /// Interval between host ticks when driven by the async runner.
    pub frame_interval_ms: u64,
    pub level_cap: u8,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            text_speed: 48.0,
            text_hold_factor: 0.8,
            health_drain_speed: 16.0,
            xp_fill_speed: 48.0,
            max_frame_delta: 0.25,
            fade_delay: 0.1,
            fade_speed: 3.0,
            move_effect_delay: 0.8,
            attack_animation: 0.5,
            slide_in: TweenSettings::new(240.0, 176.0),
            slide_out: TweenSettings::new(100.0, 176.0),
            pokemon_throw: TweenSettings::new(64.0, 64.0),
            ball_throw: TweenSettings::new(166.0, 192.0),
            ball_bounce: TweenSettings::new(32.0, 192.0),
            ball_shake: TweenSettings::new(0.0, 192.0),
            faint: TweenSettings::new(53.0, 176.0),
            bag_switch: TweenSettings::new(64.0, 196.0),
            frame_interval_ms: 16,
            level_cap: 100,
        }
    }
}

impl BattleConfig {
    /// Read a configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| DataLoadError::io(path, e))?;
        let config: BattleConfig = ron::from_str(&content)
            .map_err(|e| DataLoadError::parse(&path.display().to_string(), e))?;
        debug!(path = %path.display(), "loaded battle config");
        Ok(config)
    }

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_CONFIG` - path to a RON config file (default: built-in values)
    pub fn from_env() -> Self {
        match env::var("BATTLE_CONFIG") {
            Ok(path) => Self::load(Path::new(&path)).unwrap_or_else(|err| {
                warn!(%err, "falling back to default battle config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Clamp a raw frame delta to the configured maximum.
    pub fn clamp_delta(&self, delta: f32) -> f32 {
        delta.clamp(0.0, self.max_frame_delta)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
