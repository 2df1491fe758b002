//! Match configuration
//!
//! Produced by the menu (or a JSON file for the headless runner) and applied
//! atomically when a match starts.

use serde::{Deserialize, Serialize};

use crate::sim::ArenaShape;

/// Allowed ranges, matching the menu's limits
pub const BALL_COUNT_RANGE: (u32, u32) = (3, 25);
pub const MATCH_DURATION_RANGE: (f32, f32) = (30.0, 300.0);
pub const DISRUPTION_INTERVAL_RANGE: (f32, f32) = (5.0, 30.0);
pub const PICKUP_INTERVAL_RANGE: (f32, f32) = (3.0, 20.0);

/// A menu row that can be stepped left/right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigField {
    BallCount,
    MatchDuration,
    DisruptionInterval,
    PickupInterval,
    ArenaShape,
}

impl ConfigField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::BallCount => "Balls",
            ConfigField::MatchDuration => "Duration",
            ConfigField::DisruptionInterval => "Disruptions",
            ConfigField::PickupInterval => "Pickups",
            ConfigField::ArenaShape => "Arena Shape",
        }
    }
}

/// Everything the simulation needs to start a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of agents spawned at match start
    pub ball_count: u32,
    /// Match length in seconds
    pub match_duration: f32,
    /// Seconds between disruptions
    pub disruption_interval: f32,
    /// Seconds between pickup spawns
    pub pickup_interval: f32,
    /// Starting arena shape
    pub arena_shape: ArenaShape,
    /// Run seed for reproducibility
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ball_count: 8,
            match_duration: 60.0,
            disruption_interval: 12.0,
            pickup_interval: 8.0,
            arena_shape: ArenaShape::Hexagon,
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Copy with every field forced into its allowed range
    pub fn clamped(&self) -> Self {
        Self {
            ball_count: self.ball_count.clamp(BALL_COUNT_RANGE.0, BALL_COUNT_RANGE.1),
            match_duration: clamp_f32(self.match_duration, MATCH_DURATION_RANGE),
            disruption_interval: clamp_f32(self.disruption_interval, DISRUPTION_INTERVAL_RANGE),
            pickup_interval: clamp_f32(self.pickup_interval, PICKUP_INTERVAL_RANGE),
            arena_shape: self.arena_shape,
            seed: self.seed,
        }
    }

    /// Step a field the way the menu's left/right keys do.
    ///
    /// `direction` is -1 or +1. Numeric fields clamp at their range ends,
    /// the arena shape cycles.
    pub fn adjust(&mut self, field: ConfigField, direction: i32) {
        let dir = direction.signum();
        match field {
            ConfigField::BallCount => {
                let next = self.ball_count as i64 + dir as i64 * 2;
                self.ball_count =
                    next.clamp(BALL_COUNT_RANGE.0 as i64, BALL_COUNT_RANGE.1 as i64) as u32;
            }
            ConfigField::MatchDuration => {
                self.match_duration =
                    clamp_f32(self.match_duration + dir as f32 * 15.0, MATCH_DURATION_RANGE);
            }
            ConfigField::DisruptionInterval => {
                self.disruption_interval = clamp_f32(
                    self.disruption_interval + dir as f32 * 3.0,
                    DISRUPTION_INTERVAL_RANGE,
                );
            }
            ConfigField::PickupInterval => {
                self.pickup_interval =
                    clamp_f32(self.pickup_interval + dir as f32 * 2.0, PICKUP_INTERVAL_RANGE);
            }
            ConfigField::ArenaShape => {
                self.arena_shape = self.arena_shape.cycled(dir);
            }
        }
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<MatchConfig>(json).map(|config| config.clamped())
    }

    /// Load a config file, falling back to defaults on any problem
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded match config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Invalid match config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not read match config {}: {}", path.display(), e),
        }

        log::info!("Using default match config");
        Self::default()
    }
}

fn clamp_f32(value: f32, range: (f32, f32)) -> f32 {
    value.clamp(range.0, range.1)
}
