//! Data-driven game balance
//!
//! Every gameplay number that is balance rather than geometry lives here, so
//! a JSON file can reshape the game feel without touching the sim. Values
//! omitted from the JSON keep their defaults.

use serde::{Deserialize, Serialize};

/// Gameplay balance parameters
///
/// Speeds and accelerations are per frame-tick (the physics step is fixed at
/// the frame rate); durations are milliseconds of accumulated elapsed time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added to vertical velocity each frame
    pub gravity: f32,
    /// Initial upward speed when a jump starts
    pub jump_min: f32,
    /// Upward speed cap while holding the jump key
    pub jump_max: f32,
    /// Extra upward acceleration per frame while the jump key is held (negative = up)
    pub jump_hold_accel: f32,
    /// Upward velocity multiplier when the jump key is released early
    pub jump_cut_factor: f32,
    /// Fraction of jump_min granted as a mid-fall recovery impulse
    pub air_impulse_factor: f32,

    /// Horizontal walk speed, pixels per frame
    pub walk_speed: f32,
    /// Walk speed multiplier while the run key is held
    pub run_multiplier: f32,
    /// Enemy patrol speed, pixels per frame (applied moving left)
    pub enemy_speed: f32,
    /// Pickup leftward drift, pixels per frame
    pub object_speed: f32,

    /// Immunity window after a star or a survivable hit
    pub immunity_ms: f64,
    /// Run-cycle animation frame interval
    pub run_anim_ms: f64,

    /// Object spawner delay range, milliseconds
    pub object_spawn_min_ms: f64,
    pub object_spawn_max_ms: f64,
    /// Enemy spawner delay range, milliseconds
    pub enemy_spawn_min_ms: f64,
    pub enemy_spawn_max_ms: f64,
    /// Maximum enemies alive at once
    pub max_enemies_alive: usize,
    /// Maximum enemies spawned over a whole session
    pub max_enemies_total: u32,

    /// Scoring
    pub points_growth_mushroom: u64,
    pub points_life_mushroom: u64,
    pub points_coin: u64,
    pub points_coin_bonus: u64,
    pub points_star: u64,
    pub points_stomp: u64,
    pub points_immune_kill: u64,
    /// Coins needed before the counter wraps into an extra life
    pub coins_per_life: u32,

    /// Lives at session start
    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_min: 8.0,
            jump_max: 14.0,
            jump_hold_accel: -0.5,
            jump_cut_factor: 0.5,
            air_impulse_factor: 0.7,

            walk_speed: 3.0,
            run_multiplier: 2.5,
            enemy_speed: 2.0,
            object_speed: 2.0,

            immunity_ms: 3000.0,
            run_anim_ms: 100.0,

            object_spawn_min_ms: 3000.0,
            object_spawn_max_ms: 7000.0,
            enemy_spawn_min_ms: 2000.0,
            enemy_spawn_max_ms: 5000.0,
            max_enemies_alive: 2,
            max_enemies_total: 10,

            points_growth_mushroom: 100,
            points_life_mushroom: 200,
            points_coin: 100,
            points_coin_bonus: 500,
            points_star: 500,
            points_stomp: 100,
            points_immune_kill: 200,
            coins_per_life: 10,

            starting_lives: 3,
        }
    }
}

/// Tuning rejection reasons
#[derive(Debug)]
pub enum TuningError {
    /// A field that must be strictly positive was zero or negative
    NonPositive { field: &'static str, value: f64 },
    /// A field that must lie in [0, 1] was outside it
    OutOfUnitRange { field: &'static str, value: f64 },
    /// A min/max delay pair was inverted
    InvertedRange { field: &'static str },
    /// The JSON itself did not parse
    Parse(serde_json::Error),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::NonPositive { field, value } => {
                write!(f, "tuning field `{field}` must be positive, got {value}")
            }
            TuningError::OutOfUnitRange { field, value } => {
                write!(f, "tuning field `{field}` must be within [0, 1], got {value}")
            }
            TuningError::InvertedRange { field } => {
                write!(f, "tuning range `{field}` has min greater than max")
            }
            TuningError::Parse(e) => write!(f, "tuning JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults for missing fields.
    /// The result is validated; a bad config is rejected without effect.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::NonPositive { field, value })
            }
        }
        fn unit(field: &'static str, value: f64) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::OutOfUnitRange { field, value })
            }
        }

        positive("gravity", self.gravity as f64)?;
        positive("jump_min", self.jump_min as f64)?;
        positive("jump_max", self.jump_max as f64)?;
        if self.jump_max < self.jump_min {
            return Err(TuningError::InvertedRange { field: "jump_min/jump_max" });
        }
        unit("jump_cut_factor", self.jump_cut_factor as f64)?;
        unit("air_impulse_factor", self.air_impulse_factor as f64)?;
        positive("walk_speed", self.walk_speed as f64)?;
        positive("run_multiplier", self.run_multiplier as f64)?;
        positive("enemy_speed", self.enemy_speed as f64)?;
        positive("object_speed", self.object_speed as f64)?;
        positive("immunity_ms", self.immunity_ms)?;
        positive("run_anim_ms", self.run_anim_ms)?;
        positive("object_spawn_min_ms", self.object_spawn_min_ms)?;
        positive("enemy_spawn_min_ms", self.enemy_spawn_min_ms)?;
        if self.object_spawn_max_ms < self.object_spawn_min_ms {
            return Err(TuningError::InvertedRange { field: "object_spawn_ms" });
        }
        if self.enemy_spawn_max_ms < self.enemy_spawn_min_ms {
            return Err(TuningError::InvertedRange { field: "enemy_spawn_ms" });
        }
        positive("max_enemies_alive", self.max_enemies_alive as f64)?;
        positive("max_enemies_total", self.max_enemies_total as f64)?;
        positive("coins_per_life", self.coins_per_life as f64)?;
        positive("starting_lives", self.starting_lives as f64)?;
        Ok(())
    }
}
