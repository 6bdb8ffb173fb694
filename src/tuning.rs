//! Data-driven game balance
//!
//! Every constant the systems consult lives here. Defaults mirror `consts`;
//! a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::lerp;

/// Level-scaled AI parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Probability of committing to a throw on a think cycle (0-1)
    pub aggression: f32,
    /// Aim quality (0-1); jitter shrinks as this grows
    pub accuracy: f32,
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    pub fixed_dt: f32,
    pub max_frame_dt: f32,

    // === Units ===
    pub unit_radius: f32,
    pub unit_speed: f32,
    pub unit_max_hp: f32,
    pub unit_cooldown: f32,
    pub hit_flash_time: f32,
    pub movement_range: f32,
    pub arrive_epsilon: f32,
    pub player_count: u32,
    pub spawn_inset_x: f32,

    // === Snowballs ===
    pub snowball_radius: f32,
    pub snowball_min_speed: f32,
    pub snowball_max_speed: f32,
    pub snowball_min_damage: f32,
    pub snowball_max_damage: f32,
    pub snowball_lifetime: f32,
    pub snowball_arc_height: f32,
    pub charge_time: f32,
    /// Floor applied to the charge on release
    pub min_throw_charge: f32,
    /// Gap between the thrower's edge and the spawned snowball
    pub throw_spawn_margin: f32,
    /// Snowballs above this height fly over everything
    pub ground_hit_height: f32,
    pub cull_margin: f32,
    pub trail_interval: f32,

    // === Particles ===
    pub max_particles: usize,
    pub puff_count_on_hit: u32,
    pub puff_count_on_obstacle: u32,
    pub particle_damping: f32,
    pub puff_shrink: f32,
    pub charge_particle_interval: f32,

    // === AI ===
    pub ai_think_interval: f32,
    pub ai_throw_range: f32,
    pub ai_approach_range: f32,
    pub ai_scatter_distance: f32,
    pub ai_arena_inset: f32,
    pub ai_max_inaccuracy: f32,
    pub ai_max_lead: f32,
    pub ai_release_delay_min: f32,
    pub ai_release_delay_max: f32,
    pub ai_approach_min: f32,
    pub ai_approach_fraction: f32,
    pub ai_strafe_min: f32,
    pub ai_strafe_max: f32,
    pub ai_aggression_base: f32,
    pub ai_aggression_max: f32,
    pub ai_accuracy_base: f32,
    pub ai_accuracy_max: f32,
    /// Level at which difficulty stops scaling
    pub ai_difficulty_levels: u32,

    // === Feedback ===
    pub shake_per_hit: f32,
    pub shake_max: f32,
    pub shake_hit_time: f32,
    pub shake_decay: f32,

    // === Scoring ===
    pub level_bonus: u64,
    pub survivor_bonus: u64,
    pub level_transition_time: f32,

    // === Input ===
    pub select_padding: f32,
    pub throw_assist_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            max_frame_dt: MAX_FRAME_DT,

            unit_radius: UNIT_RADIUS,
            unit_speed: UNIT_SPEED,
            unit_max_hp: UNIT_MAX_HP,
            unit_cooldown: UNIT_COOLDOWN,
            hit_flash_time: UNIT_HIT_FLASH_TIME,
            movement_range: MOVEMENT_RANGE,
            arrive_epsilon: ARRIVE_EPSILON,
            player_count: PLAYER_COUNT,
            spawn_inset_x: SPAWN_INSET_X,

            snowball_radius: SNOWBALL_RADIUS,
            snowball_min_speed: SNOWBALL_MIN_SPEED,
            snowball_max_speed: SNOWBALL_MAX_SPEED,
            snowball_min_damage: SNOWBALL_MIN_DAMAGE,
            snowball_max_damage: SNOWBALL_MAX_DAMAGE,
            snowball_lifetime: SNOWBALL_LIFETIME,
            snowball_arc_height: SNOWBALL_ARC_HEIGHT,
            charge_time: CHARGE_TIME,
            min_throw_charge: MIN_THROW_CHARGE,
            throw_spawn_margin: THROW_SPAWN_MARGIN,
            ground_hit_height: GROUND_HIT_HEIGHT,
            cull_margin: CULL_MARGIN,
            trail_interval: TRAIL_INTERVAL,

            max_particles: MAX_PARTICLES,
            puff_count_on_hit: PUFF_COUNT_ON_HIT,
            puff_count_on_obstacle: PUFF_COUNT_ON_OBSTACLE,
            particle_damping: PARTICLE_DAMPING,
            puff_shrink: PUFF_SHRINK,
            charge_particle_interval: CHARGE_PARTICLE_INTERVAL,

            ai_think_interval: AI_THINK_INTERVAL,
            ai_throw_range: AI_THROW_RANGE,
            ai_approach_range: AI_APPROACH_RANGE,
            ai_scatter_distance: AI_SCATTER_DISTANCE,
            ai_arena_inset: AI_ARENA_INSET,
            ai_max_inaccuracy: AI_MAX_INACCURACY,
            ai_max_lead: 0.3,
            ai_release_delay_min: 0.2,
            ai_release_delay_max: 0.8,
            ai_approach_min: 40.0,
            ai_approach_fraction: 0.6,
            ai_strafe_min: 30.0,
            ai_strafe_max: 80.0,
            ai_aggression_base: 0.4,
            ai_aggression_max: 0.9,
            ai_accuracy_base: 0.3,
            ai_accuracy_max: 0.9,
            ai_difficulty_levels: AI_DIFFICULTY_LEVELS,

            shake_per_hit: SHAKE_PER_HIT,
            shake_max: SHAKE_MAX,
            shake_hit_time: SHAKE_HIT_TIME,
            shake_decay: SHAKE_DECAY,

            level_bonus: LEVEL_BONUS,
            survivor_bonus: SURVIVOR_BONUS,
            level_transition_time: LEVEL_TRANSITION_TIME,

            select_padding: SELECT_PADDING,
            throw_assist_radius: THROW_ASSIST_RADIUS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would stall or invert the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("fixed_dt", self.fixed_dt),
            ("max_frame_dt", self.max_frame_dt),
            ("arrive_epsilon", self.arrive_epsilon),
            ("unit_radius", self.unit_radius),
            ("unit_max_hp", self.unit_max_hp),
            ("snowball_radius", self.snowball_radius),
            ("snowball_lifetime", self.snowball_lifetime),
            ("charge_time", self.charge_time),
            ("ai_think_interval", self.ai_think_interval),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "greater than zero",
                });
            }
        }

        let unit_interval = [
            ("min_throw_charge", self.min_throw_charge),
            ("particle_damping", self.particle_damping),
            ("puff_shrink", self.puff_shrink),
            ("ai_aggression_base", self.ai_aggression_base),
            ("ai_aggression_max", self.ai_aggression_max),
            ("ai_accuracy_base", self.ai_accuracy_base),
            ("ai_accuracy_max", self.ai_accuracy_max),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "within 0..=1",
                });
            }
        }

        if self.snowball_max_speed < self.snowball_min_speed {
            return Err(ConfigError::OutOfRange {
                name: "snowball_max_speed",
                value: self.snowball_max_speed,
                expected: "at least snowball_min_speed",
            });
        }
        if self.snowball_max_damage < self.snowball_min_damage {
            return Err(ConfigError::OutOfRange {
                name: "snowball_max_damage",
                value: self.snowball_max_damage,
                expected: "at least snowball_min_damage",
            });
        }
        if self.player_count == 0 {
            return Err(ConfigError::OutOfRange {
                name: "player_count",
                value: 0.0,
                expected: "at least 1",
            });
        }
        Ok(())
    }

    /// Snowball speed for a charge fraction (clamped to 0-1)
    #[inline]
    pub fn snowball_speed(&self, charge: f32) -> f32 {
        lerp(
            self.snowball_min_speed,
            self.snowball_max_speed,
            charge.clamp(0.0, 1.0),
        )
    }

    /// Snowball damage for a charge fraction (clamped to 0-1)
    #[inline]
    pub fn snowball_damage(&self, charge: f32) -> f32 {
        lerp(
            self.snowball_min_damage,
            self.snowball_max_damage,
            charge.clamp(0.0, 1.0),
        )
    }

    /// AI aggression/accuracy for a level: rises linearly from level 1 and
    /// saturates at `ai_difficulty_levels`
    pub fn difficulty(&self, level: u32) -> Difficulty {
        let span = self.ai_difficulty_levels.saturating_sub(1).max(1) as f32;
        let t = (level.saturating_sub(1) as f32 / span).clamp(0.0, 1.0);
        Difficulty {
            aggression: lerp(self.ai_aggression_base, self.ai_aggression_max, t),
            accuracy: lerp(self.ai_accuracy_base, self.ai_accuracy_max, t),
        }
    }
}
