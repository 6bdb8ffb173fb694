//! Snowcraft - deterministic simulation core for a top-down snowball arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, systems, phase state machine)
//! - `engine`: Variable-rate driver with fixed-step accumulator and intent queue
//! - `input`: Minimal pointer/keyboard state and per-step intent translation
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod engine;
pub mod error;
pub mod input;
pub mod sim;
pub mod tuning;

pub use engine::Engine;
pub use error::ConfigError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    /// Maximum real time consumed per frame before catch-up is dropped
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Arena defaults (overridden by level data)
    pub const BASE_ARENA_W: f32 = 800.0;
    pub const BASE_ARENA_H: f32 = 600.0;

    /// Unit defaults
    pub const UNIT_RADIUS: f32 = 14.0;
    pub const UNIT_SPEED: f32 = 120.0; // px/sec
    pub const UNIT_MAX_HP: f32 = 100.0;
    pub const UNIT_COOLDOWN: f32 = 0.8; // seconds between throws
    pub const UNIT_HIT_FLASH_TIME: f32 = 0.15;
    pub const MOVEMENT_RANGE: f32 = 250.0; // max move distance per order
    pub const ARRIVE_EPSILON: f32 = 3.0;
    pub const PLAYER_COUNT: u32 = 3;
    pub const SPAWN_INSET_X: f32 = 80.0;

    /// Snowball defaults
    pub const SNOWBALL_RADIUS: f32 = 5.0;
    pub const SNOWBALL_MIN_SPEED: f32 = 200.0;
    pub const SNOWBALL_MAX_SPEED: f32 = 500.0;
    pub const SNOWBALL_MIN_DAMAGE: f32 = 15.0;
    pub const SNOWBALL_MAX_DAMAGE: f32 = 45.0;
    pub const SNOWBALL_LIFETIME: f32 = 2.0; // seconds
    pub const SNOWBALL_ARC_HEIGHT: f32 = 30.0; // pixels
    pub const CHARGE_TIME: f32 = 1.0; // seconds for full charge
    pub const MIN_THROW_CHARGE: f32 = 0.1;
    pub const THROW_SPAWN_MARGIN: f32 = 8.0;
    pub const GROUND_HIT_HEIGHT: f32 = 15.0;
    pub const CULL_MARGIN: f32 = 50.0;
    pub const TRAIL_INTERVAL: f32 = 0.05; // seconds between trail particles

    /// Obstacle defaults
    pub const FORT_HP: f32 = 80.0;
    pub const SNOWMAN_HP: f32 = 40.0;
    pub const INDESTRUCTIBLE_HP: f32 = 9999.0;

    /// Particle defaults
    pub const MAX_PARTICLES: usize = 200;
    pub const PUFF_COUNT_ON_HIT: u32 = 8;
    pub const PUFF_COUNT_ON_OBSTACLE: u32 = 4;
    pub const PARTICLE_DAMPING: f32 = 0.95;
    pub const PUFF_SHRINK: f32 = 0.98;
    pub const CHARGE_PARTICLE_INTERVAL: f32 = 0.05;

    /// AI defaults
    pub const AI_THINK_INTERVAL: f32 = 0.5; // seconds between decisions
    pub const AI_THROW_RANGE: f32 = 350.0;
    pub const AI_APPROACH_RANGE: f32 = 250.0;
    pub const AI_SCATTER_DISTANCE: f32 = 60.0;
    pub const AI_ARENA_INSET: f32 = 30.0;
    pub const AI_MAX_INACCURACY: f32 = 60.0;
    pub const AI_DIFFICULTY_LEVELS: u32 = 10;

    /// Screen shake
    pub const SHAKE_PER_HIT: f32 = 2.0;
    pub const SHAKE_MAX: f32 = 6.0;
    pub const SHAKE_HIT_TIME: f32 = 0.15;
    pub const SHAKE_DECAY: f32 = 8.0; // how fast shake fades

    /// Scoring
    pub const LEVEL_BONUS: u64 = 100;
    pub const SURVIVOR_BONUS: u64 = 50;
    pub const LEVEL_TRANSITION_TIME: f32 = 2.0;

    /// Input assists
    pub const SELECT_PADDING: f32 = 4.0;
    pub const THROW_ASSIST_RADIUS: f32 = 200.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Heading of a vector in radians
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector (scaled by `length`) pointing along `angle`
#[inline]
pub fn from_angle(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos() * length, angle.sin() * length)
}
