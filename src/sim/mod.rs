//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order of units, snowballs and obstacles)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod commands;
pub mod entities;
pub mod events;
pub mod geom;
pub mod levels;
pub mod movement;
pub mod particles;
pub mod state;
pub mod tick;

pub use ai::{AgentMemory, AiMemory, update_ai};
pub use collision::{CollisionReport, ObstacleHit, UnitHit, cull_out_of_bounds, detect_collisions, resolve_collisions};
pub use combat::{advance_snowballs, release_throw, start_charge, update_charge, update_timers};
pub use commands::Intent;
pub use entities::{
    Obstacle, ObstacleKind, Particle, ParticleKind, Snowball, Team, Unit, UnitSprite,
};
pub use events::GameEvent;
pub use geom::{circle_circle, circle_rect, point_in_circle, random_range};
pub use levels::{LevelData, LevelTable, ObstaclePlacement};
pub use movement::{move_unit_to, update_movement};
pub use particles::ParticlePool;
pub use state::{Camera, GamePhase, GameState, ScreenShake};
pub use tick::Simulation;
