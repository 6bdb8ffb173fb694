//! Events emitted by the simulation for audio and UI feedback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{ObstacleKind, Team};
use super::state::GamePhase;

/// Discrete things that happened during a step or phase change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A unit began winding up.
    ChargeStarted { unit_id: String },
    /// A snowball left a unit's hand; `charge` drives pitch and volume.
    ThrowReleased { unit_id: String, team: Team, charge: f32 },
    /// A snowball struck a unit.
    SnowballHit { unit_id: String, damage: f32, pos: Vec2 },
    /// A snowball struck an obstacle.
    ObstacleHit {
        obstacle_id: String,
        kind: ObstacleKind,
        destroyed: bool,
    },
    /// A unit dropped to zero hp.
    Knockout { unit_id: String, team: Team },
    /// The player picked a different unit.
    UnitSelected { unit_id: String },
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Every enemy is down; score already includes the bonus.
    LevelComplete { level: u32, score: u64 },
    GameOver { level: u32, score: u64 },
    /// The final level was cleared.
    Victory { score: u64 },
    /// Menu navigation or a move order was accepted.
    UiClick,
}
