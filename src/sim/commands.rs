//! Intents sent from the input layer to the simulation.
//!
//! Gameplay intents act on the selected unit and apply at the start of the
//! next fixed step; phase intents apply at the next frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Intent {
    // --- Squad control ---
    /// Select one of the player's units by id.
    SelectUnit { id: String },
    /// Cycle to the next live player unit.
    SelectNext,
    /// Order the selected unit to walk toward a point (range-clamped).
    MoveOrder { target: Vec2 },
    /// Start winding up a throw with the selected unit.
    StartCharge,
    /// Throw the charged snowball at a point.
    ReleaseCharge { aim: Vec2 },

    // --- Phase control ---
    StartGame,
    Pause,
    Resume,
    /// Leave a paused or finished game for the title screen.
    Quit,
    /// Replay the current level after a game over.
    Restart,
    /// Continue after clearing a level.
    NextLevel,
    ShowHowToPlay,
    ShowCredits,
    BackToTitle,
}

impl Intent {
    /// Phase intents change screens rather than act on units
    pub fn is_phase_control(&self) -> bool {
        matches!(
            self,
            Intent::StartGame
                | Intent::Pause
                | Intent::Resume
                | Intent::Quit
                | Intent::Restart
                | Intent::NextLevel
                | Intent::ShowHowToPlay
                | Intent::ShowCredits
                | Intent::BackToTitle
        )
    }
}
