//! Pointer and keyboard state, and its translation into intents
//!
//! The platform layer feeds raw events in; once per fixed step
//! [`translate`] turns the accumulated state into gameplay intents and
//! [`InputState::end_step`] clears the one-shot flags.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::geom::point_in_circle;
use crate::sim::{GameState, Intent, Team};
use crate::tuning::Tuning;

pub const KEY_SELECT_NEXT: &str = "Tab";
pub const KEY_PAUSE: &str = "Escape";
/// Held to throw at open ground
pub const KEY_FORCE_THROW: &str = "Shift";

/// Pointer buttons as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse / touch
    Primary,
    /// Right mouse
    Secondary,
    Other(u8),
}

impl From<u8> for PointerButton {
    /// DOM `MouseEvent.button` numbering
    fn from(button: u8) -> Self {
        match button {
            0 => PointerButton::Primary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// Raw input accumulated between fixed steps
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position in canvas pixels
    pub pointer: Vec2,
    pub primary_down: bool,
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub secondary_down: bool,
    pub secondary_pressed: bool,
    pub keys: HashSet<String>,
    pub keys_pressed: HashSet<String>,
}

impl InputState {
    pub fn pointer_down(&mut self, button: PointerButton, pos: Vec2) {
        match button {
            PointerButton::Primary => {
                self.primary_down = true;
                self.primary_pressed = true;
            }
            PointerButton::Secondary => {
                self.secondary_down = true;
                self.secondary_pressed = true;
            }
            PointerButton::Other(_) => {}
        }
        self.pointer = pos;
    }

    pub fn pointer_up(&mut self, button: PointerButton, pos: Vec2) {
        match button {
            PointerButton::Primary => {
                self.primary_down = false;
                self.primary_released = true;
            }
            PointerButton::Secondary => self.secondary_down = false,
            PointerButton::Other(_) => {}
        }
        self.pointer = pos;
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_string());
        self.keys_pressed.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn was_pressed(&self, key: &str) -> bool {
        self.keys_pressed.contains(key)
    }

    /// Clear one-shot flags (held state survives)
    pub fn end_step(&mut self) {
        self.primary_pressed = false;
        self.primary_released = false;
        self.secondary_pressed = false;
        self.keys_pressed.clear();
    }
}

/// Turn the current input into gameplay intents for one step.
///
/// `pointer_world` is the pointer already mapped into arena coordinates.
pub fn translate(
    input: &InputState,
    state: &GameState,
    tuning: &Tuning,
    pointer_world: Vec2,
) -> Vec<Intent> {
    let mut intents = Vec::new();

    if input.was_pressed(KEY_SELECT_NEXT) {
        intents.push(Intent::SelectNext);
    }
    if input.was_pressed(KEY_PAUSE) {
        intents.push(Intent::Pause);
        return intents;
    }

    let selected = state.selected_unit().filter(|u| u.is_alive());

    if input.primary_pressed {
        // Clicking one of our own units selects it
        let clicked = state.units.iter().find(|u| {
            u.team == Team::Red
                && u.is_alive()
                && point_in_circle(pointer_world, u.pos, u.radius + tuning.select_padding)
        });
        if let Some(unit) = clicked {
            intents.push(Intent::SelectUnit {
                id: unit.id.clone(),
            });
            return intents;
        }

        // Clicking near an enemy (or anywhere with the force key) winds up
        if let Some(unit) = selected.filter(|u| u.can_throw()) {
            let near_enemy = state.units.iter().any(|u| {
                u.team == Team::Green
                    && u.is_alive()
                    && u.pos.distance(pointer_world) < tuning.throw_assist_radius
            });
            if near_enemy || input.is_held(KEY_FORCE_THROW) {
                if !unit.charging {
                    intents.push(Intent::StartCharge);
                }
                return intents;
            }
        }
    }

    // Holding the button winds up too
    if input.primary_down && selected.is_some_and(|u| !u.charging && u.can_throw()) {
        intents.push(Intent::StartCharge);
    }

    if input.primary_released && selected.is_some_and(|u| u.charging) {
        intents.push(Intent::ReleaseCharge { aim: pointer_world });
    }

    if input.secondary_pressed && selected.is_some_and(|u| !u.charging) {
        intents.push(Intent::MoveOrder {
            target: pointer_world,
        });
    }

    intents
}
