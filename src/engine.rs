//! Variable-rate driver around the fixed-step simulation
//!
//! The host calls [`Engine::update`] once per frame with the elapsed real
//! time. Phase intents apply right away; gameplay intents and raw input are
//! folded into the next fixed step.

use std::collections::VecDeque;

use glam::Vec2;

use crate::error::ConfigError;
use crate::input::{InputState, PointerButton, translate};
use crate::sim::{GameEvent, GamePhase, GameState, Intent, LevelTable, Simulation, Unit};
use crate::tuning::Tuning;

/// Game instance holding the simulation, input and frame timing
#[derive(Debug, Clone)]
pub struct Engine {
    sim: Simulation,
    input: InputState,
    /// Submitted intents not yet applied
    queue: VecDeque<Intent>,
    accumulator: f32,
    /// Canvas size in pixels
    viewport: Vec2,
}

impl Engine {
    /// Engine with default tuning and the built-in campaign
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), LevelTable::builtin())
    }

    pub fn with_config(seed: u64, tuning: Tuning, levels: LevelTable) -> Self {
        log::info!("Snowcraft engine starting (seed {seed}, {} levels)", levels.len());
        let mut sim = Simulation::new(seed, tuning, levels);
        let viewport = Vec2::new(sim.state().arena_width, sim.state().arena_height);
        sim.fit_camera(viewport.x, viewport.y);
        Self {
            sim,
            input: InputState::default(),
            queue: VecDeque::new(),
            accumulator: 0.0,
            viewport,
        }
    }

    /// Build from JSON documents; `None` keeps the defaults
    pub fn from_json(
        seed: u64,
        tuning_json: Option<&str>,
        levels_json: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(json)?,
            None => Tuning::default(),
        };
        let levels = match levels_json {
            Some(json) => LevelTable::from_json(json)?,
            None => LevelTable::builtin(),
        };
        Ok(Self::with_config(seed, tuning, levels))
    }

    // === Input ===

    /// Queue an intent for the next update
    pub fn submit(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn handle_pointer_down(&mut self, button: PointerButton, pos: Vec2) {
        self.input.pointer_down(button, pos);
    }

    pub fn handle_pointer_up(&mut self, button: PointerButton, pos: Vec2) {
        self.input.pointer_up(button, pos);
    }

    pub fn handle_pointer_move(&mut self, pos: Vec2) {
        self.input.pointer_move(pos);
    }

    pub fn handle_key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    pub fn handle_key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Canvas resized
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.sim.fit_camera(width, height);
    }

    // === Frame ===

    /// Advance by `elapsed` seconds of real time. Returns the number of fixed
    /// steps run.
    pub fn update(&mut self, elapsed: f32) -> u32 {
        let tuning = self.sim.tuning();
        let fixed_dt = tuning.fixed_dt;
        let dt = if elapsed.is_finite() {
            elapsed.clamp(0.0, tuning.max_frame_dt)
        } else {
            0.0
        };

        let mut gameplay = Vec::new();
        for intent in self.queue.drain(..) {
            if intent.is_phase_control() {
                self.sim.apply_intent(&intent);
            } else {
                gameplay.push(intent);
            }
        }
        self.sim.fit_camera(self.viewport.x, self.viewport.y);

        if self.sim.phase() != GamePhase::Playing {
            if !gameplay.is_empty() {
                log::trace!("Dropping {} intents in {:?}", gameplay.len(), self.sim.phase());
            }
            self.input.end_step();
            self.accumulator = 0.0;
            self.sim.tick_passive(dt);
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed_dt {
            let mut intents = std::mem::take(&mut gameplay);
            let pointer = self.pointer_world();
            intents.extend(translate(
                &self.input,
                self.sim.state(),
                self.sim.tuning(),
                pointer,
            ));
            self.sim.step(&intents, fixed_dt);

            // Clear one-shot inputs after processing
            self.input.end_step();
            self.accumulator -= fixed_dt;
            steps += 1;

            if self.sim.phase() != GamePhase::Playing {
                self.accumulator = 0.0;
                break;
            }
        }

        // No step ran this frame; keep orders for the next one
        for intent in gameplay.into_iter().rev() {
            self.queue.push_front(intent);
        }
        steps
    }

    // === Presentation ===

    pub fn state(&self) -> &GameState {
        self.sim.state()
    }

    /// Owned copy of the world for a presentation layer
    pub fn snapshot(&self) -> GameState {
        self.sim.state().clone()
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.sim.state())
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase()
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.sim.state().selected_unit()
    }

    pub fn tuning(&self) -> &Tuning {
        self.sim.tuning()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.sim.drain_events()
    }

    /// Pointer position in arena coordinates
    pub fn pointer_world(&self) -> Vec2 {
        self.screen_to_world(self.input.pointer)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let state = self.sim.state();
        state.camera.screen_to_world(
            screen,
            self.viewport.x,
            self.viewport.y,
            state.arena_width,
            state.arena_height,
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let state = self.sim.state();
        state.camera.world_to_screen(
            world,
            self.viewport.x,
            self.viewport.y,
            state.arena_width,
            state.arena_height,
        )
    }
}
