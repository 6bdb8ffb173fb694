//! Fixed timestep simulation tick
//!
//! [`Simulation`] owns the world, the enemy decision memory and the seeded
//! RNG. It applies intents, advances the systems in a fixed order and runs
//! the phase state machine.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ai::{AiMemory, update_ai};
use super::collision::{cull_out_of_bounds, detect_collisions, resolve_collisions};
use super::combat::{advance_snowballs, release_throw, start_charge, update_charge, update_timers};
use super::commands::Intent;
use super::entities::Team;
use super::events::GameEvent;
use super::levels::LevelTable;
use super::movement::{move_unit_to, update_movement};
use super::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// The deterministic game core
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    ai: AiMemory,
    rng: Pcg32,
    tuning: Tuning,
    levels: LevelTable,
    /// Pending events, oldest first
    events: Vec<GameEvent>,
    /// Countdown to the next charge glow on the selected unit
    charge_particle_timer: f32,
}

impl Simulation {
    /// Create a simulation on the title screen
    pub fn new(seed: u64, tuning: Tuning, levels: LevelTable) -> Self {
        Self {
            state: GameState::new(tuning.max_particles),
            ai: AiMemory::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            levels,
            events: Vec::new(),
            charge_particle_timer: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fit the camera to a canvas size
    pub fn fit_camera(&mut self, canvas_w: f32, canvas_h: f32) {
        self.state.fit_camera(canvas_w, canvas_h);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        log::info!("Phase {from:?} -> {to:?}");
        self.state.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Set up `self.state.level` from scratch and forget enemy memory
    fn load_level(&mut self) {
        self.state.setup_level(&self.levels, &self.tuning);
        self.ai.reset();
        self.charge_particle_timer = 0.0;
    }

    // === Phase control ===

    /// Title -> Playing with a fresh run at level 1
    pub fn start_game(&mut self) {
        if self.state.phase != GamePhase::Title {
            return;
        }
        self.state = GameState::new(self.tuning.max_particles);
        self.state.level = 1;
        self.state.score = 0;
        self.load_level();
        self.events.push(GameEvent::UiClick);
        self.set_phase(GamePhase::Playing);
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.events.push(GameEvent::UiClick);
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Abandon a paused or finished game
    pub fn quit(&mut self) {
        if matches!(
            self.state.phase,
            GamePhase::Paused | GamePhase::LevelComplete | GamePhase::GameOver | GamePhase::Victory
        ) {
            self.events.push(GameEvent::UiClick);
            self.set_phase(GamePhase::Title);
        }
    }

    /// Replay the current level after a loss; the score is kept
    pub fn restart_level(&mut self) {
        if self.state.phase != GamePhase::GameOver {
            return;
        }
        self.load_level();
        self.events.push(GameEvent::UiClick);
        self.set_phase(GamePhase::Playing);
    }

    /// Advance past a cleared level, or finish the campaign
    pub fn next_level(&mut self) {
        if self.state.phase != GamePhase::LevelComplete {
            return;
        }
        if self.state.level >= self.levels.len() {
            log::info!("Campaign cleared with score {}", self.state.score);
            self.events.push(GameEvent::Victory {
                score: self.state.score,
            });
            self.set_phase(GamePhase::Victory);
            return;
        }
        self.state.level += 1;
        self.load_level();
        self.events.push(GameEvent::UiClick);
        self.set_phase(GamePhase::Playing);
    }

    pub fn show_how_to_play(&mut self) {
        if self.state.phase == GamePhase::Title {
            self.events.push(GameEvent::UiClick);
            self.set_phase(GamePhase::HowToPlay);
        }
    }

    pub fn show_credits(&mut self) {
        if self.state.phase == GamePhase::Title {
            self.events.push(GameEvent::UiClick);
            self.set_phase(GamePhase::Credits);
        }
    }

    pub fn back_to_title(&mut self) {
        if matches!(self.state.phase, GamePhase::HowToPlay | GamePhase::Credits) {
            self.events.push(GameEvent::UiClick);
            self.set_phase(GamePhase::Title);
        }
    }

    /// Apply one intent. Intents that do not fit the current phase are
    /// ignored.
    pub fn apply_intent(&mut self, intent: &Intent) {
        let before = self.state.phase;
        match intent {
            Intent::StartGame => self.start_game(),
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            Intent::Quit => self.quit(),
            Intent::Restart => self.restart_level(),
            Intent::NextLevel => self.next_level(),
            Intent::ShowHowToPlay => self.show_how_to_play(),
            Intent::ShowCredits => self.show_credits(),
            Intent::BackToTitle => self.back_to_title(),
            gameplay => {
                if self.state.phase == GamePhase::Playing {
                    self.apply_gameplay(gameplay);
                } else {
                    log::trace!("Ignoring {gameplay:?} in {:?}", self.state.phase);
                }
                return;
            }
        }
        if self.state.phase == before {
            log::trace!("Ignoring {intent:?} in {before:?}");
        }
    }

    /// Unit orders, all acting on the selected unit
    fn apply_gameplay(&mut self, intent: &Intent) {
        match intent {
            Intent::SelectUnit { id } => {
                if self.state.select_unit(id) {
                    self.events.push(GameEvent::UnitSelected {
                        unit_id: id.clone(),
                    });
                }
            }
            Intent::SelectNext => {
                if let Some(id) = self.state.select_next_unit() {
                    let unit_id = id.to_string();
                    self.events.push(GameEvent::UnitSelected { unit_id });
                }
            }
            Intent::MoveOrder { target } => {
                let range = self.tuning.movement_range;
                let Some(unit) = self.state.selected_unit_mut() else {
                    return;
                };
                // Planted while charging
                if unit.is_alive() && !unit.charging {
                    move_unit_to(unit, *target, range);
                    self.events.push(GameEvent::UiClick);
                }
            }
            Intent::StartCharge => {
                let Some(unit) = self.state.selected_unit_mut() else {
                    return;
                };
                if !unit.charging && start_charge(unit) {
                    let unit_id = unit.id.clone();
                    self.events.push(GameEvent::ChargeStarted { unit_id });
                }
            }
            Intent::ReleaseCharge { aim } => {
                let Some(idx) = self
                    .state
                    .selected_unit_id
                    .as_deref()
                    .and_then(|id| self.state.unit_index(id))
                else {
                    return;
                };
                if let Some(charge) = release_throw(&mut self.state, idx, *aim, &self.tuning) {
                    let unit = &self.state.units[idx];
                    self.events.push(GameEvent::ThrowReleased {
                        unit_id: unit.id.clone(),
                        team: unit.team,
                        charge,
                    });
                }
            }
            _ => {}
        }
    }

    /// Advance one fixed step. Only runs while playing; gameplay stops as
    /// soon as an intent leaves the `Playing` phase.
    pub fn step(&mut self, intents: &[Intent], dt: f32) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        for intent in intents {
            self.apply_intent(intent);
            if self.state.phase != GamePhase::Playing {
                return;
            }
        }
        self.run_systems(dt);
        self.evaluate_outcome();
    }

    /// The per-step system order
    fn run_systems(&mut self, dt: f32) {
        let tuning = &self.tuning;
        let state = &mut self.state;

        update_movement(
            &mut state.units,
            &state.obstacles,
            state.arena_width,
            state.arena_height,
            dt,
            tuning.arrive_epsilon,
        );

        for pos in advance_snowballs(&mut state.snowballs, dt, tuning) {
            state.particles.trail(&mut self.rng, pos);
        }
        update_timers(&mut state.units, dt);
        for unit in state.units.iter_mut() {
            update_charge(unit, dt, tuning.charge_time);
        }

        // Charge glow on the selected unit only
        if let Some((center, charge)) = state
            .selected_unit()
            .filter(|u| u.charging)
            .map(|u| (u.pos, u.charge))
        {
            self.charge_particle_timer -= dt;
            if self.charge_particle_timer <= 0.0 {
                state.particles.charge_glow(&mut self.rng, center, charge);
                self.charge_particle_timer = tuning.charge_particle_interval;
            }
        }

        let report = detect_collisions(state, tuning.ground_hit_height);
        resolve_collisions(state, &report, &mut self.rng, tuning, &mut self.events);
        cull_out_of_bounds(state, tuning.cull_margin);

        update_ai(state, &mut self.ai, &mut self.rng, tuning, dt, &mut self.events);

        state
            .particles
            .update(dt, tuning.particle_damping, tuning.puff_shrink);
        state.update_screen_shake(dt, tuning.shake_decay);
    }

    /// End-of-step win/lose check; a loss takes precedence
    fn evaluate_outcome(&mut self) {
        match self.state.check_win_condition() {
            GamePhase::GameOver => {
                log::info!("Game over on level {}", self.state.level);
                self.events.push(GameEvent::GameOver {
                    level: self.state.level,
                    score: self.state.score,
                });
                self.set_phase(GamePhase::GameOver);
            }
            GamePhase::LevelComplete => {
                let survivors = self.state.alive_count(Team::Red) as u64;
                let bonus = self.tuning.level_bonus * self.state.level as u64
                    + self.tuning.survivor_bonus * survivors;
                self.state.score += bonus;
                self.state.level_transition_timer = self.tuning.level_transition_time;
                log::info!(
                    "Level {} complete: +{bonus} ({survivors} survivors), score {}",
                    self.state.level,
                    self.state.score
                );
                self.events.push(GameEvent::LevelComplete {
                    level: self.state.level,
                    score: self.state.score,
                });
                self.set_phase(GamePhase::LevelComplete);
            }
            _ => {}
        }
    }

    /// Per-frame update for phases that do not run fixed steps
    pub fn tick_passive(&mut self, dt: f32) {
        if self.state.phase == GamePhase::LevelComplete {
            self.state.level_transition_timer = (self.state.level_transition_timer - dt).max(0.0);
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
