//! Game state and core simulation types
//!
//! Everything a presentation layer needs to draw a frame lives in
//! [`GameState`], which serializes as a snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{Obstacle, Snowball, Team, Unit};
use super::levels::LevelTable;
use super::particles::ParticlePool;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Title screen
    #[default]
    Title,
    HowToPlay,
    Credits,
    /// Active gameplay; the only phase that advances fixed steps
    Playing,
    Paused,
    /// All enemies down, waiting for NextLevel
    LevelComplete,
    /// All player units down
    GameOver,
    /// Campaign finished
    Victory,
}

/// Viewport mapping between screen pixels and arena units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World-space offset of the view
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Convert a canvas position to arena coordinates. The arena is drawn
    /// centered in the canvas at `scale`.
    pub fn screen_to_world(
        &self,
        screen: Vec2,
        canvas_w: f32,
        canvas_h: f32,
        arena_w: f32,
        arena_h: f32,
    ) -> Vec2 {
        let offset = Vec2::new(
            (canvas_w - arena_w * self.scale) / 2.0,
            (canvas_h - arena_h * self.scale) / 2.0,
        );
        (screen - offset) / self.scale + Vec2::new(self.x, self.y)
    }

    /// Inverse of [`Camera::screen_to_world`]
    pub fn world_to_screen(
        &self,
        world: Vec2,
        canvas_w: f32,
        canvas_h: f32,
        arena_w: f32,
        arena_h: f32,
    ) -> Vec2 {
        let offset = Vec2::new(
            (canvas_w - arena_w * self.scale) / 2.0,
            (canvas_h - arena_h * self.scale) / 2.0,
        );
        (world - Vec2::new(self.x, self.y)) * self.scale + offset
    }
}

/// Camera shake feedback
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    /// Seconds until the shake cuts out
    pub timer: f32,
}

/// Complete game state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Red units first, then green, in spawn order
    pub units: Vec<Unit>,
    pub snowballs: Vec<Snowball>,
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    pub selected_unit_id: Option<String>,
    pub camera: Camera,
    pub screen_shake: ScreenShake,
    pub arena_width: f32,
    pub arena_height: f32,
    /// Countdown shown after a level is cleared
    pub level_transition_timer: f32,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl GameState {
    /// Empty world sitting on the title screen
    pub fn new(max_particles: usize) -> Self {
        Self {
            phase: GamePhase::Title,
            level: 1,
            score: 0,
            units: Vec::new(),
            snowballs: Vec::new(),
            obstacles: Vec::new(),
            particles: ParticlePool::new(max_particles),
            selected_unit_id: None,
            camera: Camera::default(),
            screen_shake: ScreenShake::default(),
            arena_width: BASE_ARENA_W,
            arena_height: BASE_ARENA_H,
            level_transition_timer: 0.0,
            next_id: 0,
        }
    }

    /// Allocate a new entity ID such as `unit_3` or `sb_12`
    pub fn next_entity_id(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}_{id}")
    }

    pub fn reset_ids(&mut self) {
        self.next_id = 0;
    }

    /// Populate the world for `self.level`
    pub fn setup_level(&mut self, levels: &LevelTable, tuning: &Tuning) {
        self.reset_ids();

        let Some(data) = levels.get(self.level) else {
            log::warn!("No level data for level {}", self.level);
            return;
        };
        self.arena_width = data.arena_width;
        self.arena_height = data.arena_height;
        self.snowballs.clear();
        self.particles = ParticlePool::new(tuning.max_particles);
        self.selected_unit_id = None;
        self.level_transition_timer = 0.0;
        self.screen_shake = ScreenShake::default();
        self.units.clear();

        // Player squad on the left edge
        let spacing = data.arena_height / (tuning.player_count + 1) as f32;
        for i in 0..tuning.player_count {
            let pos = Vec2::new(tuning.spawn_inset_x, spacing * (i + 1) as f32);
            let id = self.next_entity_id("unit");
            self.units.push(Unit::new(id, Team::Red, pos, tuning));
        }

        // Enemies on the right edge
        let spacing = data.arena_height / (data.enemy_count + 1) as f32;
        for i in 0..data.enemy_count {
            let pos = Vec2::new(
                data.arena_width - tuning.spawn_inset_x,
                spacing * (i + 1) as f32,
            );
            let id = self.next_entity_id("unit");
            let mut unit = Unit::new(id, Team::Green, pos, tuning);
            unit.speed *= data.enemy_speed;
            self.units.push(unit);
        }

        self.obstacles = data
            .obstacles
            .iter()
            .map(|o| {
                let id = self.next_entity_id("obs");
                Obstacle::new(id, o.kind, o.pos, o.width, o.height, o.hp)
            })
            .collect();

        self.selected_unit_id = self
            .units
            .iter()
            .find(|u| u.team == Team::Red)
            .map(|u| u.id.clone());

        log::info!(
            "Level {} \"{}\": {} enemies, {} obstacles, arena {}x{}",
            self.level,
            data.name,
            data.enemy_count,
            self.obstacles.len(),
            self.arena_width,
            self.arena_height
        );
    }

    /// Live units on a team
    pub fn alive_count(&self, team: Team) -> usize {
        self.units
            .iter()
            .filter(|u| u.team == team && u.is_alive())
            .count()
    }

    /// Outcome of the current board: `GameOver` if the player squad is down
    /// (checked first), `LevelComplete` if every enemy is down, else
    /// `Playing`. Pure.
    pub fn check_win_condition(&self) -> GamePhase {
        if self.alive_count(Team::Red) == 0 {
            GamePhase::GameOver
        } else if self.alive_count(Team::Green) == 0 {
            GamePhase::LevelComplete
        } else {
            GamePhase::Playing
        }
    }

    pub fn unit_index(&self, id: &str) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        let id = self.selected_unit_id.as_deref()?;
        self.units.iter().find(|u| u.id == id)
    }

    pub fn selected_unit_mut(&mut self) -> Option<&mut Unit> {
        let id = self.selected_unit_id.as_deref()?;
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Select a live red unit by id; anything else is ignored
    pub fn select_unit(&mut self, id: &str) -> bool {
        let valid = self
            .units
            .iter()
            .any(|u| u.id == id && u.team == Team::Red && u.is_alive());
        if valid {
            self.selected_unit_id = Some(id.to_string());
        }
        valid
    }

    /// Cycle to the next live red unit after the current selection
    /// (wrapping). Returns the newly selected id.
    pub fn select_next_unit(&mut self) -> Option<&str> {
        let live: Vec<&str> = self
            .units
            .iter()
            .filter(|u| u.team == Team::Red && u.is_alive())
            .map(|u| u.id.as_str())
            .collect();
        if live.is_empty() {
            return None;
        }

        let next = match self.selected_unit_id.as_deref() {
            Some(current) => live
                .iter()
                .position(|id| *id == current)
                .map_or(0, |i| (i + 1) % live.len()),
            None => 0,
        };
        self.selected_unit_id = Some(live[next].to_string());
        self.selected_unit_id.as_deref()
    }

    /// Kick the camera after a hit
    pub fn add_shake(&mut self, amount: f32, max: f32, duration: f32) {
        self.screen_shake.intensity = (self.screen_shake.intensity + amount).min(max);
        self.screen_shake.timer = duration;
    }

    /// Count the shake timer down (zeroing intensity when it expires) and
    /// decay intensity exponentially
    pub fn update_screen_shake(&mut self, dt: f32, decay: f32) {
        let shake = &mut self.screen_shake;
        if shake.timer > 0.0 {
            shake.timer -= dt;
            if shake.timer <= 0.0 {
                shake.timer = 0.0;
                shake.intensity = 0.0;
            }
        }
        shake.intensity = (shake.intensity * (1.0 - decay * dt)).max(0.0);
    }

    /// Fit the whole arena into a canvas with a small margin
    pub fn fit_camera(&mut self, canvas_w: f32, canvas_h: f32) {
        if canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }
        let scale_x = canvas_w / self.arena_width;
        let scale_y = canvas_h / self.arena_height;
        self.camera.scale = scale_x.min(scale_y) * 0.95;
        self.camera.x = 0.0;
        self.camera.y = 0.0;
    }
}
