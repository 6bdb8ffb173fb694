//! Entity types and their factories
//!
//! Units, snowballs and obstacles carry string ids handed out by
//! [`GameState::next_entity_id`](super::state::GameState::next_entity_id).
//! Particles are anonymous and live in the particle pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FORT_HP, INDESTRUCTIBLE_HP, SNOWMAN_HP};
use crate::tuning::Tuning;

/// The two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Player-controlled
    Red,
    /// Computer-controlled
    Green,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Green,
            Team::Green => Team::Red,
        }
    }

    /// Starting facing: red looks right, green looks left
    pub fn initial_facing(self) -> f32 {
        match self {
            Team::Red => 0.0,
            Team::Green => std::f32::consts::PI,
        }
    }

    pub fn sprite(self) -> UnitSprite {
        match self {
            Team::Red => UnitSprite {
                body: 0xe74c3c,
                scarf: 0xc0392b,
                hat: 0x922b21,
                outline: 0x7b241c,
            },
            Team::Green => UnitSprite {
                body: 0x2ecc71,
                scarf: 0x27ae60,
                hat: 0x1e8449,
                outline: 0x196f3d,
            },
        }
    }
}

/// Team-derived colors (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSprite {
    pub body: u32,
    pub scarf: u32,
    pub hat: u32,
    pub outline: u32,
}

/// A snowball thrower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Move order destination
    pub target: Option<Vec2>,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub speed: f32,
    pub knocked_out: bool,
    /// Seconds spent knocked out
    pub knockout_timer: f32,
    /// Seconds until the next throw is allowed
    pub cooldown: f32,
    pub cooldown_max: f32,
    /// Radians
    pub facing: f32,
    /// Throw power accumulator (0-1)
    pub charge: f32,
    pub charging: bool,
    pub hit_flash: f32,
    pub sprite: UnitSprite,
}

impl Unit {
    pub fn new(id: String, team: Team, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            team,
            pos,
            vel: Vec2::ZERO,
            target: None,
            hp: tuning.unit_max_hp,
            max_hp: tuning.unit_max_hp,
            radius: tuning.unit_radius,
            speed: tuning.unit_speed,
            knocked_out: false,
            knockout_timer: 0.0,
            cooldown: 0.0,
            cooldown_max: tuning.unit_cooldown,
            facing: team.initial_facing(),
            charge: 0.0,
            charging: false,
            hit_flash: 0.0,
            sprite: team.sprite(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.knocked_out
    }

    /// Off cooldown and standing
    #[inline]
    pub fn can_throw(&self) -> bool {
        !self.knocked_out && self.cooldown <= 0.0
    }

    /// Apply damage; returns true if this hit knocked the unit out
    pub fn take_damage(&mut self, damage: f32, flash_time: f32) -> bool {
        if self.knocked_out {
            return false;
        }
        self.hp -= damage;
        self.hit_flash = flash_time;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.knocked_out = true;
            self.knockout_timer = 0.0;
            // Knockout cancels everything in progress
            self.charging = false;
            self.charge = 0.0;
            self.target = None;
            self.vel = Vec2::ZERO;
            return true;
        }
        false
    }
}

/// A thrown snowball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snowball {
    pub id: String,
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    /// Ground shadow position (depth sorting and drop shadow only)
    pub shadow: Vec2,
    /// Visual elevation above the ground plane
    pub height: f32,
    pub height_vel: f32,
    /// Countdown to the next trail particle
    pub trail_timer: f32,
}

impl Snowball {
    /// Create a snowball at `origin` heading along `direction` (normalized
    /// here); speed and damage follow the charge fraction
    pub fn new(
        id: String,
        team: Team,
        origin: Vec2,
        direction: Vec2,
        charge: f32,
        tuning: &Tuning,
    ) -> Self {
        let speed = tuning.snowball_speed(charge);
        let damage = tuning.snowball_damage(charge);
        Self {
            id,
            team,
            pos: origin,
            vel: direction.normalize_or_zero() * speed,
            speed,
            radius: tuning.snowball_radius,
            damage,
            lifetime: tuning.snowball_lifetime,
            max_lifetime: tuning.snowball_lifetime,
            shadow: origin,
            height: 0.0,
            // Initial upward velocity for the arc
            height_vel: tuning.snowball_arc_height * 2.0,
            trail_timer: tuning.trail_interval,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Fort,
    Snowman,
    Tree,
    Rock,
}

impl ObstacleKind {
    /// Default (width, height, hp)
    pub fn defaults(self) -> (f32, f32, f32) {
        match self {
            ObstacleKind::Fort => (60.0, 30.0, FORT_HP),
            ObstacleKind::Snowman => (30.0, 30.0, SNOWMAN_HP),
            ObstacleKind::Tree => (24.0, 24.0, INDESTRUCTIBLE_HP),
            ObstacleKind::Rock => (36.0, 28.0, INDESTRUCTIBLE_HP),
        }
    }

    /// Forts and snowmen crumble; trees and rocks never do
    pub fn is_destructible(self) -> bool {
        matches!(self, ObstacleKind::Fort | ObstacleKind::Snowman)
    }
}

/// A static axis-aligned blocker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub kind: ObstacleKind,
    /// Center of the box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub hp: f32,
    pub max_hp: f32,
}

impl Obstacle {
    /// Create an obstacle, falling back to the kind's defaults for any size or
    /// hp not given
    pub fn new(
        id: String,
        kind: ObstacleKind,
        pos: Vec2,
        width: Option<f32>,
        height: Option<f32>,
        hp: Option<f32>,
    ) -> Self {
        let (default_w, default_h, default_hp) = kind.defaults();
        let hp = hp.unwrap_or(default_hp);
        Self {
            id,
            kind,
            pos,
            width: width.unwrap_or(default_w),
            height: height.unwrap_or(default_h),
            hp,
            max_hp: hp,
        }
    }

    /// Rubble left by a destructible obstacle; the record stays for rendering
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.kind.is_destructible() && self.hp <= 0.0
    }

    /// Whether units and snowballs collide with it
    #[inline]
    pub fn is_blocking(&self) -> bool {
        !self.is_destroyed()
    }

    /// Apply snowball damage. Indestructible kinds absorb the hit unchanged.
    /// Returns true if this hit destroyed the obstacle.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if !self.kind.is_destructible() || self.is_destroyed() {
            return false;
        }
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            return true;
        }
        false
    }
}

/// Visual category of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    SnowPuff,
    HitSpark,
    SnowTrail,
    ChargeGlow,
}

/// A short-lived visual effect (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
    pub kind: ParticleKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_unit_defaults() {
        let tuning = Tuning::default();
        let red = Unit::new("unit_0".into(), Team::Red, Vec2::new(50.0, 50.0), &tuning);
        assert_eq!(red.team, Team::Red);
        assert_eq!(red.pos, Vec2::new(50.0, 50.0));
        assert_eq!(red.hp, UNIT_MAX_HP);
        assert!(red.is_alive());
        assert!(red.can_throw());
        assert_eq!(red.facing, 0.0);
        assert_eq!(red.sprite.body, 0xe74c3c);

        let green = Unit::new("unit_1".into(), Team::Green, Vec2::new(200.0, 300.0), &tuning);
        assert_eq!(green.facing, std::f32::consts::PI);
        assert_ne!(green.sprite, red.sprite);
    }

    #[test]
    fn test_unit_knockout_cancels_charge() {
        let tuning = Tuning::default();
        let mut unit = Unit::new("unit_0".into(), Team::Red, Vec2::ZERO, &tuning);
        unit.charging = true;
        unit.charge = 0.6;
        unit.target = Some(Vec2::new(10.0, 0.0));

        assert!(!unit.take_damage(40.0, 0.15));
        assert_eq!(unit.hp, 60.0);
        assert!(unit.charging);

        assert!(unit.take_damage(100.0, 0.15));
        assert_eq!(unit.hp, 0.0);
        assert!(unit.knocked_out);
        assert!(!unit.charging);
        assert_eq!(unit.charge, 0.0);
        assert!(unit.target.is_none());

        // Knockout is terminal
        assert!(!unit.take_damage(10.0, 0.15));
        assert_eq!(unit.hp, 0.0);
    }

    #[test]
    fn test_snowball_charge_bounds() {
        let tuning = Tuning::default();
        let weak = Snowball::new("sb_0".into(), Team::Red, Vec2::ZERO, Vec2::X, 0.0, &tuning);
        assert_eq!(weak.speed, SNOWBALL_MIN_SPEED);
        assert_eq!(weak.damage, SNOWBALL_MIN_DAMAGE);
        assert!((weak.vel.length() - SNOWBALL_MIN_SPEED).abs() < 1e-3);

        let strong = Snowball::new("sb_1".into(), Team::Red, Vec2::ZERO, Vec2::X, 1.0, &tuning);
        assert_eq!(strong.speed, SNOWBALL_MAX_SPEED);
        assert_eq!(strong.damage, SNOWBALL_MAX_DAMAGE);

        let mid = Snowball::new("sb_2".into(), Team::Red, Vec2::ZERO, Vec2::X, 0.25, &tuning);
        assert!((mid.speed - 275.0).abs() < 1e-3);
        assert!((mid.damage - 22.5).abs() < 1e-3);
    }

    #[test]
    fn test_snowball_origin_and_direction() {
        let tuning = Tuning::default();
        let origin = Vec2::new(100.0, 100.0);
        let sb = Snowball::new(
            "sb_0".into(),
            Team::Green,
            origin,
            Vec2::new(0.0, -3.0),
            0.5,
            &tuning,
        );
        assert_eq!(sb.pos, origin);
        assert_eq!(sb.shadow, origin);
        assert_eq!(sb.team, Team::Green);
        assert_eq!(sb.lifetime, SNOWBALL_LIFETIME);
        assert!(sb.vel.x.abs() < 1e-4);
        assert!(sb.vel.y < 0.0);
        assert_eq!(sb.height, 0.0);
    }

    #[test]
    fn test_obstacle_defaults_and_overrides() {
        let fort = Obstacle::new("obs_0".into(), ObstacleKind::Fort, Vec2::ZERO, None, None, None);
        assert_eq!((fort.width, fort.height, fort.hp), (60.0, 30.0, FORT_HP));
        assert_eq!(fort.max_hp, FORT_HP);

        let custom = Obstacle::new(
            "obs_1".into(),
            ObstacleKind::Fort,
            Vec2::ZERO,
            Some(100.0),
            None,
            Some(120.0),
        );
        assert_eq!(custom.width, 100.0);
        assert_eq!(custom.height, 30.0);
        assert_eq!(custom.max_hp, 120.0);
    }

    #[test]
    fn test_destructible_obstacle_persists_as_rubble() {
        let mut snowman =
            Obstacle::new("obs_0".into(), ObstacleKind::Snowman, Vec2::ZERO, None, None, None);
        assert!(snowman.is_blocking());
        assert!(!snowman.take_damage(30.0));
        assert!(snowman.take_damage(30.0));
        assert_eq!(snowman.hp, 0.0);
        assert!(snowman.is_destroyed());
        assert!(!snowman.is_blocking());
        // Further hits are ignored
        assert!(!snowman.take_damage(30.0));
    }

    #[test]
    fn test_indestructible_obstacle_ignores_damage() {
        let mut rock = Obstacle::new("obs_0".into(), ObstacleKind::Rock, Vec2::ZERO, None, None, Some(1.0));
        assert!(!rock.take_damage(500.0));
        assert_eq!(rock.hp, 1.0);
        assert!(rock.is_blocking());

        // Even a level file that zeroes its hp cannot make it stop blocking
        rock.hp = 0.0;
        assert!(rock.is_blocking());
    }
}
