//! Snowball collision detection and resolution
//!
//! Detection is a pure pass over the state producing index pairs. Resolution
//! consumes each snowball at most once (unit hits take priority over obstacle
//! hits) and removes consumed snowballs in one sweep at the end.

use rand::Rng;

use super::entities::Team;
use super::events::GameEvent;
use super::geom::{circle_circle, circle_rect};
use super::state::GameState;
use crate::tuning::Tuning;

/// Snowball `snowball` overlaps unit `unit` (indices into the state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHit {
    pub snowball: usize,
    pub unit: usize,
}

/// Snowball `snowball` overlaps obstacle `obstacle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleHit {
    pub snowball: usize,
    pub obstacle: usize,
}

/// Everything detected in one step, in snowball order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub unit_hits: Vec<UnitHit>,
    pub obstacle_hits: Vec<ObstacleHit>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.unit_hits.is_empty() && self.obstacle_hits.is_empty()
    }
}

/// Find every low-flying snowball overlapping a live opposing unit or a
/// blocking obstacle
pub fn detect_collisions(state: &GameState, ground_threshold: f32) -> CollisionReport {
    let mut report = CollisionReport::default();

    for (si, sb) in state.snowballs.iter().enumerate() {
        // Sails over everything at the top of the arc
        if sb.height > ground_threshold {
            continue;
        }

        for (ui, unit) in state.units.iter().enumerate() {
            if !unit.is_alive() || unit.team == sb.team {
                continue;
            }
            if circle_circle(sb.pos, sb.radius, unit.pos, unit.radius) {
                report.unit_hits.push(UnitHit {
                    snowball: si,
                    unit: ui,
                });
            }
        }

        for (oi, obs) in state.obstacles.iter().enumerate() {
            if !obs.is_blocking() {
                continue;
            }
            if circle_rect(sb.pos, sb.radius, obs.pos, obs.width, obs.height) {
                report.obstacle_hits.push(ObstacleHit {
                    snowball: si,
                    obstacle: oi,
                });
            }
        }
    }

    report
}

/// Apply damage and feedback for a detection report, then remove every
/// snowball that landed a hit
pub fn resolve_collisions<R: Rng>(
    state: &mut GameState,
    report: &CollisionReport,
    rng: &mut R,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    if report.is_empty() {
        return;
    }
    let mut consumed = vec![false; state.snowballs.len()];

    for hit in &report.unit_hits {
        if consumed[hit.snowball] {
            continue;
        }
        consumed[hit.snowball] = true;

        let (impact, damage) = {
            let sb = &state.snowballs[hit.snowball];
            (sb.pos, sb.damage)
        };
        let unit = &mut state.units[hit.unit];
        let knocked_out = unit.take_damage(damage, tuning.hit_flash_time);
        let (unit_id, team, unit_pos) = (unit.id.clone(), unit.team, unit.pos);

        state.particles.burst(rng, impact, tuning.puff_count_on_hit);
        state.add_shake(tuning.shake_per_hit, tuning.shake_max, tuning.shake_hit_time);
        events.push(GameEvent::SnowballHit {
            unit_id: unit_id.clone(),
            damage,
            pos: impact,
        });

        if knocked_out {
            log::debug!("{unit_id} ({team:?}) knocked out");
            state.particles.burst(rng, unit_pos, tuning.puff_count_on_hit * 2);
            if team == Team::Red && state.selected_unit_id.as_deref() == Some(unit_id.as_str()) {
                state.select_next_unit();
            }
            events.push(GameEvent::Knockout { unit_id, team });
        }
    }

    for hit in &report.obstacle_hits {
        if consumed[hit.snowball] {
            continue;
        }
        consumed[hit.snowball] = true;

        let sb = &state.snowballs[hit.snowball];
        let (impact, damage) = (sb.pos, sb.damage);
        let obs = &mut state.obstacles[hit.obstacle];
        let destroyed = obs.take_damage(damage);
        events.push(GameEvent::ObstacleHit {
            obstacle_id: obs.id.clone(),
            kind: obs.kind,
            destroyed,
        });
        if destroyed {
            log::debug!("{} ({:?}) destroyed", obs.id, obs.kind);
        }

        state.particles.burst(rng, impact, tuning.puff_count_on_obstacle);
    }

    let mut idx = 0;
    state.snowballs.retain(|_| {
        let keep = !consumed[idx];
        idx += 1;
        keep
    });
}

/// Drop snowballs that left the arena by more than `margin`
pub fn cull_out_of_bounds(state: &mut GameState, margin: f32) {
    let (w, h) = (state.arena_width, state.arena_height);
    state.snowballs.retain(|sb| {
        sb.pos.x > -margin && sb.pos.x < w + margin && sb.pos.y > -margin && sb.pos.y < h + margin
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Obstacle, ObstacleKind, ParticleKind, Snowball, Unit};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameState, Tuning, Pcg32) {
        let tuning = Tuning::default();
        let mut state = GameState::new(tuning.max_particles);
        state.units.push(Unit::new("unit_0".into(), Team::Red, Vec2::new(100.0, 100.0), &tuning));
        state.units.push(Unit::new("unit_1".into(), Team::Green, Vec2::new(300.0, 100.0), &tuning));
        state.selected_unit_id = Some("unit_0".into());
        (state, tuning, Pcg32::seed_from_u64(42))
    }

    fn snowball(id: &str, team: Team, x: f32, y: f32, tuning: &Tuning) -> Snowball {
        Snowball::new(id.into(), team, Vec2::new(x, y), Vec2::X, 0.5, tuning)
    }

    #[test]
    fn test_detects_enemy_hit_only() {
        let (mut state, tuning, _) = setup();
        state.snowballs.push(snowball("sb_0", Team::Red, 295.0, 100.0, &tuning));
        // Friendly snowball sitting on its own thrower
        state.snowballs.push(snowball("sb_1", Team::Red, 100.0, 100.0, &tuning));

        let report = detect_collisions(&state, tuning.ground_hit_height);
        assert_eq!(report.unit_hits, vec![UnitHit { snowball: 0, unit: 1 }]);
        assert!(report.obstacle_hits.is_empty());
    }

    #[test]
    fn test_high_snowballs_fly_over() {
        let (mut state, tuning, _) = setup();
        let mut sb = snowball("sb_0", Team::Red, 300.0, 100.0, &tuning);
        sb.height = 20.0;
        state.snowballs.push(sb);
        assert!(detect_collisions(&state, tuning.ground_hit_height).is_empty());
    }

    #[test]
    fn test_knocked_out_units_are_not_targets() {
        let (mut state, tuning, _) = setup();
        state.units[1].take_damage(1000.0, 0.0);
        state.snowballs.push(snowball("sb_0", Team::Red, 300.0, 100.0, &tuning));
        assert!(detect_collisions(&state, tuning.ground_hit_height).is_empty());
    }

    #[test]
    fn test_resolve_unit_hit() {
        let (mut state, tuning, mut rng) = setup();
        state.snowballs.push(snowball("sb_0", Team::Red, 295.0, 100.0, &tuning));
        let damage = state.snowballs[0].damage;

        let report = detect_collisions(&state, tuning.ground_hit_height);
        let mut events = Vec::new();
        resolve_collisions(&mut state, &report, &mut rng, &tuning, &mut events);

        assert!(state.snowballs.is_empty());
        assert!((state.units[1].hp - (100.0 - damage)).abs() < 1e-4);
        assert_eq!(state.units[1].hit_flash, tuning.hit_flash_time);
        assert_eq!(state.particles.len(), tuning.puff_count_on_hit as usize);
        assert_eq!(state.screen_shake.intensity, tuning.shake_per_hit);
        assert_eq!(state.screen_shake.timer, tuning.shake_hit_time);
        assert!(matches!(events.as_slice(), [GameEvent::SnowballHit { .. }]));
    }

    #[test]
    fn test_knockout_bursts_and_reselects() {
        let (mut state, tuning, mut rng) = setup();
        state.units.push(Unit::new("unit_2".into(), Team::Red, Vec2::new(100.0, 300.0), &tuning));
        state.units[0].hp = 5.0;
        state.units[0].charging = true;
        state.snowballs.push(snowball("sb_0", Team::Green, 100.0, 100.0, &tuning));

        let report = detect_collisions(&state, tuning.ground_hit_height);
        let mut events = Vec::new();
        resolve_collisions(&mut state, &report, &mut rng, &tuning, &mut events);

        let unit = &state.units[0];
        assert!(unit.knocked_out);
        assert_eq!(unit.hp, 0.0);
        assert!(!unit.charging);
        assert_eq!(state.particles.len(), (tuning.puff_count_on_hit * 3) as usize);
        assert!(state.particles.iter().all(|p| p.kind == ParticleKind::SnowPuff));
        assert_eq!(state.selected_unit_id.as_deref(), Some("unit_2"));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Knockout { team: Team::Red, .. }
        )));
    }

    #[test]
    fn test_snowball_resolves_once() {
        let (mut state, tuning, mut rng) = setup();
        // Second green unit stacked on the first, plus a fort under both
        state.units.push(Unit::new("unit_2".into(), Team::Green, Vec2::new(300.0, 100.0), &tuning));
        state.obstacles.push(Obstacle::new(
            "obs_0".into(),
            ObstacleKind::Fort,
            Vec2::new(300.0, 100.0),
            None,
            None,
            None,
        ));
        state.snowballs.push(snowball("sb_0", Team::Red, 300.0, 100.0, &tuning));

        let report = detect_collisions(&state, tuning.ground_hit_height);
        assert_eq!(report.unit_hits.len(), 2);
        assert_eq!(report.obstacle_hits.len(), 1);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &report, &mut rng, &tuning, &mut events);

        // Only the first listed unit takes damage
        assert!(state.units[1].hp < 100.0);
        assert_eq!(state.units[2].hp, 100.0);
        assert_eq!(state.obstacles[0].hp, state.obstacles[0].max_hp);
        assert!(state.snowballs.is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_obstacle_hits() {
        let (mut state, tuning, mut rng) = setup();
        state.obstacles.push(Obstacle::new(
            "obs_0".into(),
            ObstacleKind::Snowman,
            Vec2::new(200.0, 100.0),
            None,
            None,
            None,
        ));
        state.obstacles.push(Obstacle::new(
            "obs_1".into(),
            ObstacleKind::Tree,
            Vec2::new(200.0, 300.0),
            None,
            None,
            None,
        ));
        state.snowballs.push(snowball("sb_0", Team::Red, 200.0, 100.0, &tuning));
        state.snowballs.push(snowball("sb_1", Team::Red, 200.0, 300.0, &tuning));
        state.snowballs.push(snowball("sb_2", Team::Red, 500.0, 500.0, &tuning));

        let report = detect_collisions(&state, tuning.ground_hit_height);
        let mut events = Vec::new();
        resolve_collisions(&mut state, &report, &mut rng, &tuning, &mut events);

        assert!(state.obstacles[0].hp < state.obstacles[0].max_hp);
        // Trees soak the hit without a scratch
        assert_eq!(state.obstacles[1].hp, state.obstacles[1].max_hp);
        // The miss survives
        assert_eq!(state.snowballs.len(), 1);
        assert_eq!(state.snowballs[0].id, "sb_2");
        assert_eq!(state.particles.len(), (tuning.puff_count_on_obstacle * 2) as usize);
        assert_eq!(state.screen_shake.intensity, 0.0);
    }

    #[test]
    fn test_rubble_lets_snowballs_through() {
        let (mut state, tuning, _) = setup();
        let mut fort = Obstacle::new("obs_0".into(), ObstacleKind::Fort, Vec2::new(200.0, 100.0), None, None, None);
        fort.take_damage(1000.0);
        state.obstacles.push(fort);
        state.snowballs.push(snowball("sb_0", Team::Red, 200.0, 100.0, &tuning));
        assert!(detect_collisions(&state, tuning.ground_hit_height).is_empty());
    }

    #[test]
    fn test_cull_out_of_bounds() {
        let (mut state, tuning, _) = setup();
        state.snowballs.push(snowball("sb_0", Team::Red, -49.0, 100.0, &tuning));
        state.snowballs.push(snowball("sb_1", Team::Red, -51.0, 100.0, &tuning));
        state.snowballs.push(snowball("sb_2", Team::Red, 400.0, state.arena_height + 60.0, &tuning));
        cull_out_of_bounds(&mut state, tuning.cull_margin);
        let ids: Vec<_> = state.snowballs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["sb_0"]);
    }
}
