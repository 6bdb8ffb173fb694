//! Unit movement and physical resolution
//!
//! Runs in three passes so the result does not depend on which unit moved
//! first: translate and push out of obstacles, separate overlapping units,
//! then clamp everyone into the arena.

use glam::Vec2;

use super::entities::{Obstacle, Unit};
use super::geom::circle_rect;
use crate::angle_of;

/// Advance every live unit toward its move target and resolve overlaps
pub fn update_movement(
    units: &mut [Unit],
    obstacles: &[Obstacle],
    arena_w: f32,
    arena_h: f32,
    dt: f32,
    arrive_epsilon: f32,
) {
    for unit in units.iter_mut().filter(|u| u.is_alive()) {
        step_toward_target(unit, dt, arrive_epsilon);

        for obs in obstacles.iter().filter(|o| o.is_blocking()) {
            if circle_rect(unit.pos, unit.radius, obs.pos, obs.width, obs.height) {
                push_out_of_rect(unit, obs);
            }
        }
    }

    separate_units(units);

    for unit in units.iter_mut().filter(|u| u.is_alive()) {
        let r = unit.radius;
        unit.pos.x = unit.pos.x.clamp(r, (arena_w - r).max(r));
        unit.pos.y = unit.pos.y.clamp(r, (arena_h - r).max(r));
    }
}

fn step_toward_target(unit: &mut Unit, dt: f32, arrive_epsilon: f32) {
    // Planted while winding up a throw
    if unit.charging {
        unit.vel = Vec2::ZERO;
        return;
    }

    let Some(target) = unit.target else {
        unit.vel = Vec2::ZERO;
        return;
    };

    let to_target = target - unit.pos;
    let dist = to_target.length();
    let dir = match to_target.try_normalize() {
        Some(dir) if dist >= arrive_epsilon => dir,
        _ => {
            unit.target = None;
            unit.vel = Vec2::ZERO;
            return;
        }
    };

    let step = (unit.speed * dt).min(dist);
    unit.vel = dir * unit.speed;
    unit.pos += dir * step;
    unit.facing = angle_of(dir);
}

/// Minimum-translation push along the shallower axis of the obstacle box
/// inflated by the unit radius
fn push_out_of_rect(unit: &mut Unit, obs: &Obstacle) {
    let half_w = obs.width / 2.0 + unit.radius;
    let half_h = obs.height / 2.0 + unit.radius;
    let d = unit.pos - obs.pos;

    let overlap_x = half_w - d.x.abs();
    let overlap_y = half_h - d.y.abs();

    if overlap_x < overlap_y {
        unit.pos.x = obs.pos.x + if d.x > 0.0 { half_w } else { -half_w };
    } else {
        unit.pos.y = obs.pos.y + if d.y > 0.0 { half_h } else { -half_h };
    }
}

/// Push each overlapping pair of live units apart by half the overlap each.
/// Coincident pairs have no push direction and are left alone.
fn separate_units(units: &mut [Unit]) {
    for i in 0..units.len() {
        let (head, tail) = units.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_alive() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_alive()) {
            let delta = a.pos - b.pos;
            let dist = delta.length();
            let min_dist = a.radius + b.radius;
            if dist < min_dist && dist > 0.0 {
                let push = delta / dist * ((min_dist - dist) / 2.0);
                a.pos += push;
                b.pos -= push;
            }
        }
    }
}

/// Issue a move order, clamped to `max_range` from the unit's position.
/// Knocked-out units ignore orders.
pub fn move_unit_to(unit: &mut Unit, destination: Vec2, max_range: f32) {
    if unit.knocked_out {
        return;
    }
    let to_dest = destination - unit.pos;
    let dist = to_dest.length();
    unit.target = Some(if dist > max_range {
        unit.pos + to_dest / dist * max_range
    } else {
        destination
    });
}
