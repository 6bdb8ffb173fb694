//! Throwing, charging and projectile flight

use glam::Vec2;

use super::entities::{Snowball, Unit};
use super::state::GameState;
use crate::tuning::Tuning;
use crate::{angle_of, from_angle};

/// Begin winding up a throw. Rejected while on cooldown or knocked out.
/// Starting a charge cancels any move order.
pub fn start_charge(unit: &mut Unit) -> bool {
    if !unit.can_throw() {
        return false;
    }
    unit.charging = true;
    unit.charge = 0.0;
    unit.target = None;
    true
}

/// Accumulate charge over `charge_time` seconds, saturating at 1
pub fn update_charge(unit: &mut Unit, dt: f32, charge_time: f32) {
    if !unit.charging {
        return;
    }
    unit.charge = (unit.charge + dt / charge_time).clamp(0.0, 1.0);
}

/// Throw a snowball from `state.units[unit_idx]` toward `aim`.
///
/// Returns the effective charge (never below `min_throw_charge`) or `None`
/// if the unit was not charging. A zero-length aim throws along the unit's
/// facing.
pub fn release_throw(
    state: &mut GameState,
    unit_idx: usize,
    aim: Vec2,
    tuning: &Tuning,
) -> Option<f32> {
    let unit = state.units.get(unit_idx)?;
    if !unit.charging || unit.knocked_out {
        return None;
    }

    let charge = unit.charge.max(tuning.min_throw_charge);
    let dir = match (aim - unit.pos).try_normalize() {
        Some(dir) => dir,
        None => from_angle(unit.facing, 1.0),
    };
    let origin = unit.pos + dir * (unit.radius + tuning.throw_spawn_margin);
    let team = unit.team;

    let id = state.next_entity_id("sb");
    state
        .snowballs
        .push(Snowball::new(id, team, origin, dir, charge, tuning));

    let unit = &mut state.units[unit_idx];
    unit.facing = angle_of(dir);
    unit.charging = false;
    unit.charge = 0.0;
    unit.cooldown = unit.cooldown_max;
    Some(charge)
}

/// Fly every snowball one step and drop expired ones.
///
/// Returns the positions where a trail puff should appear this step.
pub fn advance_snowballs(snowballs: &mut Vec<Snowball>, dt: f32, tuning: &Tuning) -> Vec<Vec2> {
    let mut trail = Vec::new();

    for sb in snowballs.iter_mut() {
        sb.pos += sb.vel * dt;
        sb.shadow = sb.pos;

        // Parabolic arc (visual only)
        sb.height_vel -= tuning.snowball_arc_height * 4.0 * dt;
        sb.height = (sb.height + sb.height_vel * dt).max(0.0);

        sb.lifetime -= dt;

        sb.trail_timer -= dt;
        if sb.trail_timer <= 0.0 {
            sb.trail_timer = tuning.trail_interval;
            if sb.height > 0.0 && sb.lifetime > 0.0 {
                trail.push(sb.pos);
            }
        }
    }

    snowballs.retain(|sb| sb.lifetime > 0.0);
    trail
}

/// Per-step timers: cooldown and hit flash count down to zero, knocked-out
/// units count time spent down
pub fn update_timers(units: &mut [Unit], dt: f32) {
    for unit in units.iter_mut() {
        unit.cooldown = (unit.cooldown - dt).max(0.0);
        unit.hit_flash = (unit.hit_flash - dt).max(0.0);
        if unit.knocked_out {
            unit.knockout_timer += dt;
        }
    }
}
