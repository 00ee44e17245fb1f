//! Per-tick velocity for the player and attackers
//!
//! Attackers chase a point that swings side to side around the player, and
//! push away from each other so they surround instead of stacking.

use glam::Vec2;

use super::geometry::{EPSILON, direction_to, distance, perpendicular, safe_normalize};
use super::state::{Attacker, GameState};
use crate::consts::KNOCKBACK_DECAY;
use crate::tuning::Tuning;

/// Player velocity from the held-key axis. `None` when no direction is held.
pub fn player_velocity(axis: Vec2, speed: f32) -> Option<Vec2> {
    let dir = safe_normalize(axis);
    if dir == Vec2::ZERO {
        None
    } else {
        Some(dir * speed)
    }
}

/// Sum of repulsions from every neighbour within `radius`, each scaled by
/// `(radius - d) / radius`
pub fn separation(pos: Vec2, neighbours: impl IntoIterator<Item = Vec2>, radius: f32) -> Vec2 {
    let mut push = Vec2::ZERO;
    for other in neighbours {
        let away = pos - other;
        let d = distance(pos, other).max(EPSILON);
        if d < radius {
            push += (away / d) * ((radius - d) / radius);
        }
    }
    push
}

/// Desired velocity for one attacker
pub fn attacker_velocity(
    attacker: &Attacker,
    neighbours: impl IntoIterator<Item = Vec2>,
    player_pos: Vec2,
    elapsed: f32,
    tuning: &Tuning,
) -> Vec2 {
    let pos = attacker.body.pos;

    // Strafe target swings along the axis perpendicular to the line of sight
    let to_player = direction_to(pos, player_pos);
    let strafe_axis = perpendicular(to_player);
    let strafe = (elapsed * attacker.orbit_freq + attacker.phase).sin();
    let target = player_pos + strafe_axis * (strafe * attacker.orbit_radius);

    let chase = direction_to(pos, target);
    let push = separation(pos, neighbours, tuning.separation_radius);

    safe_normalize(chase + push * tuning.separation_weight) * attacker.body.speed
}

/// Set the player's velocity from input plus decaying knockback
pub fn update_player(state: &mut GameState, axis: Vec2, dt: f32) {
    let player = &mut state.player;
    match player_velocity(axis, player.body.speed) {
        Some(vel) => {
            player.body.vel = vel;
            player.body.anim.face_by_velocity(vel);
        }
        None => player.body.vel = Vec2::ZERO,
    }

    player.body.vel += player.knockback;
    player.knockback *= (-KNOCKBACK_DECAY * dt).exp();
}

/// Recompute every attacker's velocity against a snapshot of current positions
pub fn steer_attackers(state: &mut GameState) {
    let positions: Vec<Vec2> = state.attackers.iter().map(|a| a.body.pos).collect();
    let player_pos = state.player.pos();
    let elapsed = state.elapsed;
    let tuning = &state.config.tuning;

    for (i, attacker) in state.attackers.iter_mut().enumerate() {
        let neighbours = positions
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| *p);
        attacker.body.vel = attacker_velocity(attacker, neighbours, player_pos, elapsed, tuning);
    }
}
