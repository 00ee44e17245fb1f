//! Collision detection and damage resolution
//!
//! Arrows are tested as swept segments (previous -> current position) so a
//! fast arrow can't skip over the player between ticks. Attacker bodies and
//! pickups use plain circle overlap.

use glam::Vec2;

use super::geometry::{circles_overlap, direction_to, segment_circle_hit};
use super::spawn::schedule_pickup;
use super::state::{GameEvent, GameState, Pickup, Player, Projectile};
use crate::consts::*;

/// Did this arrow pass through the player during the last tick?
pub fn projectile_hits_player(projectile: &Projectile, player_pos: Vec2) -> bool {
    segment_circle_hit(
        player_pos,
        PLAYER_RADIUS,
        projectile.prev_pos,
        projectile.pos,
    )
}

/// Is an attacker body touching the player?
pub fn body_contact(attacker_pos: Vec2, player_pos: Vec2) -> bool {
    circles_overlap(attacker_pos, ATTACKER_RADIUS, player_pos, PLAYER_RADIUS)
}

/// Is the player touching the pickup?
pub fn pickup_contact(pickup: &Pickup, player_pos: Vec2) -> bool {
    circles_overlap(pickup.pos, pickup.radius, player_pos, PLAYER_RADIUS)
}

/// Push the player away from `source`
fn apply_knockback(player: &mut Player, source: Vec2) {
    player.knockback += direction_to(source, player.pos()) * KNOCKBACK_FORCE;
}

/// Damage resolution. Ignored while invulnerable or after game over.
///
/// Returns true if a life was lost.
pub fn take_hit(state: &mut GameState, source: Option<Vec2>) -> bool {
    if state.player.is_invulnerable() || state.is_over() {
        return false;
    }

    let player = &mut state.player;
    player.hit_flash = HIT_FLASH_SECS;
    if let Some(source) = source {
        apply_knockback(player, source);
    }
    player.lives = player.lives.saturating_sub(1);
    player.invulnerable = INVULNERABLE_SECS;

    let lives = player.lives;
    state.push_event(GameEvent::PlayerHit { lives });
    log::debug!("Player hit, {} lives left", lives);

    if lives == 0 {
        state.finish();
    }
    true
}

/// Touching an attacker ends the run outright, invulnerable or not.
/// Hit feedback still plays when the player could take damage.
pub fn body_contact_hit(state: &mut GameState, source: Vec2) {
    take_hit(state, Some(source));
    if !state.is_over() {
        state.finish();
    }
}

/// Remove every arrow that swept through the player and resolve damage.
/// Arrows that hit during invulnerability are still consumed.
pub fn resolve_projectile_hits(state: &mut GameState) {
    let player_pos = state.player.pos();
    let mut sources = Vec::new();
    state.projectiles.retain(|p| {
        if projectile_hits_player(p, player_pos) {
            sources.push(p.pos);
            false
        } else {
            true
        }
    });

    for source in sources {
        take_hit(state, Some(source));
    }
}

/// End the run if any attacker is touching the player
pub fn resolve_body_contact(state: &mut GameState) {
    let player_pos = state.player.pos();
    let hit = state
        .attackers
        .iter()
        .map(|a| a.body.pos)
        .find(|&pos| body_contact(pos, player_pos));

    if let Some(source) = hit {
        body_contact_hit(state, source);
    }
}

/// Collect the pickup if the player is on it. Returns true when collected.
pub fn resolve_pickup(state: &mut GameState) -> bool {
    let collected = state
        .pickup
        .as_ref()
        .is_some_and(|p| pickup_contact(p, state.player.pos()));
    if !collected {
        return false;
    }

    state.pickup = None;
    state.score += 1;
    state.push_event(GameEvent::PickupCollected { score: state.score });
    schedule_pickup(state, PICKUP_RESPAWN_SECS);
    true
}
