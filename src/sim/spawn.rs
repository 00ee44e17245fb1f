//! Spawning: attackers at session start, arrows on cooldown, pickups on a timer

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::anim::SpriteAnim;
use super::scheduler::{TimerAction, TimerKey};
use super::state::{Attacker, Body, GameEvent, GameState, Pickup, Projectile};
use crate::consts::*;

/// Place `count` attackers evenly around a ring on the right side of the arena.
/// Each one gets its own speed, strafe pattern and shot jitter.
pub fn spawn_attackers(state: &mut GameState, count: usize) {
    let bounds = state.bounds();
    let center = Vec2::new(bounds.x * 0.75, bounds.y * 0.5);
    let t = state.config.tuning.clone();

    for i in 0..count {
        let angle = (i as f32 / count.max(1) as f32) * TAU;
        let pos = center + Vec2::new(angle.cos(), angle.sin()) * t.spawn_ring_radius;

        let speed = state
            .rng
            .random_range(t.attacker_speed_min..=t.attacker_speed_max);
        let phase = state.rng.random_range(0.0..TAU);
        let orbit_freq = state.rng.random_range(t.orbit_freq_min..=t.orbit_freq_max);
        let orbit_radius = state
            .rng
            .random_range(t.orbit_radius_min..=t.orbit_radius_max);
        let shoot_cooldown = state.rng.random_range(0.0..=t.shot_jitter);

        let id = state.next_entity_id();
        state.attackers.push(Attacker {
            id,
            body: Body::new(pos, speed, t.attacker_half_extent, SpriteAnim::still()),
            phase,
            orbit_freq,
            orbit_radius,
            shoot_cooldown,
        });
    }
}

/// Tick every attacker's shot timer; fire at the player's current position
pub fn update_shooting(state: &mut GameState, dt: f32) {
    let target = state.player.pos();
    let interval = state.config.tuning.shot_interval;

    let mut shooters = Vec::new();
    for attacker in &mut state.attackers {
        attacker.shoot_cooldown += dt;
        if attacker.shoot_cooldown >= interval {
            attacker.shoot_cooldown = 0.0;
            shooters.push(attacker.body.pos);
        }
    }

    for from in shooters {
        fire_projectile(state, from, target);
    }
}

/// Launch one arrow from `from` toward `to`
pub fn fire_projectile(state: &mut GameState, from: Vec2, to: Vec2) {
    let id = state.next_entity_id();
    let speed = state.config.tuning.projectile_speed;
    let life = state.config.tuning.projectile_life;
    state
        .projectiles
        .push(Projectile::aimed(id, from, to, speed, life));
    state.push_event(GameEvent::ShotFired { from });
}

/// Advance arrows and drop the ones that timed out or flew off screen
pub fn update_projectiles(state: &mut GameState, dt: f32) {
    let bounds = state.bounds();
    for projectile in &mut state.projectiles {
        projectile.advance(dt);
    }
    state
        .projectiles
        .retain(|p| !p.is_expired(bounds, PROJECTILE_CULL_MARGIN));
}

/// Put a pickup at a random spot inside the margin-inset arena
pub fn spawn_pickup(state: &mut GameState) {
    let bounds = state.bounds();
    let margin = PICKUP_MARGIN.min(bounds.x / 2.0).min(bounds.y / 2.0);
    let x = state.rng.random_range(margin..=bounds.x - margin);
    let y = state.rng.random_range(margin..=bounds.y - margin);
    let pos = Vec2::new(x, y);

    state.pickup = Some(Pickup {
        pos,
        radius: PICKUP_RADIUS,
    });
    state.push_event(GameEvent::PickupSpawned { pos });
}

/// Spawn a pickup after `delay` seconds, replacing any pending respawn
pub fn schedule_pickup(state: &mut GameState, delay: f32) {
    let fire_at = state.clock + delay;
    state
        .scheduler
        .schedule(TimerKey::PickupRespawn, fire_at, TimerAction::SpawnPickup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{GamePhase, SessionConfig};

    fn state_with(difficulty: Difficulty) -> GameState {
        GameState::new(SessionConfig {
            difficulty,
            seed: 42,
            ..Default::default()
        })
    }

    #[test]
    fn test_attacker_count_matches_difficulty() {
        assert_eq!(state_with(Difficulty::Easy).attackers.len(), 1);
        assert_eq!(state_with(Difficulty::Medium).attackers.len(), 2);
        assert_eq!(state_with(Difficulty::Hard).attackers.len(), 3);
    }

    #[test]
    fn test_attackers_spread_around_ring() {
        let state = state_with(Difficulty::Hard);
        let center = Vec2::new(ARENA_WIDTH * 0.75, ARENA_HEIGHT * 0.5);
        let ring = state.config.tuning.spawn_ring_radius;
        for a in &state.attackers {
            assert!((a.body.pos.distance(center) - ring).abs() < 1e-2);
        }
        // 120 degrees apart -> chord = r * sqrt(3)
        let d = state.attackers[0].body.pos.distance(state.attackers[1].body.pos);
        assert!((d - ring * 3f32.sqrt()).abs() < 1e-2);
    }

    #[test]
    fn test_attacker_parameters_in_range() {
        let state = state_with(Difficulty::Hard);
        let t = &state.config.tuning;
        for a in &state.attackers {
            assert!(a.body.speed >= t.attacker_speed_min && a.body.speed <= t.attacker_speed_max);
            assert!(a.orbit_freq >= t.orbit_freq_min && a.orbit_freq <= t.orbit_freq_max);
            assert!(a.orbit_radius >= t.orbit_radius_min && a.orbit_radius <= t.orbit_radius_max);
            assert!(a.shoot_cooldown >= 0.0 && a.shoot_cooldown <= t.shot_jitter);
        }
    }

    #[test]
    fn test_same_seed_same_attackers() {
        let a = state_with(Difficulty::Hard);
        let b = state_with(Difficulty::Hard);
        for (x, y) in a.attackers.iter().zip(&b.attackers) {
            assert_eq!(x.phase, y.phase);
            assert_eq!(x.body.speed, y.body.speed);
        }
    }

    #[test]
    fn test_shooting_fires_on_interval_and_resets() {
        let mut state = state_with(Difficulty::Easy);
        state.phase = GamePhase::Running;
        state.drain_events();
        let interval = state.config.tuning.shot_interval;
        state.attackers[0].shoot_cooldown = interval - 0.01;

        update_shooting(&mut state, 0.02);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.attackers[0].shoot_cooldown, 0.0);

        let p = &state.projectiles[0];
        let expected = (state.player.pos() - state.attackers[0].body.pos).normalize();
        assert!((p.vel.normalize() - expected).length() < 1e-4);
        assert!((p.vel.length() - state.config.tuning.projectile_speed).abs() < 1e-2);

        update_shooting(&mut state, 0.02);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_projectiles_culled_off_screen() {
        let mut state = state_with(Difficulty::Easy);
        let from = Vec2::new(10.0, 10.0);
        fire_projectile(&mut state, from, Vec2::new(-100.0, 10.0));
        update_projectiles(&mut state, 0.033);
        assert_eq!(state.projectiles.len(), 1);
        // 260 px/s needs well under a second to clear the 50 px margin
        for _ in 0..10 {
            update_projectiles(&mut state, 0.033);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_pickup_inside_margin() {
        let mut state = state_with(Difficulty::Easy);
        for _ in 0..50 {
            spawn_pickup(&mut state);
            let p = state.pickup.unwrap();
            assert!(p.pos.x >= PICKUP_MARGIN && p.pos.x <= ARENA_WIDTH - PICKUP_MARGIN);
            assert!(p.pos.y >= PICKUP_MARGIN && p.pos.y <= ARENA_HEIGHT - PICKUP_MARGIN);
        }
    }
}
