//! Simulation tick
//!
//! One call per animation frame. Timers fire first, then (while running)
//! steering, integration, shooting, arrows and collisions, in that order.

use glam::Vec2;

use super::collision::{resolve_body_contact, resolve_pickup, resolve_projectile_hits};
use super::geometry::clamp_to_bounds;
use super::scheduler::TimerAction;
use super::spawn::{schedule_pickup, spawn_pickup, update_projectiles, update_shooting};
use super::state::{GameEvent, GamePhase, GameState};
use super::steering::{steer_attackers, update_player};
use crate::consts::MAX_DT;
use crate::platform::InputState;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Raw directional axis from held keys (+y is down)
    pub axis: Vec2,
}

impl From<&InputState> for TickInput {
    fn from(input: &InputState) -> Self {
        Self { axis: input.axis() }
    }
}

/// Advance the session by `dt` seconds (clamped to `MAX_DT`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };

    // A session that starts during this tick begins moving on the next one
    let was_running = state.is_running();
    state.clock += dt;
    for action in state.scheduler.pop_due(state.clock) {
        apply_timer(state, action);
    }

    if !was_running || !state.is_running() {
        return;
    }
    state.elapsed += dt;
    state.player.decay_timers(dt);

    update_player(state, input.axis, dt);
    steer_attackers(state);
    integrate_bodies(state, dt);

    // A broken position can't be recovered mid-tick; end the run instead
    if !state.player.pos().is_finite() || state.attackers.iter().any(|a| !a.body.pos.is_finite())
    {
        log::error!("Non-finite entity position, ending session");
        state.finish();
        return;
    }

    update_shooting(state, dt);
    update_projectiles(state, dt);

    resolve_projectile_hits(state);
    if state.is_over() {
        return;
    }
    resolve_body_contact(state);
    if state.is_over() {
        return;
    }
    resolve_pickup(state);
}

/// Handle a fired timer. Timers never outlive the session that set them.
fn apply_timer(state: &mut GameState, action: TimerAction) {
    if state.is_over() {
        log::debug!("Ignoring {:?} after game over", action);
        return;
    }

    match action {
        TimerAction::CountdownStep(n) => {
            if let GamePhase::Countdown { .. } = state.phase {
                state.phase = GamePhase::Countdown { remaining: n };
                state.push_event(GameEvent::CountdownStep(n));
                state.schedule_countdown_after(n);
            }
        }
        TimerAction::CountdownFinished => {
            if let GamePhase::Countdown { .. } = state.phase {
                state.phase = GamePhase::Running;
                state.push_event(GameEvent::SessionStarted);
                schedule_pickup(state, 0.0);
                log::info!("Session started");
            }
        }
        TimerAction::SpawnPickup => {
            if state.is_running() && state.pickup.is_none() {
                spawn_pickup(state);
            }
        }
    }
}

/// Move player and attackers, then keep their sprites on screen
fn integrate_bodies(state: &mut GameState, dt: f32) {
    let bounds = state.bounds();

    let player = &mut state.player.body;
    player.integrate(dt);
    player.pos = clamp_to_bounds(player.pos, bounds, player.half_extent);

    for attacker in &mut state.attackers {
        let body = &mut attacker.body;
        body.integrate(dt);
        body.pos = clamp_to_bounds(body.pos, bounds, body.half_extent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::scheduler::TimerKey;
    use crate::sim::state::{Pickup, Projectile, SessionConfig};

    /// Tick with no input until the countdown ends
    fn start(state: &mut GameState) {
        for _ in 0..200 {
            if state.is_running() {
                return;
            }
            tick(state, &TickInput::default(), MAX_DT);
        }
        panic!("countdown never finished");
    }

    #[test]
    fn test_countdown_sequence() {
        let mut state = GameState::new(SessionConfig::default());
        let mut events = state.drain_events();
        let mut ticks = 0;
        while !state.is_running() {
            tick(&mut state, &TickInput::default(), 0.01);
            events.extend(state.drain_events());
            ticks += 1;
        }
        assert_eq!(
            events,
            vec![
                GameEvent::CountdownStep(3),
                GameEvent::CountdownStep(2),
                GameEvent::CountdownStep(1),
                GameEvent::SessionStarted,
            ]
        );
        // 0.82 + 0.82 + 0.78 seconds, give or take a tick per step
        assert!((240..=246).contains(&ticks), "took {ticks} ticks");
        // Nothing moved during the countdown
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn test_start_tick_does_not_move_anything() {
        let mut state = GameState::new(SessionConfig::default());
        let input = TickInput {
            axis: Vec2::new(1.0, 0.0),
        };
        while !state.is_running() {
            tick(&mut state, &input, 0.01);
        }
        let player = state.player.pos();
        let attackers: Vec<Vec2> = state.attackers.iter().map(|a| a.body.pos).collect();
        assert_eq!(player, Vec2::new(ARENA_WIDTH * 0.25, ARENA_HEIGHT * 0.5));
        assert_eq!(
            attackers,
            GameState::new(SessionConfig::default())
                .attackers
                .iter()
                .map(|a| a.body.pos)
                .collect::<Vec<_>>()
        );
        assert!(state.projectiles.is_empty());

        tick(&mut state, &input, 0.01);
        assert!(state.player.pos().x > player.x);
        assert!((state.elapsed - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_first_pickup_appears_after_start() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        assert!(state.pickup.is_none());
        tick(&mut state, &TickInput::default(), 0.016);
        // It may have landed on the player and been collected right away
        assert!(state.pickup.is_some() || state.score == 1);
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        let before = state.player.pos();
        let input = TickInput {
            axis: Vec2::new(0.0, -1.0),
        };
        tick(&mut state, &input, 0.02);
        let moved = state.player.pos() - before;
        assert!((moved.y + state.config.tuning.player_speed * 0.02).abs() < 1e-3);
        assert_eq!(moved.x, 0.0);
        assert_eq!(state.player.body.anim.facing, crate::sim::anim::Facing::Up);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        let elapsed = state.elapsed;
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.elapsed - elapsed - MAX_DT).abs() < 1e-6);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        let input = TickInput {
            axis: Vec2::new(-1.0, 0.0),
        };
        for _ in 0..200 {
            tick(&mut state, &input, MAX_DT);
            if state.is_over() {
                break;
            }
        }
        assert!(state.player.pos().x >= state.player.body.half_extent);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        state.finish();
        let pos = state.player.pos();
        let clock = state.clock;
        tick(
            &mut state,
            &TickInput {
                axis: Vec2::X,
            },
            0.02,
        );
        assert_eq!(state.player.pos(), pos);
        assert_eq!(state.clock, clock);
    }

    #[test]
    fn test_pickup_timer_after_game_over_is_ignored() {
        let mut state = GameState::new(SessionConfig::default());
        start(&mut state);
        state.finish();
        apply_timer(&mut state, TimerAction::SpawnPickup);
        assert!(state.pickup.is_none());
    }

    #[test]
    fn test_two_hits_end_game_and_record_score() {
        let mut state = GameState::new(SessionConfig {
            best_score: 1,
            ..Default::default()
        });
        start(&mut state);
        // Keep attackers from interfering
        state.attackers.clear();

        // Collect three diamonds
        for _ in 0..3 {
            state.pickup = Some(Pickup {
                pos: state.player.pos(),
                radius: PICKUP_RADIUS,
            });
            tick(&mut state, &TickInput::default(), 0.016);
        }
        assert_eq!(state.score, 3);
        state.scheduler.cancel(TimerKey::PickupRespawn);

        // Two arrows, separated by more than the invulnerability window
        for _ in 0..2 {
            let target = state.player.pos();
            let id = state.next_entity_id();
            state.projectiles.push(Projectile::aimed(
                id,
                target - Vec2::new(30.0, 0.0),
                target,
                3000.0,
                5.0,
            ));
            tick(&mut state, &TickInput::default(), 0.016);
            for _ in 0..40 {
                tick(&mut state, &TickInput::default(), MAX_DT);
            }
        }

        assert!(state.is_over());
        assert_eq!(state.best_score, 3);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            final_score: 3,
            best_score: 3,
            new_best: true,
        }));
    }
}
