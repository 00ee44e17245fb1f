//! Whole-session behaviour through the public API

use glam::Vec2;
use proptest::prelude::*;

use arrow_survival::consts::*;
use arrow_survival::persistence::{KeyValueStore, MemoryStore};
use arrow_survival::sim::{
    GameEvent, GamePhase, GameState, Pickup, SessionConfig, TickInput, TimerKey, take_hit, tick,
};
use arrow_survival::sim::steering::steer_attackers;
use arrow_survival::{BestScore, Difficulty, Settings, SoundSetting, Tuning, TuningError};

fn run_until_running(state: &mut GameState) {
    for _ in 0..200 {
        if state.is_running() {
            return;
        }
        tick(state, &TickInput::default(), MAX_DT);
    }
    panic!("countdown never finished");
}

/// Play a session the way the host does: tick, drain events, persist on game over
fn settle_game_over(
    state: &mut GameState,
    best: &mut BestScore,
    store: &mut MemoryStore,
) -> Vec<GameEvent> {
    let events = state.drain_events();
    for &event in &events {
        if let GameEvent::GameOver {
            final_score,
            new_best,
            ..
        } = event
        {
            if new_best && best.record(final_score) {
                best.save(store).unwrap();
            }
        }
    }
    events
}

fn collect(state: &mut GameState, n: u32) {
    for _ in 0..n {
        state.pickup = Some(Pickup {
            pos: state.player.pos(),
            radius: PICKUP_RADIUS,
        });
        tick(state, &TickInput::default(), 0.016);
    }
    state.scheduler.cancel(TimerKey::PickupRespawn);
}

#[test]
fn test_new_best_is_persisted() {
    let mut store = MemoryStore::new();
    store.set(BestScore::STORAGE_KEY, "2").unwrap();
    let mut best = BestScore::load(&store);

    let mut state = GameState::new(SessionConfig {
        best_score: best.value,
        ..Default::default()
    });
    run_until_running(&mut state);
    state.attackers.clear();
    collect(&mut state, 4);
    assert_eq!(state.score, 4);

    take_hit(&mut state, None);
    state.player.invulnerable = 0.0;
    take_hit(&mut state, None);
    assert!(state.is_over());

    settle_game_over(&mut state, &mut best, &mut store);
    assert_eq!(BestScore::load(&store).value, 4);
}

#[test]
fn test_worse_score_leaves_best_alone() {
    let mut store = MemoryStore::new();
    store.set(BestScore::STORAGE_KEY, "9").unwrap();
    let mut best = BestScore::load(&store);

    let mut state = GameState::new(SessionConfig {
        best_score: best.value,
        ..Default::default()
    });
    run_until_running(&mut state);
    state.attackers.clear();
    collect(&mut state, 1);
    state.finish();

    let events = settle_game_over(&mut state, &mut best, &mut store);
    assert!(events.contains(&GameEvent::GameOver {
        final_score: 1,
        best_score: 9,
        new_best: false,
    }));
    assert_eq!(store.get(BestScore::STORAGE_KEY).unwrap().as_deref(), Some("9"));
}

#[test]
fn test_settings_pick_attacker_count() {
    let mut store = MemoryStore::new();
    Settings {
        difficulty: Difficulty::Hard,
        ..Default::default()
    }
    .save(&mut store)
    .unwrap();

    let settings = Settings::load(&store);
    let state = GameState::new(SessionConfig {
        difficulty: settings.difficulty,
        ..Default::default()
    });
    assert_eq!(state.attackers.len(), 3);
}

#[test]
fn test_restart_keeps_best_and_recounts() {
    let mut state = GameState::new(SessionConfig::default());
    run_until_running(&mut state);
    state.attackers.clear();
    collect(&mut state, 2);
    state.finish();
    assert_eq!(state.best_score, 2);

    state.restart(99);
    assert_eq!(state.phase, GamePhase::Countdown { remaining: 3 });
    assert_eq!(state.score, 0);
    assert_eq!(state.best_score, 2);
    assert_eq!(state.player.lives, START_LIVES);
    assert!(state.projectiles.is_empty());
    assert_eq!(state.drain_events(), vec![GameEvent::CountdownStep(3)]);
}

#[test]
fn test_stacked_attackers_spread_out() {
    let mut state = GameState::new(SessionConfig {
        difficulty: Difficulty::Hard,
        ..Default::default()
    });
    state.phase = GamePhase::Running;
    state.player.body.pos = Vec2::new(100.0, 270.0);
    let offsets = [Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(1.0, 2.0)];
    for (a, off) in state.attackers.iter_mut().zip(offsets) {
        a.body.pos = Vec2::new(800.0, 270.0) + off;
    }

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        steer_attackers(&mut state);
        for a in &mut state.attackers {
            a.body.integrate(dt);
        }
        state.elapsed += dt;
    }

    let p: Vec<Vec2> = state.attackers.iter().map(|a| a.body.pos).collect();
    let min = p[0]
        .distance(p[1])
        .min(p[1].distance(p[2]))
        .min(p[0].distance(p[2]));
    assert!(min > 30.0, "attackers still bunched: {min}");
}

#[test]
fn test_same_seed_same_session() {
    let play = || {
        let mut state = GameState::new(SessionConfig {
            seed: 1234,
            difficulty: Difficulty::Medium,
            ..Default::default()
        });
        let input = TickInput {
            axis: Vec2::new(0.0, 1.0),
        };
        for _ in 0..600 {
            tick(&mut state, &input, 1.0 / 60.0);
        }
        (state.player.pos(), state.score, state.player.lives, state.projectiles.len())
    };
    assert_eq!(play(), play());
}

#[test]
fn test_restart_picks_up_changed_difficulty() {
    let mut store = MemoryStore::new();
    let mut state = GameState::new(SessionConfig {
        difficulty: Settings::load(&store).difficulty,
        ..Default::default()
    });
    assert_eq!(state.attackers.len(), 1);
    run_until_running(&mut state);
    state.attackers.clear();
    collect(&mut state, 1);
    state.finish();

    Settings {
        difficulty: Difficulty::Medium,
        sound: SoundSetting::Off,
    }
    .save(&mut store)
    .unwrap();

    // Same rebuild the browser host does on restart
    let settings = Settings::load(&store);
    state = GameState::new(SessionConfig {
        seed: 5,
        difficulty: settings.difficulty,
        best_score: state.best_score,
        ..state.config.clone()
    });
    assert_eq!(state.attackers.len(), 2);
    assert_eq!(state.best_score, 1);
    assert!(!settings.sound.enabled());
}

#[test]
fn test_tuning_override_drives_spawn() {
    let tuning =
        Tuning::from_json(r#"{ "attacker_speed_min": 110.0, "attacker_speed_max": 110.0 }"#)
            .unwrap();
    let state = GameState::new(SessionConfig {
        difficulty: Difficulty::Hard,
        tuning,
        ..Default::default()
    });
    assert!(state.attackers.iter().all(|a| a.body.speed == 110.0));
}

#[test]
fn test_unusable_tuning_never_reaches_a_session() {
    assert!(matches!(
        Tuning::from_json(r#"{ "attacker_speed_min": 200.0 }"#),
        Err(TuningError::Invalid { .. })
    ));
    assert!(Tuning::from_json(r#"{ "shot_jitter": -0.5 }"#).is_err());
}

proptest! {
    #[test]
    fn prop_lives_never_increase(steps in prop::collection::vec((any::<bool>(), 0.0f32..0.5), 1..60)) {
        let mut state = GameState::new(SessionConfig::default());
        state.phase = GamePhase::Running;
        let mut lives = state.player.lives;

        for (hit, dt) in steps {
            if hit {
                let shielded = state.player.is_invulnerable() || state.is_over();
                let source = state.player.pos() + Vec2::X;
                let applied = take_hit(&mut state, Some(source));
                prop_assert_eq!(applied, !shielded);
                if shielded {
                    prop_assert_eq!(state.player.lives, lives);
                }
            }
            state.player.decay_timers(dt);
            prop_assert!(state.player.lives <= lives);
            lives = state.player.lives;
        }
        prop_assert_eq!(state.is_over(), state.player.lives == 0);
    }
}
