//! Game state and core simulation types
//!
//! A `GameState` is one session: it is built from an explicit config, owns its
//! RNG and timers, and is thrown away on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anim::SpriteAnim;
use super::geometry::direction_to;
use super::scheduler::{Scheduler, TimerAction, TimerKey};
use crate::consts::*;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game countdown showing `remaining`
    Countdown { remaining: u8 },
    /// Active gameplay
    Running,
    /// Run ended; state is frozen
    GameOver,
}

/// Things the host reacts to (audio, overlays, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CountdownStep(u8),
    SessionStarted,
    ShotFired { from: Vec2 },
    PlayerHit { lives: u8 },
    PickupSpawned { pos: Vec2 },
    PickupCollected { score: u32 },
    GameOver {
        final_score: u32,
        best_score: u32,
        new_best: bool,
    },
}

/// Position, velocity and animation shared by player and attackers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Max speed (pixels/s)
    pub speed: f32,
    /// Half the sprite frame; keeps the sprite on screen
    pub half_extent: f32,
    pub anim: SpriteAnim,
}

impl Body {
    pub fn new(pos: Vec2, speed: f32, half_extent: f32, anim: SpriteAnim) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed,
            half_extent,
            anim,
        }
    }

    /// Move by velocity and advance the walk cycle
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.anim.advance(self.vel, dt);
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub lives: u8,
    /// Seconds of remaining invulnerability
    pub invulnerable: f32,
    /// Decaying velocity bias from the last hit
    pub knockback: Vec2,
    /// Seconds of remaining hit flash
    pub hit_flash: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(
                pos,
                tuning.player_speed,
                tuning.player_half_extent,
                SpriteAnim::new(4, 3, tuning.player_anim_fps),
            ),
            lives: START_LIVES,
            invulnerable: 0.0,
            knockback: Vec2::ZERO,
            hit_flash: 0.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Count down invulnerability and hit flash
    pub fn decay_timers(&mut self, dt: f32) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    /// Hit flash strength, 1 right after a hit fading to 0
    pub fn flash_intensity(&self) -> f32 {
        (self.hit_flash / HIT_FLASH_SECS).clamp(0.0, 1.0)
    }
}

/// An enemy that circles the player and shoots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attacker {
    pub id: u32,
    pub body: Body,
    /// Strafe phase offset (radians)
    pub phase: f32,
    /// Strafe frequency (rad/s)
    pub orbit_freq: f32,
    /// Strafe amplitude (pixels)
    pub orbit_radius: f32,
    /// Seconds accumulated toward the next shot
    pub shoot_cooldown: f32,
}

/// An arrow in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Position one tick ago (swept collision)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before it vanishes
    pub life: f32,
}

impl Projectile {
    /// Straight shot from `from` toward `to`; never re-aims
    pub fn aimed(id: u32, from: Vec2, to: Vec2, speed: f32, life: f32) -> Self {
        // Point-blank shots get zero velocity instead of NaN
        Self {
            id,
            pos: from,
            prev_pos: from,
            vel: direction_to(from, to) * speed,
            life,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.prev_pos = self.pos;
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    /// Timed out or left the arena by more than `margin`
    pub fn is_expired(&self, bounds: Vec2, margin: f32) -> bool {
        self.life <= 0.0
            || self.pos.x < -margin
            || self.pos.x > bounds.x + margin
            || self.pos.y < -margin
            || self.pos.y > bounds.y + margin
    }

    /// Rendered tail end of the arrow
    pub fn tail(&self) -> Vec2 {
        self.pos - self.vel * PROJECTILE_TAIL_SECS
    }
}

/// A diamond waiting to be collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub radius: f32,
}

/// Everything needed to start a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    /// Best score loaded from storage
    pub best_score: u32,
    pub bounds: Vec2,
    pub tuning: Tuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            difficulty: Difficulty::default(),
            best_score: 0,
            bounds: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            tuning: Tuning::default(),
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SessionConfig,
    pub phase: GamePhase,
    pub player: Player,
    /// Fixed for the whole session
    pub attackers: Vec<Attacker>,
    pub projectiles: Vec<Projectile>,
    /// At most one live pickup
    pub pickup: Option<Pickup>,
    pub score: u32,
    pub best_score: u32,
    /// Seconds of Running time (drives attacker strafing)
    pub elapsed: f32,
    /// Virtual clock for timers, runs from session creation
    pub clock: f32,
    pub scheduler: Scheduler,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build a session and start its countdown
    pub fn new(config: SessionConfig) -> Self {
        let bounds = config.bounds;
        let player = Player::new(
            Vec2::new(bounds.x * 0.25, bounds.y * 0.5),
            &config.tuning,
        );
        let mut state = Self {
            phase: GamePhase::Countdown {
                remaining: COUNTDOWN_FROM,
            },
            player,
            attackers: Vec::new(),
            projectiles: Vec::new(),
            pickup: None,
            score: 0,
            best_score: config.best_score,
            elapsed: 0.0,
            clock: 0.0,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            events: Vec::new(),
            next_id: 1,
            config,
        };

        let count = state.config.difficulty.attacker_count();
        super::spawn::spawn_attackers(&mut state, count);

        state.events.push(GameEvent::CountdownStep(COUNTDOWN_FROM));
        state.schedule_countdown_after(COUNTDOWN_FROM);

        log::info!(
            "Session created: seed={} difficulty={} attackers={}",
            state.config.seed,
            state.config.difficulty.as_str(),
            count
        );
        state
    }

    /// Discard this session and start a fresh countdown, keeping the best score
    pub fn restart(&mut self, seed: u64) {
        let config = SessionConfig {
            seed,
            best_score: self.best_score,
            ..self.config.clone()
        };
        *self = GameState::new(config);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn bounds(&self) -> Vec2 {
        self.config.bounds
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue whatever follows countdown number `shown`
    pub(crate) fn schedule_countdown_after(&mut self, shown: u8) {
        if shown > 1 {
            self.scheduler.schedule(
                TimerKey::Countdown,
                self.clock + COUNTDOWN_STEP_SECS,
                TimerAction::CountdownStep(shown - 1),
            );
        } else {
            self.scheduler.schedule(
                TimerKey::Countdown,
                self.clock + COUNTDOWN_GO_SECS,
                TimerAction::CountdownFinished,
            );
        }
    }

    /// Enter GameOver: freeze, settle best score, notify the host
    pub fn finish(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.player.lives = 0;
        self.scheduler.clear();

        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
            best_score: self.best_score,
            new_best,
        });
        log::info!(
            "Game over: score={} best={}{}",
            self.score,
            self.best_score,
            if new_best { " (new best)" } else { "" }
        );
    }
}
