//! Arrow Survival - A browser arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, projectiles, collisions, game state)
//! - `renderer`: Canvas2D sprite blitting (web only)
//! - `platform`: Input and frame clock abstraction
//! - `persistence`: Key-value storage (LocalStorage on web, in-memory elsewhere)
//! - `tuning`: Data-driven game balance

pub mod best_score;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use best_score::BestScore;
pub use settings::{Difficulty, Settings, SoundSetting};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single simulation step (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Default play area (matches the game canvas)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;

    /// Starting lives
    pub const START_LIVES: u8 = 2;
    /// Invulnerability window after a hit (seconds)
    pub const INVULNERABLE_SECS: f32 = 1.0;
    /// Hit flash duration (seconds)
    pub const HIT_FLASH_SECS: f32 = 0.35;
    /// Knockback impulse magnitude (pixels/s)
    pub const KNOCKBACK_FORCE: f32 = 420.0;
    /// Knockback exponential decay rate (per second)
    pub const KNOCKBACK_DECAY: f32 = 8.0;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const ATTACKER_RADIUS: f32 = 18.0;
    pub const PICKUP_RADIUS: f32 = 12.0;

    /// Pickup respawn delay after collection (seconds)
    pub const PICKUP_RESPAWN_SECS: f32 = 2.0;
    /// Pickups never spawn closer than this to the arena edge
    pub const PICKUP_MARGIN: f32 = 40.0;

    /// Projectiles outside the arena by more than this are culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;
    /// Rendered arrow length as a fraction of velocity
    pub const PROJECTILE_TAIL_SECS: f32 = 0.05;

    /// Countdown cadence (seconds)
    pub const COUNTDOWN_FROM: u8 = 3;
    pub const COUNTDOWN_STEP_SECS: f32 = 0.82;
    pub const COUNTDOWN_GO_SECS: f32 = 0.78;
}
