//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Timers run on the session's virtual clock, never wall time
//! - Seeded RNG only
//! - No rendering, audio or DOM dependencies

pub mod anim;
pub mod collision;
pub mod geometry;
pub mod scheduler;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod steering;
pub mod tick;

pub use anim::{Facing, SpriteAnim};
pub use collision::{body_contact_hit, take_hit};
pub use scheduler::{Scheduler, TimerAction, TimerKey};
pub use snapshot::RenderSnapshot;
pub use state::{
    Attacker, Body, GameEvent, GamePhase, GameState, Pickup, Player, Projectile, SessionConfig,
};
pub use tick::{TickInput, tick};
