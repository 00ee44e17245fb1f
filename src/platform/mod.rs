//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held directional keys)
//! - Time/ticks (frame timestamps to clamped deltas)
//!
//! Storage lives in `persistence`.

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::InputState;
