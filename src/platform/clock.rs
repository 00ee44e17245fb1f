//! Frame clock
//!
//! Converts animation-frame timestamps into simulation deltas.

use crate::consts::MAX_DT;

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta in seconds since the previous frame, clamped to `[0, MAX_DT]`.
    /// The first frame yields 0.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 }
    }

    /// Forget the previous timestamp (after a restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
