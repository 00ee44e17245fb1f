//! Sprite sheet animation state
//!
//! Sheets are `rows x cols` grids. The row is chosen by facing, the column
//! cycles while the entity moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way a sprite faces (sheet row order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Down,
    Left,
    Right,
    Up,
}

impl Facing {
    /// Sheet row for this facing
    pub fn row(&self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::Left => 1,
            Facing::Right => 2,
            Facing::Up => 3,
        }
    }

    /// Facing implied by a velocity. The dominant axis wins; ties keep `current`.
    pub fn from_velocity(vel: Vec2, current: Facing) -> Facing {
        let ax = vel.x.abs();
        let ay = vel.y.abs();
        if ax > ay {
            if vel.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if ay > ax {
            // Screen space: +y is down
            if vel.y > 0.0 { Facing::Down } else { Facing::Up }
        } else {
            current
        }
    }
}

/// Frame selection for one sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAnim {
    pub rows: u32,
    pub cols: u32,
    pub facing: Facing,
    /// Current column, `0..cols`
    pub frame: u32,
    pub frames_per_second: f32,
    accumulator: f32,
}

impl SpriteAnim {
    pub fn new(rows: u32, cols: u32, frames_per_second: f32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            facing: Facing::Down,
            frame: 0,
            frames_per_second,
            accumulator: 0.0,
        }
    }

    /// Single-frame sheet (no animation)
    pub fn still() -> Self {
        Self::new(1, 1, 0.0)
    }

    /// Sheet row to draw; single-row sheets ignore facing
    pub fn row(&self) -> u32 {
        self.facing.row().min(self.rows - 1)
    }

    pub fn face_by_velocity(&mut self, vel: Vec2) {
        self.facing = Facing::from_velocity(vel, self.facing);
    }

    /// Advance by `dt` while moving at `vel`. Standing still shows the idle frame.
    pub fn advance(&mut self, vel: Vec2, dt: f32) {
        if vel == Vec2::ZERO {
            self.frame = 0;
            return;
        }
        if self.frames_per_second <= 0.0 {
            return;
        }

        let period = 1.0 / self.frames_per_second;
        self.accumulator += dt;
        // Long ticks may cover several frames
        while self.accumulator >= period {
            self.accumulator -= period;
            self.frame = (self.frame + 1) % self.cols;
        }
    }
}
