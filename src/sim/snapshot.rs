//! Drawable view of a session
//!
//! The renderer and HUD only ever see this; they never touch `GameState`.

use glam::Vec2;
use serde::Serialize;

use super::state::{Body, GamePhase, GameState};

/// One sprite blit: sheet cell plus where to put it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub row: u32,
    pub col: u32,
    pub alpha: f32,
}

impl SpriteView {
    fn of(body: &Body, alpha: f32) -> Self {
        Self {
            pos: body.pos,
            row: body.anim.row(),
            col: body.anim.frame,
            alpha,
        }
    }
}

/// An arrow drawn as a line from tail to head
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowView {
    pub head: Vec2,
    pub tail: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PickupView {
    pub pos: Vec2,
    pub radius: f32,
    /// Gentle size pulse around 1.0
    pub pulse: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u32,
    pub best_score: u32,
    /// Number shown during the countdown
    pub countdown: Option<u8>,
    pub game_over: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub player: SpriteView,
    pub attackers: Vec<SpriteView>,
    pub arrows: Vec<ArrowView>,
    pub pickup: Option<PickupView>,
    /// 1.0 right after a hit, fading to 0
    pub hit_flash: f32,
    pub hud: HudView,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let hit_flash = state.player.flash_intensity();
        // Flicker between 0.7 and 1.0 while the hit flash is showing
        let player_alpha = if hit_flash > 0.0 {
            0.7 + 0.3 * (state.clock * 50.0).sin().abs()
        } else {
            1.0
        };

        let countdown = match state.phase {
            GamePhase::Countdown { remaining } => Some(remaining),
            _ => None,
        };

        Self {
            player: SpriteView::of(&state.player.body, player_alpha),
            attackers: state
                .attackers
                .iter()
                .map(|a| SpriteView::of(&a.body, 1.0))
                .collect(),
            arrows: state
                .projectiles
                .iter()
                .map(|p| ArrowView {
                    head: p.pos,
                    tail: p.tail(),
                })
                .collect(),
            pickup: state.pickup.map(|p| PickupView {
                pos: p.pos,
                radius: p.radius,
                pulse: 1.0 + 0.06 * (state.clock * 6.0).sin(),
            }),
            hit_flash,
            hud: HudView {
                phase: state.phase,
                lives: state.player.lives,
                score: state.score,
                best_score: state.best_score,
                countdown,
                game_over: state.is_over(),
            },
        }
    }
}
