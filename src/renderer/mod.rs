//! Canvas2D rendering
//!
//! Blits sprite sheet cells, draws arrows as lines and the diamond as a
//! glowing emoji. Reads only a `RenderSnapshot`.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::sim::snapshot::{RenderSnapshot, SpriteView};

/// Inset when sampling a sheet cell, hides bleed from neighbouring frames
const CELL_PAD: f64 = 4.0;

/// A `rows x cols` sprite sheet image
pub struct SpriteSheet {
    img: HtmlImageElement,
    rows: u32,
    cols: u32,
}

impl SpriteSheet {
    /// Start loading `src`; draws fall back to a placeholder until it completes
    pub fn load(src: &str, rows: u32, cols: u32) -> Result<Self, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(src);
        Ok(Self {
            img,
            rows: rows.max(1),
            cols: cols.max(1),
        })
    }

    /// Wait for the image to decode. Drawing works either way.
    pub async fn decoded(&self) -> bool {
        JsFuture::from(self.img.decode()).await.is_ok()
    }

    /// Frame size once the image is ready
    fn frame_size(&self) -> Option<(f64, f64)> {
        if !self.img.complete() || self.img.natural_width() == 0 {
            return None;
        }
        Some((
            (self.img.natural_width() / self.cols) as f64,
            (self.img.natural_height() / self.rows) as f64,
        ))
    }
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    player: SpriteSheet,
    attacker: SpriteSheet,
}

impl CanvasRenderer {
    pub fn new(
        canvas: &HtmlCanvasElement,
        player: SpriteSheet,
        attacker: SpriteSheet,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_image_smoothing_enabled(false);

        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            player,
            attacker,
        })
    }

    pub fn draw(&self, snap: &RenderSnapshot) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);

        if let Some(pickup) = &snap.pickup {
            let size = (pickup.radius as f64 * 1.8).max(20.0) * pickup.pulse as f64;
            ctx.save();
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_font(&format!(
                "{size}px Apple Color Emoji, Segoe UI Emoji, Noto Color Emoji, sans-serif"
            ));
            ctx.set_global_alpha(0.9);
            ctx.set_shadow_color("rgba(0,220,255,0.9)");
            ctx.set_shadow_blur(18.0);
            let _ = ctx.fill_text("💎", pickup.pos.x as f64, pickup.pos.y as f64);
            ctx.restore();
        }

        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str("#222");
        for arrow in &snap.arrows {
            ctx.begin_path();
            ctx.move_to(arrow.head.x as f64, arrow.head.y as f64);
            ctx.line_to(arrow.tail.x as f64, arrow.tail.y as f64);
            ctx.stroke();
        }

        if snap.hit_flash > 0.0 {
            self.draw_hit_glow(snap);
        }

        self.blit(&self.player, &snap.player);
        for attacker in &snap.attackers {
            self.blit(&self.attacker, attacker);
        }
    }

    /// Red glow that expands as the hit flash fades
    fn draw_hit_glow(&self, snap: &RenderSnapshot) {
        let ctx = &self.ctx;
        let (x, y) = (snap.player.pos.x as f64, snap.player.pos.y as f64);
        let p = snap.hit_flash as f64;
        let rad = 28.0 + (1.0 - p) * 22.0;

        let Ok(grad) = ctx.create_radial_gradient(x, y, rad * 0.2, x, y, rad) else {
            return;
        };
        let _ = grad.add_color_stop(0.0, "rgba(255,120,120,0.55)");
        let _ = grad.add_color_stop(0.6, "rgba(255,60,60,0.35)");
        let _ = grad.add_color_stop(1.0, "rgba(255,0,0,0.0)");

        ctx.save();
        let _ = ctx.set_global_composite_operation("lighter");
        ctx.set_fill_style_canvas_gradient(&grad);
        ctx.begin_path();
        let _ = ctx.arc(x, y, rad, 0.0, TAU);
        ctx.fill();
        ctx.restore();
    }

    fn blit(&self, sheet: &SpriteSheet, sprite: &SpriteView) {
        let ctx = &self.ctx;
        let (x, y) = (sprite.pos.x as f64, sprite.pos.y as f64);

        ctx.save();
        ctx.set_global_alpha(sprite.alpha as f64);
        match sheet.frame_size() {
            Some((fw, fh)) => {
                let sx = (sprite.col as f64 * fw + CELL_PAD).floor();
                let sy = (sprite.row as f64 * fh + CELL_PAD).floor();
                let sw = (fw - CELL_PAD * 2.0).ceil();
                let sh = (fh - CELL_PAD * 2.0).ceil();
                let _ = ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        &sheet.img,
                        sx,
                        sy,
                        sw,
                        sh,
                        (x - fw / 2.0).round(),
                        (y - fh / 2.0).round(),
                        fw.round(),
                        fh.round(),
                    );
            }
            None => {
                // Image still loading
                ctx.set_fill_style_str("#888");
                ctx.begin_path();
                let _ = ctx.arc(x, y, 18.0, 0.0, TAU);
                ctx.fill();
            }
        }
        ctx.restore();
    }
}
