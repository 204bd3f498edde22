//! Canvas2D presentation
//!
//! Paints a [`Snapshot`] every frame. Objects and the ship are emoji glyphs;
//! the renderer never touches simulation state.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::settings::Settings;
use crate::sim::{Snapshot, Viewport};
use crate::tuning::Tuning;

const SHIP_GLYPH: &str = "🚀";
const FLAME_GLYPH: &str = "🔥";
const FLAME_SIZE: f64 = 30.0;
/// Flame sits this far below the ship's centre
const FLAME_OFFSET: f64 = 45.0;

/// Canvas and its 2D context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Bind to a canvas element; `None` if it has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// Match the backing store to the window size
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        log::debug!("Canvas resized to {}x{}", width, height);
    }

    /// Current drawing area, passed to the simulation each tick
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Left edge of the canvas in client coordinates
    pub fn client_left(&self) -> f32 {
        self.canvas.get_bounding_client_rect().left() as f32
    }

    pub fn render(&self, snapshot: &Snapshot, tuning: &Tuning, settings: &Settings) {
        let vp = self.viewport();
        let ctx = &self.ctx;

        ctx.clear_rect(0.0, 0.0, vp.width as f64, vp.height as f64);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        // Ship
        let ship_y = tuning.player_y(vp.height) as f64;
        ctx.save();
        let _ = ctx.translate(snapshot.player.x as f64, ship_y);
        if snapshot.player.propelling && settings.flame_cue {
            ctx.set_font(&format!("{}px Arial", FLAME_SIZE));
            let _ = ctx.fill_text(FLAME_GLYPH, 0.0, FLAME_OFFSET);
        }
        ctx.set_font(&format!("{}px Arial", tuning.player_size));
        let _ = ctx.fill_text(SHIP_GLYPH, 0.0, 0.0);
        ctx.restore();

        // Objects
        let spin = settings.effective_spin();
        for obj in &snapshot.objects {
            ctx.save();
            let _ = ctx.translate(obj.pos.x as f64, obj.pos.y as f64);
            if spin {
                let _ = ctx.rotate((obj.rotation as f64).to_radians());
            }
            ctx.set_font(&format!("{}px Arial", obj.size));
            let _ = ctx.fill_text(obj.glyph, 0.0, 0.0);
            ctx.restore();
        }
    }
}
