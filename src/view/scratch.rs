//! Gold scratch layer on the lucky card.

/// Eraser stamp: one large dab with two offset smaller ones, `(dx, dy, radius)`
pub const BRUSH: [(f64, f64, f64); 3] = [(0.0, 0.0, 22.0), (5.0, -3.0, 16.0), (-5.0, 3.0, 16.0)];

/// Share of an RGBA buffer that has been scratched clear. Samples the
/// alpha of every fourth pixel.
pub fn cleared_fraction(rgba: &[u8]) -> f32 {
    let sampled = (rgba.len() / 4) as f32 / 4.0;
    if sampled <= 0.0 {
        return 0.0;
    }
    let transparent = rgba.iter().skip(3).step_by(16).filter(|&&alpha| alpha == 0).count();
    (transparent as f32 / sampled).min(1.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::ScratchPad;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use tracing::{info, warn};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent};

    use super::{cleared_fraction, BRUSH};
    use crate::controller::Game;

    const FALLBACK_SIZE: (u32, u32) = (280, 140);

    type Listener = Closure<dyn FnMut(Event)>;

    #[derive(Debug, Clone, Copy)]
    enum Stroke {
        Begin,
        Move,
        End,
    }

    const STROKES: [(&str, Stroke); 7] = [
        ("mousedown", Stroke::Begin),
        ("mousemove", Stroke::Move),
        ("mouseup", Stroke::End),
        ("mouseleave", Stroke::End),
        ("touchstart", Stroke::Begin),
        ("touchmove", Stroke::Move),
        ("touchend", Stroke::End),
    ];

    /// Painted scratch layer plus its pointer listeners. Attached when the
    /// valentine modal opens, detached when it closes.
    pub struct ScratchPad {
        canvas: HtmlCanvasElement,
        listeners: Vec<(&'static str, Listener)>,
    }

    impl ScratchPad {
        pub fn attach(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<Self, JsValue> {
            let ctx = context(canvas)?;
            paint(canvas, &ctx)?;

            let drawing = Rc::new(Cell::new(false));
            let scratch: Rc<dyn Fn(f64, f64)> = {
                let canvas = canvas.clone();
                Rc::new(move |client_x, client_y| {
                    let covered = game.borrow().overlay.valentine.is_some_and(|card| card.is_covered());
                    if !covered {
                        return;
                    }
                    match erase(&canvas, &ctx, client_x, client_y) {
                        Ok(cleared) => {
                            if game.borrow_mut().overlay.report_scratch(cleared) {
                                info!(cleared, "scratch card revealed");
                            }
                        }
                        Err(err) => warn!(?err, "scratch failed"),
                    }
                })
            };

            let listener = |stroke: Stroke| -> Listener {
                let drawing = drawing.clone();
                let scratch = scratch.clone();
                Closure::wrap(Box::new(move |e: Event| {
                    let touch = e.dyn_ref::<TouchEvent>().is_some();
                    if touch && !matches!(stroke, Stroke::End) {
                        e.prevent_default();
                    }
                    match stroke {
                        Stroke::End => drawing.set(false),
                        Stroke::Begin | Stroke::Move => {
                            if matches!(stroke, Stroke::Begin) {
                                drawing.set(true);
                            }
                            if let (true, Some((x, y))) = (drawing.get(), pointer(&e)) {
                                scratch(x, y);
                            }
                        }
                    }
                }) as Box<dyn FnMut(Event)>)
            };

            let mut pad = Self { canvas: canvas.clone(), listeners: Vec::with_capacity(STROKES.len()) };
            for (name, stroke) in STROKES {
                let callback = listener(stroke);
                if let Err(err) = canvas.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref()) {
                    pad.detach();
                    return Err(err);
                }
                pad.listeners.push((name, callback));
            }
            Ok(pad)
        }

        /// Remove every listener, then drop the closures
        pub fn detach(self) {
            for (name, callback) in &self.listeners {
                if let Err(err) = self
                    .canvas
                    .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
                {
                    warn!(name, ?err, "could not remove scratch listener");
                }
            }
        }
    }

    fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
        Ok(canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context for scratch canvas"))?
            .dyn_into::<CanvasRenderingContext2d>()?)
    }

    fn pointer(e: &Event) -> Option<(f64, f64)> {
        if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
            return Some((mouse.client_x() as f64, mouse.client_y() as f64));
        }
        let touch = e.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        Some((touch.client_x() as f64, touch.client_y() as f64))
    }

    fn paint(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let rect = canvas.get_bounding_client_rect();
        let (width, height) = if rect.width() >= 1.0 && rect.height() >= 1.0 {
            (rect.width() as u32, rect.height() as u32)
        } else {
            FALLBACK_SIZE
        };
        canvas.set_width(width);
        canvas.set_height(height);
        let (w, h) = (width as f64, height as f64);

        let gold = ctx.create_linear_gradient(0.0, 0.0, w, h);
        for (offset, color) in [(0.0, "#c9a84c"), (0.3, "#e8c860"), (0.5, "#dab548"), (0.7, "#e8c860"), (1.0, "#c9a84c")] {
            gold.add_color_stop(offset, color)?;
        }
        ctx.set_fill_style_canvas_gradient(&gold);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("rgba(180, 140, 50, 0.3)");
        for x in (0..width).step_by(20) {
            for y in (0..height).step_by(20) {
                if (x + y) % 40 == 0 {
                    ctx.fill_rect(x as f64, y as f64, 10.0, 10.0);
                }
            }
        }

        ctx.set_fill_style_str("rgba(160, 120, 40, 0.6)");
        ctx.set_font("bold 18px 'Quicksand', sans-serif");
        ctx.set_text_align("center");
        ctx.fill_text("SCRATCH HERE", w / 2.0, h / 2.0 - 5.0)?;

        ctx.set_fill_style_str("rgba(255, 230, 150, 0.6)");
        ctx.set_font("14px serif");
        for (x, y) in [(30.0, 30.0), (w - 30.0, 30.0), (30.0, h - 20.0), (w - 30.0, h - 20.0)] {
            ctx.fill_text("✦", x, y)?;
        }
        Ok(())
    }

    /// Stamp the brush at a client-space point and measure what is left
    fn erase(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, client_x: f64, client_y: f64) -> Result<f32, JsValue> {
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Ok(0.0);
        }
        let x = (client_x - rect.left()) * canvas.width() as f64 / rect.width();
        let y = (client_y - rect.top()) * canvas.height() as f64 / rect.height();

        ctx.set_global_composite_operation("destination-out")?;
        ctx.set_fill_style_str("#000");
        for (dx, dy, radius) in BRUSH {
            ctx.begin_path();
            ctx.arc(x + dx, y + dy, radius, 0.0, TAU)?;
            ctx.fill();
        }
        ctx.set_global_composite_operation("source-over")?;

        let pixels = ctx.get_image_data(0.0, 0.0, canvas.width() as f64, canvas.height() as f64)?;
        Ok(cleared_fraction(&pixels.data()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(pixels: usize, alpha: impl Fn(usize) -> u8) -> Vec<u8> {
        (0..pixels).flat_map(|i| [0xc9, 0xa8, 0x4c, alpha(i)]).collect()
    }

    #[test]
    fn fresh_layer_is_not_cleared() {
        assert_eq!(cleared_fraction(&layer(400, |_| 0xff)), 0.0);
    }

    #[test]
    fn fully_scratched_layer_is_cleared() {
        assert_eq!(cleared_fraction(&layer(400, |_| 0)), 1.0);
    }

    #[test]
    fn half_scratched_layer() {
        assert_eq!(cleared_fraction(&layer(400, |i| if i < 200 { 0 } else { 0xff })), 0.5);
    }

    #[test]
    fn only_sampled_pixels_count() {
        // every fourth pixel is sampled, starting with the first
        let cleared = cleared_fraction(&layer(400, |i| if i % 4 == 0 { 0 } else { 0xff }));
        assert_eq!(cleared, 1.0);
        let missed = cleared_fraction(&layer(400, |i| if i % 4 == 1 { 0 } else { 0xff }));
        assert_eq!(missed, 0.0);
    }

    #[test]
    fn partly_transparent_pixels_do_not_count() {
        assert_eq!(cleared_fraction(&layer(400, |_| 1)), 0.0);
    }

    #[test]
    fn empty_buffer_is_not_cleared() {
        assert_eq!(cleared_fraction(&[]), 0.0);
    }
}
