use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};
use web_sys::Window;

use crate::controller::{Game, InputProcessor, InputState};
use crate::view::{CanvasRenderer, DomOverlay};

/// Per-frame driver: time step, game update, canvas draw, DOM sync
pub struct FrameLoopContext {
    pub game: Rc<RefCell<Game>>,
    pub input_state: Rc<RefCell<InputState>>,
    pub input_processor: InputProcessor,
    pub renderer: CanvasRenderer,
    pub dom: DomOverlay,
    pub last_time: f64,
    pub last_inner_width: f64,
}

impl FrameLoopContext {
    pub fn update(&mut self, window: &Window) {
        // Time step, clamped so a backgrounded tab does not fast-forward timers
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let dt_ms = (now - self.last_time).clamp(0.0, 100.0) as f32;
        self.last_time = now;

        self.handle_resize(window);

        let (intents, sprint_toggled) = {
            let input = self.input_state.borrow();
            (self.input_processor.intents(&input), input.sprint_toggled)
        };

        let mut game = self.game.borrow_mut();
        game.update(dt_ms, &intents);

        if let Err(err) = self.renderer.draw_frame(&game) {
            warn!(?err, "frame draw failed");
        }
        if let Err(err) = self.dom.sync(&game.overlay, sprint_toggled) {
            warn!(?err, "overlay sync failed");
        }
    }

    fn handle_resize(&mut self, window: &Window) {
        let Some(inner_width) = window.inner_width().ok().and_then(|w| w.as_f64()) else {
            return;
        };
        if inner_width == self.last_inner_width {
            return;
        }
        self.last_inner_width = inner_width;

        let mut game = self.game.borrow_mut();
        let (width, height) = game.cfg.viewport.fit(inner_width as f32);
        self.renderer.resize(width as u32, height as u32);
        game.resize(width, height);
        info!(width, height, "viewport resized");
    }
}
