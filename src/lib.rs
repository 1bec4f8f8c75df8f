// Re-export all public modules so they can be used from main.rs and tests
pub mod config;
pub mod error;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use config::GameConfig;
pub use controller::Game;
pub use error::{ConfigError, GameError};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{error, info};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

    use crate::config::GameConfig;
    use crate::controller::input::wasm::keyboard_event_to_input;
    use crate::controller::{FrameLoopContext, Game, InputEvent, InputProcessor, InputState};
    use crate::error::GameError;
    use crate::view::{CanvasRenderer, DomOverlay};

    /// Main application setup for WASM
    pub fn setup_app(window: Window, document: Document, canvas: HtmlCanvasElement) -> Result<(), GameError> {
        let cfg = GameConfig::default();
        let inner_width = window.inner_width()?.as_f64().unwrap_or(cfg.viewport.max_width as f64);
        let (width, height) = cfg.viewport.fit(inner_width as f32);

        let game = Rc::new(RefCell::new(Game::new(cfg, width, height)));
        let input_state = Rc::new(RefCell::new(InputState::new()));

        let mut renderer = CanvasRenderer::new(&document, canvas)?;
        renderer.resize(width as u32, height as u32);
        renderer.preload_images()?;

        let dom = DomOverlay::new(&document, game.clone())?;

        setup_input_listeners(&document, &window, &dom, input_state.clone(), game.clone())?;

        let mut frame_ctx = FrameLoopContext {
            game,
            input_state,
            input_processor: InputProcessor::default(),
            renderer,
            dom,
            last_time: window.performance().map(|p| p.now()).unwrap_or(0.0),
            last_inner_width: inner_width,
        };
        info!(width, height, "museum ready");

        // Continuous redraw using requestAnimationFrame
        let window_for_loop = window.clone();
        AnimationLoop::new(window, move || frame_ctx.update(&window_for_loop)).start()?;
        Ok(())
    }

    /// Every listener funnels into one dispatcher so the processor sees
    /// events in arrival order.
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        dom: &DomOverlay,
        input_state: Rc<RefCell<InputState>>,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let input_processor = InputProcessor::default();

        let dispatch: Rc<dyn Fn(&InputEvent)> = {
            let input_processor = input_processor.clone();
            Rc::new(move |event: &InputEvent| {
                let (started, accepting) = {
                    let game = game.borrow();
                    (game.started, !game.is_transitioning())
                };
                let command = input_processor.process_event(&mut input_state.borrow_mut(), event, started, accepting);
                if let Some(command) = command {
                    game.borrow_mut().handle_command(command);
                }
            })
        };

        // Keyboard down
        {
            let dispatch = dispatch.clone();
            let input_processor = input_processor.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                if input_processor.is_navigation_key(&e.key()) {
                    e.prevent_default();
                }
                dispatch(&keyboard_event_to_input(&e, true));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let dispatch = dispatch.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                dispatch(&keyboard_event_to_input(&e, false));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Focus loss - release everything
        {
            let dispatch = dispatch.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                dispatch(&InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Visibility change - release everything
        {
            let dispatch = dispatch.clone();
            let doc = document.clone();
            let visibility = Closure::wrap(Box::new(move |_e: Event| {
                dispatch(&InputEvent::VisibilityChanged { visible: !doc.hidden() });
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
            visibility.forget();
        }

        // Any click dismisses the title card
        {
            let dispatch = dispatch.clone();
            let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
                dispatch(&InputEvent::Click);
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
        }

        // On-screen touch buttons
        for (button, el) in dom.touch_buttons() {
            let start = {
                let dispatch = dispatch.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    dispatch(&InputEvent::TouchStart(button));
                }) as Box<dyn FnMut(TouchEvent)>)
            };
            el.add_event_listener_with_callback("touchstart", start.as_ref().unchecked_ref())?;
            start.forget();

            for kind in ["touchend", "touchcancel"] {
                let dispatch = dispatch.clone();
                let end = Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    dispatch(&InputEvent::TouchEnd(button));
                }) as Box<dyn FnMut(TouchEvent)>);
                el.add_event_listener_with_callback(kind, end.as_ref().unchecked_ref())?;
                end.forget();
            }
        }

        Ok(())
    }

    pub fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or(js_error("no global `window`"))?;
        let document = window.document().ok_or(js_error("no document on window"))?;
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        canvas_el.set_id("gameCanvas");
        body.append_child(&canvas_el)?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    /// Self-rescheduling requestAnimationFrame callback
    struct AnimationLoop {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl AnimationLoop {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) -> Result<(), JsValue> {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Schedule the next frame
                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(err) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        error!(?err, "requestAnimationFrame failed, frame loop stopped");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
            }

            // Leak the closure to keep it alive
            std::mem::forget(callback);
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    logging::init();
    let (window, document, canvas) = web::init_canvas()?;
    web::setup_app(window, document, canvas)?;
    Ok(())
}
