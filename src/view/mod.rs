// VIEW: Canvas drawing and DOM overlays
pub mod placeholder;
pub mod scratch;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
#[cfg(target_arch = "wasm32")]
pub use dom::DomOverlay;
