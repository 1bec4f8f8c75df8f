// CONTROLLER: Input, scene control, and update loop
pub mod input;
pub mod transition;
pub mod game;
#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use input::{Command, InputEvent, InputProcessor, InputState, TouchButton};
pub use transition::{Transition, TransitionKind, TransitionPhase};
pub use game::{Game, Interaction};
#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
