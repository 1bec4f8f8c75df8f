// MODEL: Game state and data
pub mod player;
pub mod camera;
pub mod landmark;
pub mod pictures;
pub mod particles;
pub mod overlay;
pub mod scene;

pub use player::{Intents, Player};
pub use camera::Camera;
pub use landmark::Landmark;
pub use pictures::Picture;
pub use particles::ParticleSystem;
pub use overlay::{ModalKind, Overlay, Prompt, ScratchCard};
pub use scene::{SceneBehavior, SceneId, Scenes};
