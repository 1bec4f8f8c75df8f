pub mod outside;
pub mod museum;
pub mod secret_room;

pub use outside::{Outside, TicketOutcome};
pub use museum::{Museum, SecretDoor};
pub use secret_room::SecretRoom;

use crate::config::GameConfig;
use crate::model::overlay::Prompt;

/// Which scene is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Outside,
    Museum,
    SecretRoom,
}

impl SceneId {
    pub fn label(&self) -> &'static str {
        match self {
            SceneId::Outside => "outside",
            SceneId::Museum => "museum",
            SceneId::SecretRoom => "secret room",
        }
    }

    /// Indoor scenes carry the dust particle layer
    pub fn has_particles(&self) -> bool {
        !matches!(self, SceneId::Outside)
    }
}

/// Capabilities every scene shares
pub trait SceneBehavior {
    fn world_width(&self) -> f32;
    fn update(&mut self, dt_ms: f32);
    /// Contextual prompt for a player standing at `player_x`
    fn prompt(&self, player_x: f32) -> Option<Prompt>;
}

/// All three scenes, alive for the whole session
pub struct Scenes {
    pub outside: Outside,
    pub museum: Museum,
    pub secret_room: SecretRoom,
}

impl Scenes {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            outside: Outside::new(&cfg.outside, cfg.particles.seed),
            museum: Museum::new(&cfg.museum, &cfg.pictures),
            secret_room: SecretRoom::new(&cfg.secret_room, &cfg.pictures),
        }
    }

    pub fn get(&self, id: SceneId) -> &dyn SceneBehavior {
        match id {
            SceneId::Outside => &self.outside,
            SceneId::Museum => &self.museum,
            SceneId::SecretRoom => &self.secret_room,
        }
    }

    pub fn get_mut(&mut self, id: SceneId) -> &mut dyn SceneBehavior {
        match id {
            SceneId::Outside => &mut self.outside,
            SceneId::Museum => &mut self.museum,
            SceneId::SecretRoom => &mut self.secret_room,
        }
    }
}
