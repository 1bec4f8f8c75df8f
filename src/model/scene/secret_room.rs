use crate::config::{PictureConfig, SecretRoomConfig};
use crate::model::landmark::Landmark;
use crate::model::overlay::Prompt;
use crate::model::pictures::{self, Picture, SECRET_PICTURES};

use super::SceneBehavior;

#[derive(Debug, Clone, Copy)]
pub struct Torch {
    pub x: f32,
    pub flicker: f32,
    pub flicker_speed: f32,
}

/// Dark room behind the chained door
pub struct SecretRoom {
    pub world_width: f32,
    pub exit_stairs: Landmark,
    pub pictures: &'static [Picture],
    pub picture_radius: f32,
    pub torches: Vec<Torch>,
    clock_ms: f64,
}

impl SecretRoom {
    pub fn new(cfg: &SecretRoomConfig, frames: &PictureConfig) -> Self {
        let mut torches = Vec::new();
        let mut x = 250.0;
        let mut i = 0u32;
        while x < cfg.world_width {
            // Stagger speeds so neighbouring torches don't pulse in sync
            let flicker_speed = 0.003 + (i % 5) as f32 * 0.0004;
            torches.push(Torch { x, flicker: 1.0, flicker_speed });
            x += cfg.torch_spacing.max(1.0);
            i += 1;
        }

        Self {
            world_width: cfg.world_width,
            exit_stairs: Landmark::new(cfg.exit_x, cfg.exit_radius),
            pictures: &SECRET_PICTURES,
            picture_radius: frames.interaction_radius,
            torches,
            clock_ms: 0.0,
        }
    }

    pub fn is_near_exit(&self, player_x: f32) -> bool {
        self.exit_stairs.is_near(player_x)
    }

    pub fn nearby_picture(&self, player_x: f32) -> Option<&'static Picture> {
        pictures::nearest(self.pictures, player_x, self.picture_radius)
    }
}

impl SceneBehavior for SecretRoom {
    fn world_width(&self) -> f32 {
        self.world_width
    }

    fn update(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms as f64;
        let t = self.clock_ms as f32;
        for torch in &mut self.torches {
            torch.flicker = 0.7 + (t * torch.flicker_speed + torch.x).sin() * 0.3;
        }
    }

    fn prompt(&self, player_x: f32) -> Option<Prompt> {
        if self.is_near_exit(player_x) {
            Some(Prompt::Exit)
        } else if self.nearby_picture(player_x).is_some() {
            Some(Prompt::Interact)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_beats_pictures() {
        let room = SecretRoom::new(&SecretRoomConfig::default(), &PictureConfig::default());
        assert_eq!(room.prompt(100.0), Some(Prompt::Exit));
        assert_eq!(room.prompt(400.0), Some(Prompt::Interact));
        assert_eq!(room.prompt(600.0), None);
    }

    #[test]
    fn torches_flicker_within_range() {
        let mut room = SecretRoom::new(&SecretRoomConfig::default(), &PictureConfig::default());
        for _ in 0..30 {
            room.update(16.0);
            assert!(room.torches.iter().all(|t| (0.4..=1.0).contains(&t.flicker)));
        }
    }
}
