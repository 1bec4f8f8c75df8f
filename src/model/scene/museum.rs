use crate::config::{MuseumConfig, PictureConfig};
use crate::model::landmark::Landmark;
use crate::model::overlay::Prompt;
use crate::model::pictures::{self, Picture, MUSEUM_PICTURES};

use super::SceneBehavior;

/// Chained door at the far end of the gallery
#[derive(Debug, Clone)]
pub struct SecretDoor {
    pub landmark: Landmark,
    pub chains_remaining: u32,
    pub broken: bool,
    pub shake_timer_ms: f32,
    shake_ms: f32,
}

impl SecretDoor {
    /// Break one chain. Returns the chains left, or None once the door is open.
    pub fn break_chain(&mut self) -> Option<u32> {
        if self.broken || self.chains_remaining == 0 {
            return None;
        }
        self.chains_remaining -= 1;
        self.shake_timer_ms = self.shake_ms;
        if self.chains_remaining == 0 {
            self.broken = true;
        }
        Some(self.chains_remaining)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer_ms > 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Plant {
    pub x: f32,
    pub tall: bool,
    pub sway: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct CeilingLight {
    pub x: f32,
    pub flicker: f32,
}

pub struct Museum {
    pub world_width: f32,
    pub welcome_booth: Landmark,
    pub valentine_booth: Landmark,
    pub secret_door: SecretDoor,
    pub pictures: &'static [Picture],
    pub picture_radius: f32,
    pub plants: Vec<Plant>,
    pub lights: Vec<CeilingLight>,
    pub benches: [f32; 5],
    clock_ms: f64,
}

impl Museum {
    pub fn new(cfg: &MuseumConfig, frames: &PictureConfig) -> Self {
        let plants = [350.0, 1000.0, 1800.0, 2700.0, 3500.0, 4200.0]
            .iter()
            .enumerate()
            .map(|(i, &x)| Plant { x, tall: i % 2 == 0, sway: i as f32 * 1.3 })
            .collect();

        let mut lights = Vec::new();
        let mut x = 300.0;
        while x < cfg.world_width {
            lights.push(CeilingLight { x, flicker: 1.0 });
            x += 400.0;
        }

        Self {
            world_width: cfg.world_width,
            welcome_booth: Landmark::new(cfg.welcome_booth_x, cfg.booth_radius),
            valentine_booth: Landmark::new(cfg.valentine_booth_x, cfg.booth_radius),
            secret_door: SecretDoor {
                landmark: Landmark::new(cfg.secret_door_x, cfg.secret_door_radius),
                chains_remaining: cfg.chains,
                broken: cfg.chains == 0,
                shake_timer_ms: 0.0,
                shake_ms: cfg.door_shake_ms,
            },
            pictures: &MUSEUM_PICTURES,
            picture_radius: frames.interaction_radius,
            plants,
            lights,
            benches: [700.0, 1500.0, 2400.0, 3300.0, 4000.0],
            clock_ms: 0.0,
        }
    }

    pub fn is_near_welcome_booth(&self, player_x: f32) -> bool {
        self.welcome_booth.is_near(player_x)
    }

    pub fn is_near_valentine_booth(&self, player_x: f32) -> bool {
        self.valentine_booth.is_near(player_x)
    }

    pub fn is_near_secret_door(&self, player_x: f32) -> bool {
        self.secret_door.landmark.is_near(player_x)
    }

    pub fn is_door_broken(&self) -> bool {
        self.secret_door.broken
    }

    pub fn break_chain(&mut self) -> Option<u32> {
        self.secret_door.break_chain()
    }

    pub fn nearby_picture(&self, player_x: f32) -> Option<&'static Picture> {
        pictures::nearest(self.pictures, player_x, self.picture_radius)
    }
}

impl SceneBehavior for Museum {
    fn world_width(&self) -> f32 {
        self.world_width
    }

    fn update(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms as f64;
        let t = self.clock_ms as f32;

        for plant in &mut self.plants {
            plant.sway += dt_ms * 0.001;
        }
        for light in &mut self.lights {
            light.flicker = 0.9 + (t * 0.003 + light.x).sin() * 0.1;
        }
        if self.secret_door.shake_timer_ms > 0.0 {
            self.secret_door.shake_timer_ms -= dt_ms;
        }
    }

    fn prompt(&self, player_x: f32) -> Option<Prompt> {
        if self.is_near_welcome_booth(player_x) {
            Some(Prompt::Welcome)
        } else if self.is_near_valentine_booth(player_x) {
            Some(Prompt::Valentine)
        } else if self.is_near_secret_door(player_x) {
            Some(Prompt::Door)
        } else if self.nearby_picture(player_x).is_some() {
            Some(Prompt::Interact)
        } else {
            None
        }
    }
}
