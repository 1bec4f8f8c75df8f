//! Tunable constants for the whole walk-through.
//!
//! `GameConfig::default()` carries the shipped values. A RON document can
//! override any subset of them, every section falls back to its defaults
//! for the fields it does not name.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: ViewportConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub outside: OutsideConfig,
    pub museum: MuseumConfig,
    pub secret_room: SecretRoomConfig,
    pub pictures: PictureConfig,
    pub transitions: TransitionConfig,
    pub ui: UiConfig,
    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            player: PlayerConfig::default(),
            camera: CameraConfig::default(),
            outside: OutsideConfig::default(),
            museum: MuseumConfig::default(),
            secret_room: SecretRoomConfig::default(),
            pictures: PictureConfig::default(),
            transitions: TransitionConfig::default(),
            ui: UiConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(src: &str) -> Result<Self, ConfigError> {
        ron::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, Default::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a `.ron` file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !path.ends_with(".ron") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}

/// Canvas sizing: width = min(max_width, inner_width - margin), 16:9
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_width: f32,
    pub margin: f32,
    pub aspect: f32,
    /// Floor line as a fraction of screen height
    pub floor_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_width: 1200.0,
            margin: 40.0,
            aspect: 16.0 / 9.0,
            floor_ratio: 0.75,
        }
    }
}

impl ViewportConfig {
    /// Canvas size for a given browser inner width
    pub fn fit(&self, inner_width: f32) -> (f32, f32) {
        let width = self.max_width.min(inner_width - self.margin).max(1.0);
        (width, width / self.aspect)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    pub sprint_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Horizontal speeds below this snap to zero
    pub stop_epsilon: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Ticks per walk frame
    pub walk_frame_ticks: u32,
    pub sprint_walk_frame_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 52.0,
            base_speed: 3.5,
            sprint_speed: 6.5,
            acceleration: 6.0,
            friction: 0.85,
            stop_epsilon: 0.1,
            jump_force: -10.0,
            gravity: 0.5,
            walk_frame_ticks: 8,
            sprint_walk_frame_ticks: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub smoothing: f32,
    /// Player sits this fraction of the viewport from the left edge
    pub lead_fraction: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.08,
            lead_fraction: 1.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutsideConfig {
    pub world_width: f32,
    pub ticket_booth_x: f32,
    pub entrance_x: f32,
    pub interaction_radius: f32,
    /// Added to the door-open amount every gameplay tick once the door opens
    pub door_open_rate: f32,
    /// Door-open amount that must be exceeded before the entrance works
    pub enter_threshold: f32,
    pub cloud_count: usize,
}

impl Default for OutsideConfig {
    fn default() -> Self {
        Self {
            world_width: 1800.0,
            ticket_booth_x: 1050.0,
            entrance_x: 1500.0,
            interaction_radius: 80.0,
            door_open_rate: 0.02,
            enter_threshold: 0.8,
            cloud_count: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub world_width: f32,
    pub welcome_booth_x: f32,
    pub valentine_booth_x: f32,
    pub booth_radius: f32,
    pub secret_door_x: f32,
    pub secret_door_radius: f32,
    pub chains: u32,
    pub door_shake_ms: f32,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            world_width: 5200.0,
            welcome_booth_x: 120.0,
            valentine_booth_x: 4550.0,
            booth_radius: 100.0,
            secret_door_x: 4900.0,
            secret_door_radius: 100.0,
            chains: 3,
            door_shake_ms: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretRoomConfig {
    pub world_width: f32,
    pub exit_x: f32,
    pub exit_radius: f32,
    pub torch_spacing: f32,
}

impl Default for SecretRoomConfig {
    fn default() -> Self {
        Self {
            world_width: 4500.0,
            exit_x: 100.0,
            exit_radius: 80.0,
            torch_spacing: 350.0,
        }
    }
}

/// Picture frame layout shared by both galleries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureConfig {
    pub frame_width: f32,
    pub frame_height: f32,
    pub border_width: f32,
    pub y_position: f32,
    pub interaction_radius: f32,
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            frame_width: 200.0,
            frame_height: 150.0,
            border_width: 12.0,
            y_position: 80.0,
            interaction_radius: 130.0,
        }
    }
}

/// Where the player lands after a scene change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub world_min: f32,
    pub world_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub fade_ms: f32,
    pub start: Placement,
    pub museum_from_outside: Placement,
    pub secret_room_entry: Placement,
    /// `x` is an offset from the secret door, not an absolute position
    pub museum_from_secret_room: Placement,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_ms: 800.0,
            start: Placement { x: 180.0, world_min: 50.0, world_max: 1700.0 },
            museum_from_outside: Placement { x: 180.0, world_min: 50.0, world_max: 5000.0 },
            secret_room_entry: Placement { x: 200.0, world_min: 50.0, world_max: 4400.0 },
            museum_from_secret_room: Placement { x: -50.0, world_min: 50.0, world_max: 5000.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub feedback_ms: f32,
    pub typewriter_ms_per_char: f32,
    /// Share of the scratch layer that must be cleared before the card reveals
    pub reveal_fraction: f32,
    /// From reveal to the accept-invitation prompt
    pub invitation_delay_ms: f32,
    /// From accepting to the prize details
    pub prize_reveal_delay_ms: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 2000.0,
            typewriter_ms_per_char: 12.0,
            reveal_fraction: 0.5,
            invitation_delay_ms: 1200.0,
            prize_reveal_delay_ms: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub sparkle_ratio: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 60,
            sparkle_ratio: 0.1,
            seed: 0x6d75_7365_756d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let cfg = GameConfig::from_ron_str("(outside: (ticket_booth_x: 900.0), camera: (smoothing: 0.2))")
            .unwrap();
        assert_eq!(cfg.outside.ticket_booth_x, 900.0);
        assert_eq!(cfg.outside.entrance_x, 1500.0);
        assert_eq!(cfg.camera.smoothing, 0.2);
        assert_eq!(cfg.museum, MuseumConfig::default());
    }

    #[test]
    fn ron_round_trips_defaults() {
        let text = GameConfig::default().to_ron_string().unwrap();
        assert_eq!(GameConfig::from_ron_str(&text).unwrap(), GameConfig::default());
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = GameConfig::from_ron_str("(outside: (").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn viewport_fits_inside_window() {
        let vp = ViewportConfig::default();
        assert_eq!(vp.fit(2000.0), (1200.0, 675.0));
        let (w, h) = vp.fit(840.0);
        assert_eq!(w, 800.0);
        assert!((h - 450.0).abs() < 1e-3);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = GameConfig::load_from_file("settings.toml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
