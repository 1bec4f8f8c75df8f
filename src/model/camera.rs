use crate::config::CameraConfig;

/// Horizontal follow camera. `x` is the world offset of the left screen edge.
pub struct Camera {
    pub x: f32,
    pub smoothing: f32,
    pub lead_fraction: f32,
}

impl Camera {
    pub fn new(cfg: &CameraConfig) -> Self {
        Self {
            x: 0.0,
            smoothing: cfg.smoothing,
            lead_fraction: cfg.lead_fraction,
        }
    }

    /// Where the camera wants to be, clamped so the view never leaves the world
    pub fn target(&self, player_x: f32, world_width: f32, viewport_width: f32) -> f32 {
        let max_x = (world_width - viewport_width).max(0.0);
        (player_x - viewport_width * self.lead_fraction).clamp(0.0, max_x)
    }

    /// Move a fixed fraction of the remaining distance toward the target
    pub fn follow(&mut self, player_x: f32, world_width: f32, viewport_width: f32) {
        let target = self.target(player_x, world_width, viewport_width);
        self.x += (target - self.x) * self.smoothing;
    }

    pub fn snap_to(&mut self, x: f32) {
        self.x = x;
    }

    pub fn snap_to_target(&mut self, player_x: f32, world_width: f32, viewport_width: f32) {
        self.x = self.target(player_x, world_width, viewport_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&CameraConfig::default())
    }

    #[test]
    fn target_clamps_at_right_edge() {
        let cam = camera();
        assert_eq!(cam.target(5000.0, 5200.0, 1200.0), 4000.0);
        assert_eq!(cam.target(1_000_000.0, 5200.0, 1200.0), 4000.0);
    }

    #[test]
    fn target_clamps_at_left_edge() {
        let cam = camera();
        assert_eq!(cam.target(50.0, 5200.0, 1200.0), 0.0);
    }

    #[test]
    fn narrow_world_pins_camera_to_zero() {
        let cam = camera();
        assert_eq!(cam.target(900.0, 800.0, 1200.0), 0.0);
    }

    #[test]
    fn follow_approaches_without_overshoot() {
        let mut cam = camera();
        let target = cam.target(2000.0, 5200.0, 1200.0);
        cam.follow(2000.0, 5200.0, 1200.0);
        assert!((cam.x - target * 0.08).abs() < 1e-3);

        let mut last_gap = f32::MAX;
        for _ in 0..200 {
            cam.follow(2000.0, 5200.0, 1200.0);
            let gap = target - cam.x;
            assert!(gap >= 0.0);
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1.0);
    }

    #[test]
    fn converged_camera_never_exceeds_world() {
        let mut cam = camera();
        for _ in 0..500 {
            cam.follow(5000.0, 5200.0, 1200.0);
            assert!(cam.x <= 4000.0);
        }
    }
}
