use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Dust,
    Sparkle,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub opacity: f32,
    pub oscillate_speed: f32,
    pub oscillate_offset: f32,
    pub kind: ParticleKind,
}

/// Floating dust motes for the indoor scenes
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    pub screen_width: f32,
    pub screen_height: f32,
    pub world_width: f32,
    sparkle_ratio: f32,
    clock_ms: f64,
    rng: SmallRng,
}

impl ParticleSystem {
    pub fn new(cfg: &ParticleConfig, screen_width: f32, screen_height: f32, world_width: f32) -> Self {
        let mut system = Self {
            particles: Vec::with_capacity(cfg.count),
            screen_width,
            screen_height,
            world_width,
            sparkle_ratio: cfg.sparkle_ratio,
            clock_ms: 0.0,
            rng: SmallRng::seed_from_u64(cfg.seed),
        };
        for _ in 0..cfg.count {
            let p = system.spawn(None);
            system.particles.push(p);
        }
        system
    }

    fn spawn(&mut self, x: Option<f32>) -> Particle {
        let rng = &mut self.rng;
        let kind = if rng.gen::<f32>() < self.sparkle_ratio {
            ParticleKind::Sparkle
        } else {
            ParticleKind::Dust
        };
        Particle {
            x: x.unwrap_or_else(|| rng.gen::<f32>() * self.world_width),
            y: rng.gen::<f32>() * self.screen_height * 0.7 + self.screen_height * 0.15,
            size: rng.gen::<f32>() * 2.0 + 1.0,
            speed_x: (rng.gen::<f32>() - 0.5) * 0.3,
            speed_y: (rng.gen::<f32>() - 0.5) * 0.2,
            opacity: rng.gen::<f32>() * 0.4 + 0.1,
            oscillate_speed: rng.gen::<f32>() * 0.02 + 0.01,
            oscillate_offset: rng.gen::<f32>() * std::f32::consts::TAU,
            kind,
        }
    }

    pub fn update(&mut self, dt_ms: f32, camera_x: f32) {
        self.clock_ms += dt_ms as f64;
        let t = self.clock_ms as f32;
        let top = self.screen_height * 0.15;
        let bottom = self.screen_height * 0.75;

        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y + (t * p.oscillate_speed + p.oscillate_offset).sin() * 0.1;

            if p.y < top {
                p.speed_y = p.speed_y.abs();
            }
            if p.y > bottom {
                p.speed_y = -p.speed_y.abs();
            }

            if p.kind == ParticleKind::Sparkle {
                p.opacity = 0.2 + (t * 0.01 + p.oscillate_offset).sin() * 0.3;
            }
        }

        // Recycle particles that drifted well off-screen
        for i in 0..self.particles.len() {
            let screen_x = self.particles[i].x - camera_x;
            if screen_x < -100.0 || screen_x > self.screen_width + 100.0 {
                let new_x = camera_x + if screen_x < 0.0 { self.screen_width + 50.0 } else { -50.0 };
                if new_x > 0.0 && new_x < self.world_width {
                    self.particles[i] = self.spawn(Some(new_x));
                }
            }
        }
    }

    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> ParticleSystem {
        ParticleSystem::new(&ParticleConfig::default(), 1200.0, 675.0, 5200.0)
    }

    #[test]
    fn spawns_configured_count_inside_world() {
        let ps = system();
        assert_eq!(ps.particles.len(), 60);
        assert!(ps.particles.iter().all(|p| p.x >= 0.0 && p.x <= 5200.0));
    }

    #[test]
    fn offscreen_particles_respawn_near_view() {
        let mut ps = system();
        let camera_x = 2000.0;
        for _ in 0..3 {
            ps.update(16.0, camera_x);
        }
        for p in &ps.particles {
            let screen_x = p.x - camera_x;
            assert!(screen_x >= -101.0 && screen_x <= ps.screen_width + 101.0);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = system();
        let b = system();
        assert!(a.particles.iter().zip(&b.particles).all(|(p, q)| p.x == q.x && p.y == q.y));
    }
}
