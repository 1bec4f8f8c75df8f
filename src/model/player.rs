use glam::Vec2;

use crate::config::{Placement, PlayerConfig};

/// Normalised movement intents for one tick. Keyboard and touch both end
/// up here; the player never sees raw device events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
}

/// Player kinematics and walk-cycle state, in world space
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub base_y: f32,
    pub facing_right: bool,
    pub airborne: bool,
    pub world_min: f32,
    pub world_max: f32,

    // Walk animation
    pub walk_frame: u32,
    pub walk_timer: u32,
    pub bob_offset: f32,
    pub sprinting: bool,

    jump_held: bool,
    cfg: PlayerConfig,
}

impl Player {
    pub fn new(cfg: PlayerConfig, x: f32, base_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, base_y),
            vel: Vec2::ZERO,
            base_y,
            facing_right: true,
            airborne: false,
            world_min: 50.0,
            world_max: 5000.0,
            walk_frame: 0,
            walk_timer: 0,
            bob_offset: 0.0,
            sprinting: false,
            jump_held: false,
            cfg,
        }
    }

    pub fn width(&self) -> f32 {
        self.cfg.width
    }

    pub fn height(&self) -> f32 {
        self.cfg.height
    }

    pub fn world_x(&self) -> f32 {
        self.pos.x
    }

    /// Integrate one tick
    pub fn update(&mut self, intents: &Intents) {
        let speed = if intents.sprint { self.cfg.sprint_speed } else { self.cfg.base_speed };
        self.sprinting = intents.sprint;

        if intents.left {
            self.vel.x -= self.cfg.acceleration;
            self.facing_right = false;
        }
        if intents.right {
            self.vel.x += self.cfg.acceleration;
            self.facing_right = true;
        }

        self.vel.x *= self.cfg.friction;
        self.vel.x = self.vel.x.clamp(-speed, speed);
        if self.vel.x.abs() < self.cfg.stop_epsilon {
            self.vel.x = 0.0;
        }

        // Rising edge only: holding jump through a landing does not bounce
        if intents.jump && !self.jump_held && !self.airborne {
            self.airborne = true;
            self.vel.y = self.cfg.jump_force;
        }
        self.jump_held = intents.jump;

        if self.airborne {
            self.vel.y += self.cfg.gravity;
            self.pos.y += self.vel.y;
            if self.pos.y >= self.base_y {
                self.pos.y = self.base_y;
                self.vel.y = 0.0;
                self.airborne = false;
            }
        }

        self.pos.x += self.vel.x;
        self.animate_walk();
        self.pos.x = self.pos.x.clamp(self.world_min, self.world_max);
    }

    fn animate_walk(&mut self) {
        if self.vel.x.abs() > 0.5 {
            let frame_ticks = if self.sprinting {
                self.cfg.sprint_walk_frame_ticks
            } else {
                self.cfg.walk_frame_ticks
            };
            self.walk_timer += 1;
            if self.walk_timer >= frame_ticks {
                self.walk_timer = 0;
                self.walk_frame = (self.walk_frame + 1) % 4;
            }
            self.bob_offset = if self.airborne {
                0.0
            } else {
                (self.walk_frame as f32 * std::f32::consts::FRAC_PI_2).sin() * 2.0
            };
        } else {
            self.walk_frame = 0;
            self.walk_timer = 0;
            self.bob_offset = 0.0;
        }
    }

    pub fn set_world_bounds(&mut self, min: f32, max: f32) {
        self.world_min = min;
        self.world_max = max;
        self.pos.x = self.pos.x.clamp(min, max);
    }

    /// Explicit reset used by scene transitions
    pub fn place(&mut self, x: f32, min: f32, max: f32) {
        self.world_min = min;
        self.world_max = max;
        self.pos.x = x.clamp(min, max);
        self.vel.x = 0.0;
    }

    pub fn apply_placement(&mut self, placement: &Placement) {
        self.place(placement.x, placement.world_min, placement.world_max);
    }

    /// Follow a new floor line; an airborne player keeps its height
    pub fn set_base_y(&mut self, y: f32) {
        self.base_y = y;
        if !self.airborne {
            self.pos.y = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        let mut p = Player::new(PlayerConfig::default(), 180.0, 400.0);
        p.set_world_bounds(50.0, 1700.0);
        p
    }

    const RIGHT: Intents = Intents { left: false, right: true, sprint: false, jump: false };
    const JUMP: Intents = Intents { left: false, right: false, sprint: false, jump: true };

    #[test]
    fn walking_caps_at_base_speed() {
        let mut p = player();
        for _ in 0..10 {
            p.update(&RIGHT);
        }
        assert_eq!(p.vel.x, 3.5);
        assert!(p.facing_right);
    }

    #[test]
    fn sprint_raises_the_cap() {
        let mut p = player();
        let sprint = Intents { sprint: true, ..RIGHT };
        for _ in 0..10 {
            p.update(&sprint);
        }
        assert_eq!(p.vel.x, 6.5);
    }

    #[test]
    fn friction_brings_player_to_exact_rest() {
        let mut p = player();
        for _ in 0..5 {
            p.update(&RIGHT);
        }
        let mut ticks = 0;
        while p.vel.x != 0.0 {
            p.update(&Intents::default());
            ticks += 1;
            assert!(ticks < 100, "player never stopped");
        }
        let x = p.world_x();
        p.update(&Intents::default());
        assert_eq!(p.world_x(), x);
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut p = player();
        p.update(&Intents { left: true, right: true, sprint: false, jump: false });
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn position_stays_inside_bounds() {
        let mut p = player();
        let left = Intents { left: true, sprint: true, ..Intents::default() };
        for tick in 0..2000 {
            let intents = if (tick / 300) % 2 == 0 { left } else { Intents { sprint: true, ..RIGHT } };
            p.update(&intents);
            assert!(p.world_x() >= p.world_min && p.world_x() <= p.world_max);
        }
        p.set_world_bounds(50.0, 600.0);
        for _ in 0..300 {
            p.update(&Intents { sprint: true, ..RIGHT });
        }
        assert_eq!(p.world_x(), 600.0);
    }

    #[test]
    fn held_jump_gives_one_impulse() {
        let mut p = player();
        p.update(&JUMP);
        assert!(p.airborne);
        let vy_after_first = p.vel.y;
        p.update(&JUMP);
        // gravity only, no second impulse
        assert_eq!(p.vel.y, vy_after_first + 0.5);
    }

    #[test]
    fn jump_pressed_twice_midair_gives_one_impulse() {
        let mut p = player();
        let mut impulses = 0;
        let sequence = [JUMP, Intents::default(), JUMP, Intents::default(), JUMP];
        for intents in sequence {
            let was_airborne = p.airborne;
            p.update(&intents);
            if !was_airborne && p.airborne {
                impulses += 1;
            }
        }
        assert_eq!(impulses, 1);
    }

    #[test]
    fn landing_restores_baseline_and_allows_next_jump() {
        let mut p = player();
        p.update(&JUMP);
        let mut ticks = 0;
        while p.airborne {
            p.update(&JUMP);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(p.pos.y, p.base_y);
        assert_eq!(p.vel.y, 0.0);

        // still held: no bounce
        p.update(&JUMP);
        assert!(!p.airborne);

        p.update(&Intents::default());
        p.update(&JUMP);
        assert!(p.airborne);
    }

    #[test]
    fn rebasing_keeps_airborne_height() {
        let mut p = player();
        p.update(&JUMP);
        let y = p.pos.y;
        p.set_base_y(500.0);
        assert_eq!(p.pos.y, y);

        let mut grounded = player();
        grounded.set_base_y(500.0);
        assert_eq!(grounded.pos.y, 500.0);
    }

    #[test]
    fn walk_cycle_advances_while_moving() {
        let mut p = player();
        for _ in 0..20 {
            p.update(&RIGHT);
        }
        assert!(p.walk_frame > 0);
        for _ in 0..40 {
            p.update(&Intents::default());
        }
        assert_eq!(p.walk_frame, 0);
        assert_eq!(p.bob_offset, 0.0);
    }
}
