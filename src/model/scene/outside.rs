use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::OutsideConfig;
use crate::model::landmark::Landmark;
use crate::model::overlay::Prompt;

use super::SceneBehavior;

#[derive(Debug, Clone)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Tree {
    pub x: f32,
    pub size: f32,
}

/// Result of a ticket booth visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    Purchased,
    AlreadyHeld,
}

/// Street in front of the museum: buy a ticket, wait for the doors, enter
pub struct Outside {
    pub world_width: f32,
    pub ticket_booth: Landmark,
    pub entrance: Landmark,
    pub has_ticket: bool,
    pub door_open: bool,
    /// 0..=1, animates once the door opens
    pub door_open_amount: f32,
    pub clouds: Vec<Cloud>,
    pub trees: [Tree; 4],
    door_open_rate: f32,
    enter_threshold: f32,
}

impl Outside {
    pub fn new(cfg: &OutsideConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let clouds = (0..cfg.cloud_count)
            .map(|_| Cloud {
                x: rng.gen::<f32>() * cfg.world_width,
                y: 20.0 + rng.gen::<f32>() * 40.0,
                width: 60.0 + rng.gen::<f32>() * 80.0,
                speed: 0.1 + rng.gen::<f32>() * 0.15,
            })
            .collect();

        Self {
            world_width: cfg.world_width,
            ticket_booth: Landmark::new(cfg.ticket_booth_x, cfg.interaction_radius),
            entrance: Landmark::new(cfg.entrance_x, cfg.interaction_radius),
            has_ticket: false,
            door_open: false,
            door_open_amount: 0.0,
            clouds,
            trees: [
                Tree { x: 150.0, size: 1.0 },
                Tree { x: 350.0, size: 0.8 },
                Tree { x: 550.0, size: 1.1 },
                Tree { x: 750.0, size: 0.9 },
            ],
            door_open_rate: cfg.door_open_rate,
            enter_threshold: cfg.enter_threshold,
        }
    }

    /// Idempotent: a second purchase leaves the door animation alone
    pub fn buy_ticket(&mut self) -> TicketOutcome {
        if self.has_ticket {
            return TicketOutcome::AlreadyHeld;
        }
        self.has_ticket = true;
        self.door_open = true;
        TicketOutcome::Purchased
    }

    pub fn is_near_ticket_booth(&self, player_x: f32) -> bool {
        self.ticket_booth.is_near(player_x)
    }

    pub fn is_near_entrance(&self, player_x: f32) -> bool {
        self.entrance.is_near(player_x)
    }

    pub fn can_enter(&self) -> bool {
        self.has_ticket && self.door_open_amount > self.enter_threshold
    }
}

impl SceneBehavior for Outside {
    fn world_width(&self) -> f32 {
        self.world_width
    }

    fn update(&mut self, _dt_ms: f32) {
        for cloud in &mut self.clouds {
            cloud.x += cloud.speed;
            if cloud.x > self.world_width + 100.0 {
                cloud.x = -cloud.width;
            }
        }

        if self.door_open && self.door_open_amount < 1.0 {
            self.door_open_amount = (self.door_open_amount + self.door_open_rate).min(1.0);
        }
    }

    fn prompt(&self, player_x: f32) -> Option<Prompt> {
        let near_entrance = self.is_near_entrance(player_x);
        if self.is_near_ticket_booth(player_x) && !self.has_ticket {
            Some(Prompt::Ticket)
        } else if near_entrance && self.has_ticket {
            Some(Prompt::Entrance)
        } else if near_entrance {
            Some(Prompt::Door)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outside() -> Outside {
        Outside::new(&OutsideConfig::default(), 7)
    }

    #[test]
    fn door_stays_shut_without_ticket() {
        let mut o = outside();
        for _ in 0..100 {
            o.update(16.0);
        }
        assert_eq!(o.door_open_amount, 0.0);
        assert!(!o.can_enter());
    }

    #[test]
    fn second_purchase_keeps_animation_progress() {
        let mut o = outside();
        assert_eq!(o.buy_ticket(), TicketOutcome::Purchased);
        for _ in 0..10 {
            o.update(16.0);
        }
        let progress = o.door_open_amount;
        assert_eq!(o.buy_ticket(), TicketOutcome::AlreadyHeld);
        assert!(o.has_ticket);
        assert_eq!(o.door_open_amount, progress);
    }

    #[test]
    fn entrance_opens_after_threshold() {
        let mut o = outside();
        o.buy_ticket();
        let mut ticks = 0;
        while !o.can_enter() {
            o.update(16.0);
            ticks += 1;
            assert!(ticks <= 50);
        }
        assert!(o.door_open_amount > 0.8);
        for _ in 0..100 {
            o.update(16.0);
        }
        assert_eq!(o.door_open_amount, 1.0);
    }

    #[test]
    fn prompts_follow_ticket_state() {
        let mut o = outside();
        assert_eq!(o.prompt(1050.0), Some(Prompt::Ticket));
        assert_eq!(o.prompt(1500.0), Some(Prompt::Door));
        assert_eq!(o.prompt(300.0), None);
        o.buy_ticket();
        assert_eq!(o.prompt(1050.0), None);
        assert_eq!(o.prompt(1500.0), Some(Prompt::Entrance));
    }

    #[test]
    fn clouds_wrap_around() {
        let mut o = outside();
        o.clouds[0].x = o.world_width + 100.0;
        o.update(16.0);
        assert!(o.clouds[0].x < 0.0);
    }
}
