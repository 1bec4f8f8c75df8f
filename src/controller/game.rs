use tracing::{debug, info};

use crate::config::GameConfig;
use crate::controller::input::Command;
use crate::controller::transition::{SwitchScene, Transition, TransitionKind};
use crate::model::scene::TicketOutcome;
use crate::model::{Camera, Intents, ModalKind, Overlay, ParticleSystem, Player, SceneBehavior, SceneId, Scenes};

pub const TICKET_PURCHASED: &str = "🎟️ Ticket purchased! The museum doors open...";
pub const TICKET_ALREADY_HELD: &str = "You already have a ticket!";
pub const TICKET_REQUIRED: &str = "You need a ticket to enter.";
pub const CHAINS_WEAKEN: &str = "The chains rattle and weaken...";
pub const CHAINS_ALMOST_BROKEN: &str = "The chains are almost broken...";
pub const CHAINS_SHATTER: &str = "The chains shatter! The way is open...";

/// What a single interact press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Nothing,
    SkippedCaption,
    ClosedModal(ModalKind),
    OpenedModal(ModalKind),
    TicketPurchased,
    TicketAlreadyHeld,
    TicketRequired,
    ChainBroken { remaining: u32 },
    TransitionStarted(TransitionKind),
}

/// Owning context for one play session: scenes, player, camera, overlays
pub struct Game {
    pub cfg: GameConfig,
    pub scene: SceneId,
    pub scenes: Scenes,
    pub player: Player,
    pub camera: Camera,
    pub particles: ParticleSystem,
    pub overlay: Overlay,
    pub transition: Transition,
    pub started: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Game {
    pub fn new(cfg: GameConfig, viewport_width: f32, viewport_height: f32) -> Self {
        let scenes = Scenes::new(&cfg);
        let base_y = viewport_height * cfg.viewport.floor_ratio - cfg.player.height;

        let start = cfg.transitions.start;
        let mut player = Player::new(cfg.player.clone(), start.x, base_y);
        player.apply_placement(&start);

        let particles = ParticleSystem::new(
            &cfg.particles,
            viewport_width,
            viewport_height,
            scenes.outside.world_width,
        );

        Self {
            scene: SceneId::Outside,
            scenes,
            player,
            camera: Camera::new(&cfg.camera),
            particles,
            overlay: Overlay::new(cfg.ui.clone()),
            transition: Transition::new(cfg.transitions.fade_ms),
            started: false,
            viewport_width,
            viewport_height,
            cfg,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn world_width(&self) -> f32 {
        self.scenes.get(self.scene).world_width()
    }

    pub fn player_x(&self) -> f32 {
        self.player.world_x()
    }

    pub fn camera_x(&self) -> f32 {
        self.camera.x
    }

    /// Dismiss the title card
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.overlay.hide_title();
            info!("walk-through started");
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.particles.resize(width, height);
        self.player
            .set_base_y(height * self.cfg.viewport.floor_ratio - self.player.height());
    }

    pub fn handle_command(&mut self, command: Command) -> Interaction {
        match command {
            Command::Start => {
                self.start();
                Interaction::Nothing
            }
            Command::Interact => self.interact(),
            Command::TouchInteract => {
                if self.is_transitioning() {
                    return Interaction::Nothing;
                }
                for kind in [ModalKind::Valentine, ModalKind::Video] {
                    if self.overlay.is_open(kind) {
                        self.overlay.close(kind);
                        return Interaction::ClosedModal(kind);
                    }
                }
                self.interact()
            }
            Command::Escape => {
                self.overlay.close_all();
                Interaction::Nothing
            }
        }
    }

    /// One discrete interact press
    pub fn interact(&mut self) -> Interaction {
        if !self.started || self.is_transitioning() {
            return Interaction::Nothing;
        }
        // Scratch card and video only close through escape or their buttons
        if self.overlay.is_open(ModalKind::Valentine) || self.overlay.is_open(ModalKind::Video) {
            return Interaction::Nothing;
        }

        if self.overlay.is_open(ModalKind::Picture) {
            if self.overlay.skip_typewriter() {
                return Interaction::SkippedCaption;
            }
            self.overlay.close(ModalKind::Picture);
            return Interaction::ClosedModal(ModalKind::Picture);
        }
        if self.overlay.is_open(ModalKind::Welcome) {
            self.overlay.close(ModalKind::Welcome);
            return Interaction::ClosedModal(ModalKind::Welcome);
        }
        if self.overlay.is_any_open() {
            return Interaction::Nothing;
        }

        let outcome = match self.scene {
            SceneId::Outside => self.interact_outside(),
            SceneId::Museum => self.interact_museum(),
            SceneId::SecretRoom => self.interact_secret_room(),
        };
        if outcome == Interaction::Nothing {
            debug!(scene = self.scene.label(), x = self.player_x(), "nothing to interact with");
        }
        outcome
    }

    fn interact_outside(&mut self) -> Interaction {
        let x = self.player.world_x();
        let outside = &mut self.scenes.outside;

        if outside.is_near_ticket_booth(x) {
            return match outside.buy_ticket() {
                TicketOutcome::Purchased => {
                    info!("ticket purchased");
                    self.overlay.show_feedback(TICKET_PURCHASED);
                    Interaction::TicketPurchased
                }
                TicketOutcome::AlreadyHeld => {
                    self.overlay.show_feedback(TICKET_ALREADY_HELD);
                    Interaction::TicketAlreadyHeld
                }
            };
        }

        if outside.is_near_entrance(x) {
            if outside.can_enter() {
                return self.begin_transition(TransitionKind::OutsideToMuseum);
            }
            if !outside.has_ticket {
                self.overlay.show_feedback(TICKET_REQUIRED);
                return Interaction::TicketRequired;
            }
        }
        Interaction::Nothing
    }

    fn interact_museum(&mut self) -> Interaction {
        let x = self.player.world_x();
        let museum = &mut self.scenes.museum;

        if museum.is_near_welcome_booth(x) {
            self.overlay.open_welcome();
            return Interaction::OpenedModal(ModalKind::Welcome);
        }
        if museum.is_near_valentine_booth(x) {
            self.overlay.open_valentine();
            return Interaction::OpenedModal(ModalKind::Valentine);
        }
        if museum.is_near_secret_door(x) {
            return match museum.break_chain() {
                Some(remaining) => {
                    info!(remaining, "chain broken");
                    let text = match remaining {
                        2 => Some(CHAINS_WEAKEN),
                        1 => Some(CHAINS_ALMOST_BROKEN),
                        0 => Some(CHAINS_SHATTER),
                        _ => None,
                    };
                    if let Some(text) = text {
                        self.overlay.show_feedback(text);
                    }
                    Interaction::ChainBroken { remaining }
                }
                None => self.begin_transition(TransitionKind::MuseumToSecretRoom),
            };
        }
        if let Some(picture) = museum.nearby_picture(x) {
            self.overlay.open_picture(picture);
            return Interaction::OpenedModal(ModalKind::Picture);
        }
        Interaction::Nothing
    }

    fn interact_secret_room(&mut self) -> Interaction {
        let x = self.player.world_x();
        let room = &self.scenes.secret_room;

        if room.is_near_exit(x) {
            return self.begin_transition(TransitionKind::SecretRoomToMuseum);
        }
        match room.nearby_picture(x) {
            Some(picture) if picture.video_path.is_some() => {
                self.overlay.open_video(picture.video_path);
                Interaction::OpenedModal(ModalKind::Video)
            }
            Some(picture) => {
                self.overlay.open_picture(picture);
                Interaction::OpenedModal(ModalKind::Picture)
            }
            None => Interaction::Nothing,
        }
    }

    /// Start a scene change; ignored while one is already running
    pub fn request_transition(&mut self, kind: TransitionKind) -> bool {
        if !self.transition.begin(kind) {
            debug!(?kind, "transition already in progress, request ignored");
            return false;
        }
        self.overlay.hide_all_prompts();
        info!(?kind, "transition started");
        true
    }

    fn begin_transition(&mut self, kind: TransitionKind) -> Interaction {
        if self.request_transition(kind) {
            Interaction::TransitionStarted(kind)
        } else {
            Interaction::Nothing
        }
    }

    /// Applied once, at full black
    fn switch_scene(&mut self, kind: TransitionKind) {
        let placements = &self.cfg.transitions;
        match kind {
            TransitionKind::OutsideToMuseum => {
                self.scene = SceneId::Museum;
                self.player.apply_placement(&placements.museum_from_outside);
                self.camera.snap_to(0.0);
            }
            TransitionKind::MuseumToSecretRoom => {
                self.scene = SceneId::SecretRoom;
                self.player.apply_placement(&placements.secret_room_entry);
                self.camera.snap_to(0.0);
            }
            TransitionKind::SecretRoomToMuseum => {
                self.scene = SceneId::Museum;
                let back = placements.museum_from_secret_room;
                let x = self.scenes.museum.secret_door.landmark.x + back.x;
                self.player.place(x, back.world_min, back.world_max);
                let world_width = self.scenes.museum.world_width;
                // Clamped target, so the return does not open on an ease-in from past the wall
                self.camera.snap_to_target(x, world_width, self.viewport_width);
            }
        }
        self.particles.world_width = self.world_width();
        info!(scene = self.scene.label(), x = self.player_x(), "entered scene");
    }

    /// One frame. `dt_ms` drives timers; movement is per tick.
    pub fn update(&mut self, dt_ms: f32, intents: &Intents) {
        self.overlay.tick(dt_ms);
        if !self.started {
            return;
        }

        if self.transition.is_active() {
            if let Some(SwitchScene(kind)) = self.transition.advance(dt_ms) {
                self.switch_scene(kind);
            }
            self.overlay.fade = self.transition.fade_level();
            return;
        }
        self.overlay.fade = 0.0;

        if self.overlay.is_any_open() {
            return;
        }

        self.player.update(intents);
        let world_width = self.world_width();
        self.camera.follow(self.player.world_x(), world_width, self.viewport_width);

        self.scenes.get_mut(self.scene).update(dt_ms);
        if self.scene.has_particles() {
            self.particles.update(dt_ms, self.camera.x);
        }

        let prompt = self.scenes.get(self.scene).prompt(self.player.world_x());
        self.overlay.hide_all_prompts();
        if let Some(prompt) = prompt {
            self.overlay.show_prompt(prompt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prompt;

    const DT: f32 = 16.0;

    fn game() -> Game {
        let mut g = Game::new(GameConfig::default(), 1200.0, 675.0);
        g.start();
        g
    }

    fn idle(g: &mut Game, frames: usize) {
        for _ in 0..frames {
            g.update(DT, &Intents::default());
        }
    }

    fn finish_transition(g: &mut Game) {
        let mut frames = 0;
        while g.is_transitioning() {
            g.update(DT, &Intents::default());
            frames += 1;
            assert!(frames < 500);
        }
    }

    fn enter_museum(g: &mut Game) {
        g.player.pos.x = 1050.0;
        g.interact();
        idle(g, 60);
        g.player.pos.x = 1500.0;
        assert_eq!(g.interact(), Interaction::TransitionStarted(TransitionKind::OutsideToMuseum));
        finish_transition(g);
    }

    #[test]
    fn starts_outside_with_start_bounds() {
        let g = Game::new(GameConfig::default(), 1200.0, 675.0);
        assert_eq!(g.scene, SceneId::Outside);
        assert_eq!(g.player_x(), 180.0);
        assert_eq!((g.player.world_min, g.player.world_max), (50.0, 1700.0));
        assert_eq!(g.particles.world_width, 1800.0);
        assert!(g.overlay.title_visible);
    }

    #[test]
    fn nothing_moves_before_start() {
        let mut g = Game::new(GameConfig::default(), 1200.0, 675.0);
        let right = Intents { right: true, ..Intents::default() };
        g.update(DT, &right);
        assert_eq!(g.player_x(), 180.0);
        assert_eq!(g.interact(), Interaction::Nothing);
    }

    #[test]
    fn ticket_booth_beats_entrance_and_is_idempotent() {
        let mut g = game();
        g.player.pos.x = 1050.0;
        assert_eq!(g.interact(), Interaction::TicketPurchased);
        idle(&mut g, 5);
        let progress = g.scenes.outside.door_open_amount;
        assert_eq!(g.interact(), Interaction::TicketAlreadyHeld);
        assert!(g.scenes.outside.has_ticket);
        assert_eq!(g.scenes.outside.door_open_amount, progress);
        assert_eq!(g.overlay.feedback.as_ref().map(|f| f.text.as_str()), Some(TICKET_ALREADY_HELD));
    }

    #[test]
    fn entrance_without_ticket_gives_feedback() {
        let mut g = game();
        g.player.pos.x = 1500.0;
        assert_eq!(g.interact(), Interaction::TicketRequired);
        assert_eq!(g.scene, SceneId::Outside);
    }

    #[test]
    fn entrance_waits_for_door_animation() {
        let mut g = game();
        g.player.pos.x = 1050.0;
        g.interact();
        g.player.pos.x = 1500.0;
        assert_eq!(g.interact(), Interaction::Nothing);
        assert!(!g.is_transitioning());

        let mut frames = 0;
        while !g.scenes.outside.can_enter() {
            idle(&mut g, 1);
            frames += 1;
            assert!(frames <= 50);
            assert_eq!(g.interact(), if g.scenes.outside.can_enter() {
                Interaction::TransitionStarted(TransitionKind::OutsideToMuseum)
            } else {
                Interaction::Nothing
            });
        }
        finish_transition(&mut g);
        assert_eq!(g.scene, SceneId::Museum);
    }

    #[test]
    fn outside_to_museum_resets_player_and_camera() {
        let mut g = game();
        enter_museum(&mut g);
        assert_eq!(g.scene, SceneId::Museum);
        assert_eq!(g.player_x(), 180.0);
        assert_eq!((g.player.world_min, g.player.world_max), (50.0, 5000.0));
        assert_eq!(g.camera_x(), 0.0);
        assert_eq!(g.particles.world_width, 5200.0);
        assert_eq!(g.overlay.fade, 0.0);
    }

    #[test]
    fn second_transition_request_changes_nothing() {
        let mut g = game();
        g.player.pos.x = 1050.0;
        g.interact();
        idle(&mut g, 60);
        g.player.pos.x = 1500.0;
        g.interact();

        idle(&mut g, 10);
        assert!(!g.request_transition(TransitionKind::MuseumToSecretRoom));
        // keep pressing interact mid-fade as well
        assert_eq!(g.interact(), Interaction::Nothing);
        idle(&mut g, 45);
        assert!(!g.request_transition(TransitionKind::SecretRoomToMuseum));

        finish_transition(&mut g);
        assert_eq!(g.scene, SceneId::Museum);
        assert_eq!(g.player_x(), 180.0);
        assert_eq!((g.player.world_min, g.player.world_max), (50.0, 5000.0));
    }

    #[test]
    fn player_frozen_during_transition() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 4900.0;
        for _ in 0..3 {
            g.interact();
        }
        g.interact();
        assert!(g.is_transitioning());
        let right = Intents { right: true, ..Intents::default() };
        g.update(DT, &right);
        assert_eq!(g.player_x(), 4900.0);
    }

    #[test]
    fn chains_then_secret_room() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 4900.0;

        assert_eq!(g.interact(), Interaction::ChainBroken { remaining: 2 });
        assert_eq!(g.overlay.feedback.as_ref().unwrap().text, CHAINS_WEAKEN);
        assert_eq!(g.interact(), Interaction::ChainBroken { remaining: 1 });
        assert_eq!(g.overlay.feedback.as_ref().unwrap().text, CHAINS_ALMOST_BROKEN);
        assert!(!g.scenes.museum.is_door_broken());
        assert_eq!(g.interact(), Interaction::ChainBroken { remaining: 0 });
        assert_eq!(g.overlay.feedback.as_ref().unwrap().text, CHAINS_SHATTER);
        assert!(g.scenes.museum.is_door_broken());

        assert_eq!(g.interact(), Interaction::TransitionStarted(TransitionKind::MuseumToSecretRoom));
        assert_eq!(g.scenes.museum.secret_door.chains_remaining, 0);
        finish_transition(&mut g);

        assert_eq!(g.scene, SceneId::SecretRoom);
        assert_eq!(g.player_x(), 200.0);
        assert_eq!((g.player.world_min, g.player.world_max), (50.0, 4400.0));
        assert_eq!(g.particles.world_width, 4500.0);
    }

    #[test]
    fn secret_room_exit_returns_before_the_door() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 4900.0;
        for _ in 0..4 {
            g.interact();
        }
        finish_transition(&mut g);

        g.player.pos.x = 100.0;
        assert_eq!(g.interact(), Interaction::TransitionStarted(TransitionKind::SecretRoomToMuseum));
        finish_transition(&mut g);

        assert_eq!(g.scene, SceneId::Museum);
        assert_eq!(g.player_x(), 4850.0);
        assert_eq!((g.player.world_min, g.player.world_max), (50.0, 5000.0));
        assert_eq!(g.camera_x(), 4000.0);
        assert!(g.scenes.museum.is_door_broken());
    }

    #[test]
    fn museum_booths_open_modals_and_pause_gameplay() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 120.0;
        assert_eq!(g.interact(), Interaction::OpenedModal(ModalKind::Welcome));

        let right = Intents { right: true, ..Intents::default() };
        g.update(DT, &right);
        assert_eq!(g.player_x(), 120.0);

        assert_eq!(g.interact(), Interaction::ClosedModal(ModalKind::Welcome));
        g.update(DT, &right);
        assert!(g.player_x() > 120.0);

        g.player.pos.x = 4550.0;
        assert_eq!(g.interact(), Interaction::OpenedModal(ModalKind::Valentine));
        // interact key does not close the scratch card
        assert_eq!(g.interact(), Interaction::Nothing);
        assert_eq!(g.handle_command(Command::TouchInteract), Interaction::ClosedModal(ModalKind::Valentine));
    }

    #[test]
    fn picture_interact_skips_then_closes() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 1050.0;
        assert_eq!(g.interact(), Interaction::OpenedModal(ModalKind::Picture));
        assert_eq!(g.interact(), Interaction::SkippedCaption);
        assert_eq!(g.interact(), Interaction::ClosedModal(ModalKind::Picture));
        assert!(!g.overlay.is_any_open());
    }

    #[test]
    fn interact_leaves_video_and_picture_alone() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 550.0;
        assert_eq!(g.interact(), Interaction::OpenedModal(ModalKind::Picture));
        assert!(g.overlay.play_current_video());

        assert_eq!(g.interact(), Interaction::Nothing);
        assert_eq!(g.interact(), Interaction::Nothing);
        assert!(g.overlay.is_open(ModalKind::Picture));
        assert!(g.overlay.is_open(ModalKind::Video));
        assert!(g.overlay.picture.as_ref().is_some_and(|view| view.is_typing()));

        assert_eq!(g.handle_command(Command::TouchInteract), Interaction::ClosedModal(ModalKind::Video));
        assert_eq!(g.interact(), Interaction::SkippedCaption);
        assert_eq!(g.interact(), Interaction::ClosedModal(ModalKind::Picture));
    }

    #[test]
    fn secret_pictures_play_video_directly() {
        let mut g = game();
        enter_museum(&mut g);
        g.player.pos.x = 4900.0;
        for _ in 0..4 {
            g.interact();
        }
        finish_transition(&mut g);
        g.player.pos.x = 1600.0;
        assert_eq!(g.interact(), Interaction::OpenedModal(ModalKind::Video));
        assert_eq!(g.overlay.video, Some("videos/s4.mp4"));
        g.handle_command(Command::Escape);
        assert!(!g.overlay.is_any_open());
    }

    #[test]
    fn prompts_refresh_each_tick() {
        let mut g = game();
        g.player.pos.x = 1050.0;
        idle(&mut g, 1);
        assert_eq!(g.overlay.prompt, Some(Prompt::Ticket));
        g.player.pos.x = 1500.0;
        idle(&mut g, 1);
        assert_eq!(g.overlay.prompt, Some(Prompt::Door));
        g.player.pos.x = 400.0;
        idle(&mut g, 1);
        assert_eq!(g.overlay.prompt, None);
    }

    #[test]
    fn transition_hides_prompts_and_fades() {
        let mut g = game();
        g.player.pos.x = 1050.0;
        g.interact();
        idle(&mut g, 60);
        g.player.pos.x = 1500.0;
        idle(&mut g, 1);
        assert_eq!(g.overlay.prompt, Some(Prompt::Entrance));
        g.interact();
        assert_eq!(g.overlay.prompt, None);
        idle(&mut g, 25);
        assert!(g.overlay.fade > 0.0 && g.overlay.fade < 1.0);
    }

    #[test]
    fn resize_moves_floor_line() {
        let mut g = game();
        g.resize(800.0, 450.0);
        assert_eq!(g.player.base_y, 450.0 * 0.75 - 52.0);
        assert_eq!(g.player.pos.y, g.player.base_y);
    }
}
