//! Headless walk-through: drives the whole museum at a fixed 60 Hz step
//! with no browser, logging every step. Useful for checking a config file.
//!
//! Usage: `memory-museum [config.ron]`

use std::env;
use std::process::ExitCode;

use tracing::{error, info};

use memory_museum::controller::{Command, Interaction, TransitionKind};
use memory_museum::model::{Intents, ModalKind, SceneId};
use memory_museum::{logging, Game, GameConfig};

const DT_MS: f32 = 1000.0 / 60.0;
const FRAME_LIMIT: u32 = 10_000;

type StepResult = Result<(), String>;

struct Walkthrough {
    game: Game,
    frames: u32,
}

impl Walkthrough {
    fn new(cfg: GameConfig) -> Self {
        let (width, height) = cfg.viewport.fit(1240.0);
        let mut game = Game::new(cfg, width, height);
        game.start();
        Self { game, frames: 0 }
    }

    fn tick(&mut self, intents: Intents) -> StepResult {
        self.game.update(DT_MS, &intents);
        self.frames += 1;
        if self.frames > FRAME_LIMIT {
            return Err(format!("gave up after {FRAME_LIMIT} frames"));
        }
        Ok(())
    }

    /// Walk until within `slack` of `target`, then coast to a stop
    fn walk_to(&mut self, target: f32, slack: f32) -> StepResult {
        loop {
            let dx = target - self.game.player_x();
            if dx.abs() < slack {
                break;
            }
            self.tick(Intents { left: dx < 0.0, right: dx > 0.0, ..Intents::default() })?;
        }
        while self.game.player.vel.x != 0.0 {
            self.tick(Intents::default())?;
        }
        info!(x = self.game.player_x(), target, "arrived");
        Ok(())
    }

    fn idle(&mut self, frames: u32) -> StepResult {
        (0..frames).try_for_each(|_| self.tick(Intents::default()))
    }

    fn expect_interaction(&mut self, expected: Interaction) -> StepResult {
        let got = self.game.interact();
        if got != expected {
            return Err(format!("expected {expected:?}, got {got:?} at x={}", self.game.player_x()));
        }
        Ok(())
    }

    fn finish_transition(&mut self, into: SceneId) -> StepResult {
        while self.game.is_transitioning() {
            self.tick(Intents::default())?;
        }
        if self.game.scene != into {
            return Err(format!("ended up in {} instead of {}", self.game.scene.label(), into.label()));
        }
        info!(scene = into.label(), x = self.game.player_x(), camera = self.game.camera_x(), "arrived in scene");
        Ok(())
    }

    fn run(&mut self) -> StepResult {
        let cfg = self.game.cfg.clone();

        // Outside: buy a ticket, wait for the doors, go in
        self.walk_to(cfg.outside.ticket_booth_x, 30.0)?;
        self.expect_interaction(Interaction::TicketPurchased)?;
        self.walk_to(cfg.outside.entrance_x, 30.0)?;
        while !self.game.scenes.outside.can_enter() {
            self.tick(Intents::default())?;
        }
        self.expect_interaction(Interaction::TransitionStarted(TransitionKind::OutsideToMuseum))?;
        self.finish_transition(SceneId::Museum)?;

        // Museum: read the welcome card, look at the first picture
        self.walk_to(cfg.museum.welcome_booth_x, 30.0)?;
        self.expect_interaction(Interaction::OpenedModal(ModalKind::Welcome))?;
        self.idle(30)?;
        self.game.interact();

        if let Some(first) = self.game.scenes.museum.pictures.first() {
            self.walk_to(first.x, 30.0)?;
            self.expect_interaction(Interaction::OpenedModal(ModalKind::Picture))?;
            self.idle(60)?;
            self.game.handle_command(Command::Escape);
        }

        // Break the chains and go downstairs
        self.walk_to(cfg.museum.secret_door_x, 30.0)?;
        for remaining in (0..cfg.museum.chains).rev() {
            self.expect_interaction(Interaction::ChainBroken { remaining })?;
            self.idle(10)?;
        }
        self.expect_interaction(Interaction::TransitionStarted(TransitionKind::MuseumToSecretRoom))?;
        self.finish_transition(SceneId::SecretRoom)?;

        // Secret room: straight back up
        self.walk_to(cfg.secret_room.exit_x, 30.0)?;
        self.expect_interaction(Interaction::TransitionStarted(TransitionKind::SecretRoomToMuseum))?;
        self.finish_transition(SceneId::Museum)?;
        Ok(())
    }
}

fn main() -> ExitCode {
    logging::init();

    let cfg = match env::args().nth(1) {
        Some(path) => match GameConfig::load_from_file(&path) {
            Ok(cfg) => {
                info!(path = %path, "loaded config");
                cfg
            }
            Err(err) => {
                error!(path = %path, %err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut walkthrough = Walkthrough::new(cfg);
    match walkthrough.run() {
        Ok(()) => {
            info!(
                frames = walkthrough.frames,
                seconds = walkthrough.frames as f32 / 60.0,
                "walk-through complete"
            );
            ExitCode::SUCCESS
        }
        Err(reason) => {
            error!(frames = walkthrough.frames, %reason, "walk-through failed");
            ExitCode::FAILURE
        }
    }
}
