use memory_museum::controller::{Command, Interaction, TransitionKind};
use memory_museum::model::{Intents, ModalKind, Prompt, SceneId};
use memory_museum::{Game, GameConfig};

const DT: f32 = 16.0;

fn new_game(cfg: GameConfig) -> Game {
    let mut game = Game::new(cfg, 1200.0, 675.0);
    game.handle_command(Command::Start);
    game
}

fn hold(game: &mut Game, intents: Intents, frames: usize) {
    for _ in 0..frames {
        game.update(DT, &intents);
    }
}

fn walk_to(game: &mut Game, target: f32) {
    for _ in 0..5000 {
        let dx = target - game.player_x();
        if dx.abs() < 25.0 {
            break;
        }
        game.update(DT, &Intents { left: dx < 0.0, right: dx > 0.0, ..Intents::default() });
    }
    for _ in 0..200 {
        if game.player.vel.x == 0.0 {
            break;
        }
        game.update(DT, &Intents::default());
    }
}

fn settle(game: &mut Game) {
    for _ in 0..500 {
        if !game.is_transitioning() {
            return;
        }
        game.update(DT, &Intents::default());
    }
    panic!("transition never finished");
}

#[test]
fn outside_to_museum_end_to_end() {
    let mut game = new_game(GameConfig::default());
    assert!(!game.overlay.title_visible);

    walk_to(&mut game, 1050.0);
    assert_eq!(game.overlay.prompt, Some(Prompt::Ticket));
    assert_eq!(game.interact(), Interaction::TicketPurchased);
    assert!(game.scenes.outside.has_ticket);

    walk_to(&mut game, 1500.0);
    hold(&mut game, Intents::default(), 45);
    assert!(game.scenes.outside.can_enter());
    assert_eq!(game.interact(), Interaction::TransitionStarted(TransitionKind::OutsideToMuseum));

    // input is frozen through the fade
    let before = game.player_x();
    hold(&mut game, Intents { left: true, ..Intents::default() }, 10);
    assert_eq!(game.player_x(), before);

    settle(&mut game);
    assert_eq!(game.scene, SceneId::Museum);
    assert_eq!(game.player_x(), 180.0);
    assert_eq!((game.player.world_min, game.player.world_max), (50.0, 5000.0));
    assert_eq!(game.camera_x(), 0.0);
}

#[test]
fn walking_never_leaves_the_world() {
    let mut game = new_game(GameConfig::default());
    hold(&mut game, Intents { left: true, sprint: true, ..Intents::default() }, 300);
    assert_eq!(game.player_x(), 50.0);
    hold(&mut game, Intents { right: true, sprint: true, jump: true, ..Intents::default() }, 600);
    assert_eq!(game.player_x(), 1700.0);
    assert!(game.camera_x() <= 1800.0 - 1200.0);
}

#[test]
fn full_loop_through_the_secret_room() {
    let mut game = new_game(GameConfig::default());
    walk_to(&mut game, 1050.0);
    game.interact();
    walk_to(&mut game, 1500.0);
    hold(&mut game, Intents::default(), 45);
    game.interact();
    settle(&mut game);

    walk_to(&mut game, 4900.0);
    assert_eq!(game.overlay.prompt, Some(Prompt::Door));
    let remaining: Vec<_> = (0..3).map(|_| game.interact()).collect();
    assert_eq!(
        remaining,
        vec![
            Interaction::ChainBroken { remaining: 2 },
            Interaction::ChainBroken { remaining: 1 },
            Interaction::ChainBroken { remaining: 0 },
        ]
    );
    assert_eq!(game.interact(), Interaction::TransitionStarted(TransitionKind::MuseumToSecretRoom));
    settle(&mut game);
    assert_eq!(game.scene, SceneId::SecretRoom);
    assert_eq!(game.player_x(), 200.0);

    walk_to(&mut game, 100.0);
    assert_eq!(game.overlay.prompt, Some(Prompt::Exit));
    game.interact();
    settle(&mut game);
    assert_eq!(game.scene, SceneId::Museum);
    assert_eq!(game.player_x(), 4850.0);

    // door stays open for a second trip
    assert_eq!(game.interact(), Interaction::TransitionStarted(TransitionKind::MuseumToSecretRoom));
}

#[test]
fn escape_closes_whatever_is_open() {
    let mut game = new_game(GameConfig::default());
    walk_to(&mut game, 1050.0);
    game.interact();
    walk_to(&mut game, 1500.0);
    hold(&mut game, Intents::default(), 45);
    game.interact();
    settle(&mut game);

    walk_to(&mut game, 550.0);
    assert_eq!(game.interact(), Interaction::OpenedModal(ModalKind::Picture));
    assert!(game.overlay.play_current_video());
    assert!(game.overlay.is_open(ModalKind::Video));

    game.handle_command(Command::Escape);
    assert!(!game.overlay.is_any_open());
}

#[test]
fn config_overrides_change_the_layout() {
    let cfg = GameConfig::from_ron_str("(outside: (ticket_booth_x: 600.0), museum: (chains: 1))").unwrap();
    let mut game = new_game(cfg);
    walk_to(&mut game, 600.0);
    assert_eq!(game.interact(), Interaction::TicketPurchased);

    walk_to(&mut game, 1500.0);
    hold(&mut game, Intents::default(), 45);
    game.interact();
    settle(&mut game);

    walk_to(&mut game, 4900.0);
    assert_eq!(game.interact(), Interaction::ChainBroken { remaining: 0 });
    assert!(game.scenes.museum.is_door_broken());
}
