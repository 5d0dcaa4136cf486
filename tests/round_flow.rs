use snake_arena::app::{App, AppState, Clip, Effect};
use snake_arena::config::GameConfig;
use snake_arena::grid::{Cell, Direction};
use snake_arena::input::{InputEvent, Key};
use snake_arena::screens::{GamePhase, Screen};
use snake_arena::sim::{Collision, GameMode, Simulation, TickOutcome};

fn small_config() -> GameConfig {
    GameConfig {
        play_width: 200,
        play_height: 200,
        obstacle_count: 0,
        ..GameConfig::default()
    }
}

/// Walks from the (5,5) start to (0,4) along row 4.
fn walk_to_left_edge(sim: &mut Simulation) {
    assert!(sim.queue_direction(Direction::Up));
    assert_ne!(sim.tick(), TickOutcome::Collided(Collision::Wall));
    assert!(sim.queue_direction(Direction::Left));
    for _ in 0..5 {
        assert!(!matches!(sim.tick(), TickOutcome::Collided(_)));
    }
    assert_eq!(sim.head(), Some(Cell::new(0, 4)));
}

#[test]
fn classic_left_edge_collides() {
    let mut sim = Simulation::new(&small_config(), GameMode::Classic).expect("round");
    walk_to_left_edge(&mut sim);
    let head = sim.head();
    let len = sim.length();
    assert_eq!(sim.tick(), TickOutcome::Collided(Collision::Wall));
    assert_eq!(sim.head(), head);
    assert_eq!(sim.length(), len);
}

#[test]
fn borderless_left_edge_wraps() {
    let mut sim = Simulation::new(&small_config(), GameMode::Borderless).expect("round");
    walk_to_left_edge(&mut sim);
    let outcome = sim.tick();
    assert!(matches!(outcome, TickOutcome::Moved | TickOutcome::AteFood));
    assert_eq!(sim.head(), Some(Cell::new(9, 4)));
}

struct Driver {
    app: App,
    now: f64,
    _dir: tempfile::TempDir,
}

impl Driver {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = GameConfig {
            leaderboard_path: dir.path().join("leaderboard.json"),
            ..GameConfig::default()
        };
        Self {
            app: App::new(config),
            now: 0.0,
            _dir: dir,
        }
    }

    fn send(&mut self, events: &[InputEvent]) -> Vec<Effect> {
        self.now += 1.0;
        self.app.frame(events, self.now).expect("frame")
    }

    fn press(&mut self, key: Key) -> Vec<Effect> {
        self.send(&[InputEvent::KeyDown(key)])
    }
}

#[test]
fn menu_to_leaderboard_through_a_round() {
    let mut d = Driver::new();
    assert_eq!(d.app.state(), AppState::Menu);

    d.press(Key::Enter);
    d.press(Key::Down);
    d.press(Key::Enter);
    assert_eq!(d.app.state(), AppState::Game);
    assert_eq!(d.app.context().mode, GameMode::Obstacles);

    // head straight up into the top wall
    d.press(Key::W);
    let mut effects = Vec::new();
    for _ in 0..100 {
        effects.extend(d.send(&[]));
        if d.app.state() != AppState::Game {
            break;
        }
    }
    assert!(effects.contains(&Effect::PlaySound(Clip::GameOver)));
    assert_eq!(d.app.state(), AppState::EnterName);

    for c in "Bo".chars() {
        d.send(&[InputEvent::Text(c)]);
    }
    d.press(Key::Enter);
    assert_eq!(d.app.state(), AppState::Leaderboard);
    let board = &d.app.context().leaderboard;
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].name, "Bo");

    d.press(Key::Enter);
    assert_eq!(d.app.state(), AppState::Menu);
}

#[test]
fn pause_blocks_steering_until_resume() {
    let mut d = Driver::new();
    d.press(Key::Enter);
    d.press(Key::Enter);
    assert_eq!(d.app.context().mode, GameMode::Classic);

    d.press(Key::Escape);
    assert_eq!(d.app.state(), AppState::Paused);
    d.press(Key::Down);
    d.press(Key::Up);
    d.press(Key::Escape);
    assert_eq!(d.app.state(), AppState::Game);

    let Screen::Game(game) = d.app.screen() else {
        panic!("expected game screen");
    };
    assert!(matches!(game.phase, GamePhase::Playing));
    assert_eq!(game.sim.direction(), Direction::Right);
}

#[test]
fn click_drives_main_menu() {
    let mut d = Driver::new();
    let layout = snake_arena::screens::main_menu_layout(&d.app.context().config);
    let settings = layout.rect(2).center();
    d.send(&[InputEvent::click(settings)]);
    assert_eq!(d.app.state(), AppState::Settings);

    let back = snake_arena::screens::settings_layout(&d.app.context().config, false)
        .rect(2)
        .center();
    d.send(&[InputEvent::click(back)]);
    assert_eq!(d.app.state(), AppState::Menu);
}
