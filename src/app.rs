use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::InputEvent;
use crate::leaderboard::{Entry, LeaderboardStore};
use crate::screens::{GamePhase, Screen, Transition};
use crate::sim::GameMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Clip {
    Eat,
    GameOver,
}

/// Requests for the presentation layer produced by one frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    PlaySound(Clip),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    Menu,
    SelectMode,
    Game,
    Paused,
    Leaderboard,
    Settings,
    EnterName,
}

/// Process-wide sound level in [0, 1]. Lives only as long as the process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Volume {
    level: f32,
    unmuted: f32,
}

impl Volume {
    pub fn new(level: f32) -> Self {
        let level = round_tenth(level.clamp(0.0, 1.0));
        Self {
            level,
            unmuted: if level > 0.0 { level } else { 1.0 },
        }
    }

    pub fn level(self) -> f32 {
        self.level
    }

    pub fn adjust(&mut self, delta: f32) {
        self.level = round_tenth((self.level + delta).clamp(0.0, 1.0));
        if self.level > 0.0 {
            self.unmuted = self.level;
        }
        tracing::debug!(volume = self.level, "volume changed");
    }

    /// Mutes, or restores the last audible level.
    pub fn toggle_mute(&mut self) {
        self.level = if self.level > 0.0 { 0.0 } else { self.unmuted };
        tracing::debug!(volume = self.level, "mute toggled");
    }
}

fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Everything the screens share: config, leaderboard, volume and the chosen
/// mode. Owned by [`App`] and lent to the active screen.
pub struct AppContext {
    pub config: GameConfig,
    pub store: LeaderboardStore,
    /// Last loaded leaderboard, best first.
    pub leaderboard: Vec<Entry>,
    pub volume: Volume,
    pub mode: GameMode,
}

impl AppContext {
    pub fn new(config: GameConfig) -> Self {
        let store = LeaderboardStore::from_config(&config);
        let leaderboard = store.load();
        let volume = Volume::new(config.initial_volume);
        Self {
            config,
            store,
            leaderboard,
            volume,
            mode: GameMode::Classic,
        }
    }

    pub fn refresh_leaderboard(&mut self) {
        self.leaderboard = self.store.load();
    }

    pub fn top_score(&self) -> u32 {
        self.leaderboard.first().map(|e| e.score).unwrap_or(0)
    }
}

/// Seed for the shared `macroquad::rand` generator, taken from the wall clock
/// so every launch rolls different obstacles and food.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Fixed-rate pacing on top of the host's frame clock.
#[derive(Clone, Debug, Default)]
pub struct Cadence {
    last: Option<f64>,
}

impl Cadence {
    /// True when at least `1 / rate` seconds passed since the last due tick.
    /// The very first call is always due. Due ticks advance by whole
    /// intervals so the rate holds regardless of the host frame rate; a clock
    /// more than one interval behind re-anchors on `now`.
    pub fn due(&mut self, now: f64, rate: f32) -> bool {
        let interval = 1.0 / rate.max(f32::EPSILON) as f64;
        match self.last {
            None => {
                self.last = Some(now);
                true
            }
            Some(last) if now - last < interval => false,
            Some(last) => {
                let next = last + interval;
                self.last = Some(if now - next >= interval { now } else { next });
                true
            }
        }
    }
}

/// The screen state machine. Each host frame feeds it the polled input; on
/// every due tick it drains the queued events into the active screen, then
/// lets that screen update.
pub struct App {
    ctx: AppContext,
    screen: Screen,
    cadence: Cadence,
    queue: Vec<InputEvent>,
    running: bool,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let ctx = AppContext::new(config);
        tracing::info!(
            top_score = ctx.top_score(),
            entries = ctx.leaderboard.len(),
            "starting at main menu"
        );
        Self {
            ctx,
            screen: Screen::menu(),
            cadence: Cadence::default(),
            queue: Vec::new(),
            running: true,
        }
    }

    pub fn frame(&mut self, events: &[InputEvent], now: f64) -> Result<Vec<Effect>, GameError> {
        let mut effects = Vec::new();
        if !self.running {
            return Ok(effects);
        }
        self.queue.extend_from_slice(events);
        if !self.cadence.due(now, self.tick_rate()) {
            return Ok(effects);
        }

        let pending = std::mem::take(&mut self.queue);
        let mut switched = false;
        for event in &pending {
            let transition = if *event == InputEvent::Quit {
                Transition::Quit
            } else {
                self.screen.handle(&mut self.ctx, event)?
            };
            switched |= matches!(transition, Transition::To(_));
            if self.apply(transition, &mut effects) {
                return Ok(effects);
            }
        }

        // a screen entered this tick starts updating on the next one
        if !switched {
            let transition = self.screen.update(&mut self.ctx, &mut effects);
            self.apply(transition, &mut effects);
        }
        Ok(effects)
    }

    /// Returns true once the application has stopped.
    fn apply(&mut self, transition: Transition, effects: &mut Vec<Effect>) -> bool {
        match transition {
            Transition::Stay => {}
            Transition::To(next) => {
                let from = self.state();
                self.screen = next;
                tracing::info!(?from, to = ?self.state(), "screen changed");
            }
            Transition::Quit => {
                tracing::info!(from = ?self.state(), "quit requested");
                self.running = false;
                effects.push(Effect::Quit);
            }
        }
        !self.running
    }

    pub fn state(&self) -> AppState {
        match &self.screen {
            Screen::Menu(_) => AppState::Menu,
            Screen::SelectMode(_) => AppState::SelectMode,
            Screen::Game(game) => match &game.phase {
                GamePhase::Paused(pause) if pause.settings.is_some() => AppState::Settings,
                GamePhase::Paused(_) => AppState::Paused,
                GamePhase::Playing | GamePhase::Over => AppState::Game,
            },
            Screen::Leaderboard(_) => AppState::Leaderboard,
            Screen::Settings(_) => AppState::Settings,
            Screen::EnterName(_) => AppState::EnterName,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn tick_rate(&self) -> f32 {
        self.screen.tick_rate(&self.ctx.config)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    struct Harness {
        app: App,
        now: f64,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new(config: GameConfig) -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let config = GameConfig {
                leaderboard_path: dir.path().join("leaderboard.json"),
                ..config
            };
            Self {
                app: App::new(config),
                now: 0.0,
                _dir: dir,
            }
        }

        fn with_board(entries: &[Entry]) -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let path = dir.path().join("leaderboard.json");
            std::fs::write(&path, serde_json::to_string(entries).expect("json")).expect("write");
            let config = GameConfig {
                leaderboard_path: path,
                ..GameConfig::default()
            };
            Self {
                app: App::new(config),
                now: 0.0,
                _dir: dir,
            }
        }

        /// One due tick with the given input.
        fn step(&mut self, events: &[InputEvent]) -> Vec<Effect> {
            self.now += 10.0;
            self.app.frame(events, self.now).expect("frame")
        }

        fn keys(&mut self, keys: &[Key]) -> Vec<Effect> {
            let events: Vec<InputEvent> = keys.iter().map(|k| InputEvent::KeyDown(*k)).collect();
            self.step(&events)
        }

        fn start(&mut self, mode_index: usize) {
            self.keys(&[Key::Enter]);
            assert_eq!(self.app.state(), AppState::SelectMode);
            let mut keys = vec![Key::Down; mode_index];
            keys.push(Key::Enter);
            self.keys(&keys);
            assert_eq!(self.app.state(), AppState::Game);
        }

        /// Ticks with no input until the round ends.
        fn play_out(&mut self) -> Vec<Effect> {
            let mut all = Vec::new();
            for _ in 0..200 {
                all.extend(self.step(&[]));
                if self.app.state() != AppState::Game || self.game_over() {
                    return all;
                }
            }
            panic!("round never ended");
        }

        fn game_over(&self) -> bool {
            matches!(self.app.screen(), Screen::Game(g) if matches!(g.phase, GamePhase::Over))
        }
    }

    #[test]
    fn starts_at_menu_and_navigates_back() {
        let mut h = Harness::new(GameConfig::default());
        assert_eq!(h.app.state(), AppState::Menu);

        h.keys(&[Key::Enter]);
        assert_eq!(h.app.state(), AppState::SelectMode);
        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Menu);

        h.keys(&[Key::Down, Key::Enter]);
        assert_eq!(h.app.state(), AppState::Leaderboard);
        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Menu);

        h.keys(&[Key::Down, Key::Down, Key::Enter]);
        assert_eq!(h.app.state(), AppState::Settings);
        h.keys(&[Key::Right]);
        assert_eq!(h.app.context().volume.level(), 0.6);
        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Menu);
    }

    #[test]
    fn quit_from_menu_item_and_event() {
        let mut h = Harness::new(GameConfig::default());
        let effects = h.keys(&[Key::Up, Key::Enter]);
        assert_eq!(effects, vec![Effect::Quit]);
        assert!(!h.app.is_running());
        assert!(h.step(&[InputEvent::KeyDown(Key::Enter)]).is_empty());

        let mut h = Harness::new(GameConfig::default());
        h.start(0);
        assert_eq!(h.step(&[InputEvent::Quit]), vec![Effect::Quit]);
    }

    #[test]
    fn mode_selection_sets_mode() {
        let mut h = Harness::new(GameConfig::default());
        h.start(2);
        assert_eq!(h.app.context().mode, GameMode::Borderless);
        let Screen::Game(game) = h.app.screen() else {
            panic!("expected game screen");
        };
        assert_eq!(game.sim.mode(), GameMode::Borderless);
        assert_eq!(h.app.tick_rate(), 8.0);
    }

    #[test]
    fn pause_resume_settings_modal() {
        let mut h = Harness::new(GameConfig::default());
        h.start(0);

        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Paused);
        assert_eq!(h.app.tick_rate(), 15.0);

        h.keys(&[Key::Down, Key::Enter]);
        assert_eq!(h.app.state(), AppState::Settings);
        h.keys(&[Key::Minus, Key::Minus]);
        assert_eq!(h.app.context().volume.level(), 0.3);
        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Paused);

        h.keys(&[Key::P]);
        assert_eq!(h.app.state(), AppState::Game);
    }

    #[test]
    fn paused_round_does_not_advance() {
        let mut h = Harness::new(GameConfig::default());
        h.start(0);
        h.keys(&[Key::Escape]);
        let head = |h: &Harness| match h.app.screen() {
            Screen::Game(g) => g.sim.head(),
            _ => None,
        };
        let before = head(&h);
        for _ in 0..5 {
            h.step(&[]);
        }
        assert_eq!(head(&h), before);
    }

    #[test]
    fn pause_to_main_menu_and_exit() {
        let mut h = Harness::new(GameConfig::default());
        h.start(0);
        h.keys(&[Key::Escape]);
        h.keys(&[Key::Down, Key::Down, Key::Enter]);
        assert_eq!(h.app.state(), AppState::Menu);

        h.start(0);
        h.keys(&[Key::Escape]);
        let effects = h.keys(&[Key::Up, Key::Enter]);
        assert_eq!(effects, vec![Effect::Quit]);
    }

    #[test]
    fn qualifying_round_goes_to_name_entry() {
        let mut h = Harness::new(GameConfig::default());
        h.start(0);
        let effects = h.play_out();
        assert!(effects.contains(&Effect::PlaySound(Clip::GameOver)));
        assert_eq!(h.app.state(), AppState::EnterName);

        h.step(&[
            InputEvent::Text('A'),
            InputEvent::Text('n'),
            InputEvent::Text('!'),
            InputEvent::Text('n'),
            InputEvent::Text('x'),
            InputEvent::KeyDown(Key::Backspace),
        ]);
        let score = match h.app.screen() {
            Screen::EnterName(entry) => {
                assert_eq!(entry.name, "Ann");
                entry.score
            }
            _ => panic!("expected name entry"),
        };
        h.keys(&[Key::Enter]);
        assert_eq!(h.app.state(), AppState::Leaderboard);
        assert_eq!(h.app.context().leaderboard, vec![Entry::new("Ann", score)]);
        assert_eq!(h.app.context().store.load(), vec![Entry::new("Ann", score)]);
    }

    #[test]
    fn cancelled_name_entry_saves_nothing() {
        let mut h = Harness::new(GameConfig::default());
        h.start(0);
        h.play_out();
        assert_eq!(h.app.state(), AppState::EnterName);
        h.keys(&[Key::Escape]);
        assert_eq!(h.app.state(), AppState::Leaderboard);
        assert!(h.app.context().leaderboard.is_empty());
    }

    #[test]
    fn non_qualifying_round_offers_retry_and_menu() {
        let board: Vec<Entry> = (0..10).map(|i| Entry::new(format!("p{i}"), 10_000)).collect();
        let mut h = Harness::with_board(&board);
        h.start(0);
        h.play_out();
        assert!(h.game_over());
        assert_eq!(h.app.state(), AppState::Game);

        h.keys(&[Key::R]);
        match h.app.screen() {
            Screen::Game(g) => {
                assert!(matches!(g.phase, GamePhase::Playing));
                assert!(g.sim.is_alive());
                assert_eq!(g.sim.score(), 0);
            }
            _ => panic!("expected game screen"),
        }

        h.play_out();
        assert!(h.game_over());
        h.keys(&[Key::M]);
        assert_eq!(h.app.state(), AppState::Menu);
    }

    #[test]
    fn impossible_obstacle_count_is_fatal_at_round_setup() {
        let config = GameConfig {
            play_width: 100,
            play_height: 100,
            obstacle_count: 30,
            obstacle_attempt_cap: 1_000,
            ..GameConfig::default()
        };
        let mut h = Harness::new(config);
        h.keys(&[Key::Enter]);
        h.now += 10.0;
        let result = h.app.frame(&[InputEvent::KeyDown(Key::Down), InputEvent::KeyDown(Key::Enter)], h.now);
        assert!(matches!(result, Err(GameError::ObstaclePlacement { .. })));
    }

    #[test]
    fn events_wait_for_the_next_due_tick() {
        let mut h = Harness::new(GameConfig::default());
        assert!(h.app.frame(&[], 0.0).expect("frame").is_empty());
        h.app.frame(&[InputEvent::KeyDown(Key::Enter)], 0.01).expect("frame");
        assert_eq!(h.app.state(), AppState::Menu);
        h.app.frame(&[], 0.1).expect("frame");
        assert_eq!(h.app.state(), AppState::SelectMode);
    }

    #[test]
    fn cadence_spacing() {
        let mut cadence = Cadence::default();
        assert!(cadence.due(0.0, 10.0));
        assert!(!cadence.due(0.05, 10.0));
        assert!(cadence.due(0.1, 10.0));
        assert!(!cadence.due(0.15, 10.0));
        assert!(cadence.due(0.3, 10.0));
    }

    fn ticks_at_60_fps(rate: f32) -> usize {
        let mut cadence = Cadence::default();
        (0..600)
            .filter(|frame| cadence.due(*frame as f64 / 60.0, rate))
            .count()
    }

    #[test]
    fn cadence_holds_rate_between_host_frames() {
        let slow = ticks_at_60_fps(8.0);
        let fast = ticks_at_60_fps(40.0);
        let max = ticks_at_60_fps(50.0);
        assert!((79..=81).contains(&slow), "{slow}");
        assert!((399..=401).contains(&fast), "{fast}");
        assert!((499..=501).contains(&max), "{max}");
    }

    #[test]
    fn cadence_reanchors_after_a_stall() {
        let mut cadence = Cadence::default();
        assert!(cadence.due(0.0, 10.0));
        assert!(cadence.due(5.0, 10.0));
        // no burst of catch-up ticks
        assert!(!cadence.due(5.01, 10.0));
        assert!(cadence.due(5.15, 10.0));
    }

    #[test]
    fn volume_clamps_rounds_and_mutes() {
        let mut volume = Volume::new(0.5);
        for _ in 0..8 {
            volume.adjust(0.1);
        }
        assert_eq!(volume.level(), 1.0);
        volume.adjust(-0.3);
        assert_eq!(volume.level(), 0.7);
        volume.toggle_mute();
        assert_eq!(volume.level(), 0.0);
        volume.toggle_mute();
        assert_eq!(volume.level(), 0.7);
        for _ in 0..10 {
            volume.adjust(-0.1);
        }
        assert_eq!(volume.level(), 0.0);
        volume.toggle_mute();
        assert_eq!(volume.level(), 0.1);
    }
}
