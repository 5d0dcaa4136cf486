//! Per-screen state. Each screen consumes input events and reports where the
//! application goes next; [`crate::app::App`] owns the loop that drives them.

use crate::app::{AppContext, Clip, Effect};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::{InputEvent, Key};
use crate::leaderboard::Entry;
use crate::menu::{ButtonColumn, Menu, MenuItem};
use crate::sim::{GameMode, Simulation, TickOutcome};

pub enum Screen {
    Menu(MainMenu),
    SelectMode(ModeSelect),
    Game(GameScreen),
    Leaderboard(LeaderboardView),
    Settings(SettingsScreen),
    EnterName(NameEntry),
}

pub enum Transition {
    Stay,
    To(Screen),
    Quit,
}

impl Screen {
    pub fn menu() -> Self {
        Screen::Menu(MainMenu::new())
    }

    pub fn handle(
        &mut self,
        ctx: &mut AppContext,
        event: &InputEvent,
    ) -> Result<Transition, GameError> {
        match self {
            Screen::Menu(menu) => Ok(menu.handle(ctx, event)),
            Screen::SelectMode(select) => select.handle(ctx, event),
            Screen::Game(game) => game.handle(ctx, event),
            Screen::Leaderboard(view) => Ok(view.handle(ctx, event)),
            Screen::Settings(settings) => Ok(match settings.handle(ctx, event) {
                SettingsAction::Stay => Transition::Stay,
                SettingsAction::Close => Transition::To(Screen::menu()),
            }),
            Screen::EnterName(entry) => Ok(entry.handle(ctx, event)),
        }
    }

    /// Per-tick work after input. Only active play does anything here.
    pub fn update(
        &mut self,
        ctx: &mut AppContext,
        effects: &mut Vec<Effect>,
    ) -> Transition {
        match self {
            Screen::Game(game) => game.update(ctx, effects),
            _ => Transition::Stay,
        }
    }

    /// Ticks per second this screen wants to be driven at.
    pub fn tick_rate(&self, config: &GameConfig) -> f32 {
        match self {
            Screen::Game(GameScreen {
                sim,
                phase: GamePhase::Playing,
            }) => sim.tick_rate(),
            _ => config.ui_tick_rate,
        }
    }
}

// ---- Main menu ----

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MainItem {
    NewGame,
    Leaderboard,
    Settings,
    Quit,
}

impl MenuItem for MainItem {
    fn label(self) -> &'static str {
        match self {
            MainItem::NewGame => "New Game",
            MainItem::Leaderboard => "Leaderboard",
            MainItem::Settings => "Settings",
            MainItem::Quit => "Quit",
        }
    }
}

const MAIN_ITEMS: &[MainItem] = &[
    MainItem::NewGame,
    MainItem::Leaderboard,
    MainItem::Settings,
    MainItem::Quit,
];

pub fn main_menu_layout(config: &GameConfig) -> ButtonColumn {
    ButtonColumn::new(config.screen_width() * 0.5, 200.0, 300.0, 60.0, 20.0, MAIN_ITEMS.len())
}

pub struct MainMenu {
    pub menu: Menu<MainItem>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            menu: Menu::new(MAIN_ITEMS),
        }
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> Transition {
        match self.menu.handle(event, &main_menu_layout(&ctx.config)) {
            Some(MainItem::NewGame) => Transition::To(Screen::SelectMode(ModeSelect::new())),
            Some(MainItem::Leaderboard) => {
                ctx.refresh_leaderboard();
                Transition::To(Screen::Leaderboard(LeaderboardView::new()))
            }
            Some(MainItem::Settings) => Transition::To(Screen::Settings(SettingsScreen::full())),
            Some(MainItem::Quit) => Transition::Quit,
            None => Transition::Stay,
        }
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Mode select ----

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModeItem {
    Play(GameMode),
    Back,
}

impl MenuItem for ModeItem {
    fn label(self) -> &'static str {
        match self {
            ModeItem::Play(mode) => mode.label(),
            ModeItem::Back => "Main Menu",
        }
    }
}

const MODE_ITEMS: &[ModeItem] = &[
    ModeItem::Play(GameMode::Classic),
    ModeItem::Play(GameMode::Obstacles),
    ModeItem::Play(GameMode::Borderless),
    ModeItem::Back,
];

pub fn mode_select_layout(config: &GameConfig) -> ButtonColumn {
    ButtonColumn::centered_on(
        config.screen_width() * 0.5,
        config.screen_height() * 0.5,
        350.0,
        50.0,
        20.0,
        MODE_ITEMS.len(),
    )
}

pub struct ModeSelect {
    pub menu: Menu<ModeItem>,
}

impl ModeSelect {
    pub fn new() -> Self {
        Self {
            menu: Menu::new(MODE_ITEMS),
        }
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> Result<Transition, GameError> {
        if *event == InputEvent::KeyDown(Key::Escape) {
            return Ok(Transition::To(Screen::menu()));
        }
        match self.menu.handle(event, &mode_select_layout(&ctx.config)) {
            Some(ModeItem::Play(mode)) => {
                ctx.mode = mode;
                let game = GameScreen::new(&ctx.config, mode)?;
                Ok(Transition::To(Screen::Game(game)))
            }
            Some(ModeItem::Back) => Ok(Transition::To(Screen::menu())),
            None => Ok(Transition::Stay),
        }
    }
}

impl Default for ModeSelect {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Active round ----

pub enum GamePhase {
    Playing,
    Paused(PauseMenu),
    /// Round ended with a score that does not make the leaderboard.
    Over,
}

pub struct GameScreen {
    pub sim: Simulation,
    pub phase: GamePhase,
}

impl GameScreen {
    pub fn new(config: &GameConfig, mode: GameMode) -> Result<Self, GameError> {
        Ok(Self {
            sim: Simulation::new(config, mode)?,
            phase: GamePhase::Playing,
        })
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> Result<Transition, GameError> {
        match &mut self.phase {
            GamePhase::Playing => {
                if let InputEvent::KeyDown(key) = event {
                    if matches!(key, Key::Escape | Key::P) {
                        tracing::info!("paused");
                        self.phase = GamePhase::Paused(PauseMenu::new());
                    } else if let Some(dir) = key.direction() {
                        self.sim.queue_direction(dir);
                    }
                }
                Ok(Transition::Stay)
            }
            GamePhase::Paused(pause) => match pause.handle(ctx, event) {
                PauseAction::Stay => Ok(Transition::Stay),
                PauseAction::Resume => {
                    tracing::info!("resumed");
                    self.phase = GamePhase::Playing;
                    Ok(Transition::Stay)
                }
                PauseAction::MainMenu => Ok(Transition::To(Screen::menu())),
                PauseAction::Exit => Ok(Transition::Quit),
            },
            GamePhase::Over => match event {
                InputEvent::KeyDown(Key::R) => {
                    self.sim.reset()?;
                    self.phase = GamePhase::Playing;
                    Ok(Transition::Stay)
                }
                InputEvent::KeyDown(Key::M | Key::Enter | Key::Escape) => {
                    Ok(Transition::To(Screen::menu()))
                }
                _ => Ok(Transition::Stay),
            },
        }
    }

    fn update(&mut self, ctx: &mut AppContext, effects: &mut Vec<Effect>) -> Transition {
        if !matches!(self.phase, GamePhase::Playing) {
            return Transition::Stay;
        }
        match self.sim.tick() {
            TickOutcome::Moved => Transition::Stay,
            TickOutcome::AteFood => {
                effects.push(Effect::PlaySound(Clip::Eat));
                Transition::Stay
            }
            TickOutcome::Collided(_) => {
                effects.push(Effect::PlaySound(Clip::GameOver));
                let score = self.sim.score();
                ctx.refresh_leaderboard();
                if ctx.store.qualifies(score, &ctx.leaderboard) {
                    tracing::info!(score, "score qualifies for the leaderboard");
                    Transition::To(Screen::EnterName(NameEntry::new(score)))
                } else {
                    self.phase = GamePhase::Over;
                    Transition::Stay
                }
            }
        }
    }
}

// ---- Pause overlay ----

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Settings,
    MainMenu,
    Exit,
}

impl MenuItem for PauseItem {
    fn label(self) -> &'static str {
        match self {
            PauseItem::Resume => "Resume",
            PauseItem::Settings => "Settings",
            PauseItem::MainMenu => "Main Menu",
            PauseItem::Exit => "Exit Game",
        }
    }
}

const PAUSE_ITEMS: &[PauseItem] = &[
    PauseItem::Resume,
    PauseItem::Settings,
    PauseItem::MainMenu,
    PauseItem::Exit,
];

pub fn pause_layout(config: &GameConfig) -> ButtonColumn {
    let area_center = config.panel_height as f32 + config.play_height as f32 * 0.5;
    ButtonColumn::centered_on(
        config.screen_width() * 0.5,
        area_center + 50.0,
        300.0,
        50.0,
        15.0,
        PAUSE_ITEMS.len(),
    )
}

enum PauseAction {
    Stay,
    Resume,
    MainMenu,
    Exit,
}

pub struct PauseMenu {
    pub menu: Menu<PauseItem>,
    /// Settings opened on top of the pause overlay.
    pub settings: Option<SettingsScreen>,
}

impl PauseMenu {
    fn new() -> Self {
        Self {
            menu: Menu::new(PAUSE_ITEMS),
            settings: None,
        }
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> PauseAction {
        if let Some(settings) = &mut self.settings {
            if let SettingsAction::Close = settings.handle(ctx, event) {
                self.settings = None;
            }
            return PauseAction::Stay;
        }
        if matches!(event, InputEvent::KeyDown(Key::Escape | Key::P)) {
            return PauseAction::Resume;
        }
        match self.menu.handle(event, &pause_layout(&ctx.config)) {
            Some(PauseItem::Resume) => PauseAction::Resume,
            Some(PauseItem::Settings) => {
                self.settings = Some(SettingsScreen::modal());
                PauseAction::Stay
            }
            Some(PauseItem::MainMenu) => PauseAction::MainMenu,
            Some(PauseItem::Exit) => PauseAction::Exit,
            None => PauseAction::Stay,
        }
    }
}

// ---- Settings ----

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettingsItem {
    VolumeDown,
    VolumeUp,
    Back,
}

impl MenuItem for SettingsItem {
    fn label(self) -> &'static str {
        match self {
            SettingsItem::VolumeDown => "Volume -",
            SettingsItem::VolumeUp => "Volume +",
            SettingsItem::Back => "Back",
        }
    }
}

const SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::VolumeDown,
    SettingsItem::VolumeUp,
    SettingsItem::Back,
];

/// Panel the modal variant is drawn in: 75% x 70% of the play area.
pub fn settings_modal_panel(config: &GameConfig) -> macroquad::math::Rect {
    let w = config.screen_width() * 0.75;
    let h = config.play_height as f32 * 0.7;
    let x = (config.screen_width() - w) * 0.5;
    let y = config.panel_height as f32 + (config.play_height as f32 - h) * 0.5;
    macroquad::math::Rect::new(x, y, w, h)
}

pub fn settings_layout(config: &GameConfig, modal: bool) -> ButtonColumn {
    if modal {
        let panel = settings_modal_panel(config);
        ButtonColumn::new(panel.center().x, panel.y + 150.0, 200.0, 50.0, 15.0, SETTINGS_ITEMS.len())
    } else {
        ButtonColumn::new(config.screen_width() * 0.5, 250.0, 250.0, 50.0, 20.0, SETTINGS_ITEMS.len())
    }
}

pub enum SettingsAction {
    Stay,
    Close,
}

/// Volume settings. The same screen serves the main menu (full screen,
/// closing returns to the menu) and the pause overlay (modal, closing returns
/// to the pause menu).
pub struct SettingsScreen {
    pub modal: bool,
    pub menu: Menu<SettingsItem>,
}

impl SettingsScreen {
    pub fn full() -> Self {
        Self {
            modal: false,
            menu: Menu::new(SETTINGS_ITEMS),
        }
    }

    pub fn modal() -> Self {
        Self {
            modal: true,
            ..Self::full()
        }
    }

    pub fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> SettingsAction {
        let step = ctx.config.volume_step;
        match event {
            InputEvent::KeyDown(Key::Escape) => return SettingsAction::Close,
            InputEvent::KeyDown(Key::Left | Key::Minus) => ctx.volume.adjust(-step),
            InputEvent::KeyDown(Key::Right | Key::Plus) => ctx.volume.adjust(step),
            InputEvent::KeyDown(Key::M) => ctx.volume.toggle_mute(),
            _ => match self.menu.handle(event, &settings_layout(&ctx.config, self.modal)) {
                Some(SettingsItem::VolumeDown) => ctx.volume.adjust(-step),
                Some(SettingsItem::VolumeUp) => ctx.volume.adjust(step),
                Some(SettingsItem::Back) => return SettingsAction::Close,
                None => {}
            },
        }
        SettingsAction::Stay
    }
}

// ---- Leaderboard ----

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackItem {
    Back,
}

impl MenuItem for BackItem {
    fn label(self) -> &'static str {
        "Back"
    }
}

const BACK_ITEMS: &[BackItem] = &[BackItem::Back];

pub fn leaderboard_layout(config: &GameConfig) -> ButtonColumn {
    ButtonColumn::new(
        config.screen_width() * 0.5,
        config.screen_height() - 80.0,
        200.0,
        50.0,
        0.0,
        BACK_ITEMS.len(),
    )
}

pub struct LeaderboardView {
    pub menu: Menu<BackItem>,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self {
            menu: Menu::new(BACK_ITEMS),
        }
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> Transition {
        if *event == InputEvent::KeyDown(Key::Escape) {
            return Transition::To(Screen::menu());
        }
        match self.menu.handle(event, &leaderboard_layout(&ctx.config)) {
            Some(BackItem::Back) => Transition::To(Screen::menu()),
            None => Transition::Stay,
        }
    }
}

impl Default for LeaderboardView {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Name entry ----

pub struct NameEntry {
    pub score: u32,
    pub name: String,
}

impl NameEntry {
    pub fn new(score: u32) -> Self {
        Self {
            score,
            name: String::new(),
        }
    }

    fn handle(&mut self, ctx: &mut AppContext, event: &InputEvent) -> Transition {
        match event {
            InputEvent::Text(c) => {
                let room = self.name.chars().count() < ctx.config.max_name_length;
                if room && (c.is_alphanumeric() || *c == ' ') {
                    self.name.push(*c);
                }
                Transition::Stay
            }
            InputEvent::KeyDown(Key::Backspace) => {
                self.name.pop();
                Transition::Stay
            }
            InputEvent::KeyDown(Key::Enter) => {
                ctx.leaderboard = ctx.store.add_entry(&self.name, self.score);
                Transition::To(Screen::Leaderboard(LeaderboardView::new()))
            }
            InputEvent::KeyDown(Key::Escape) => {
                tracing::info!(score = self.score, "name entry cancelled");
                ctx.refresh_leaderboard();
                Transition::To(Screen::Leaderboard(LeaderboardView::new()))
            }
            _ => Transition::Stay,
        }
    }
}

/// Rows for display: 1-based rank, name padded to the max name length.
pub fn leaderboard_rows(entries: &[Entry], max_name_length: usize) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let name: String = e.name.chars().take(max_name_length).collect();
            format!("{:>2}. {:<width$} {:>6}", i + 1, name, e.score, width = max_name_length + 1)
        })
        .collect()
}
