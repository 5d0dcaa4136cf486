use macroquad::prelude::*;

use crate::app::{App, AppContext};
use crate::grid::Cell;
use crate::leaderboard::DEFAULT_NAME;
use crate::menu::{ButtonColumn, Menu, MenuItem};
use crate::screens::{
    BackItem, GamePhase, GameScreen, NameEntry, Screen, SettingsScreen, leaderboard_layout,
    leaderboard_rows, main_menu_layout, mode_select_layout, pause_layout, settings_layout,
    settings_modal_panel,
};

// Matrix-style palette
const MATRIX_HEAD: Color = Color::new(0.64, 1.0, 0.64, 1.0);
const MATRIX_BODY: Color = Color::new(0.25, 0.9, 0.25, 1.0);
const MATRIX_WALL: Color = Color::new(0.08, 0.4, 0.08, 1.0);
const MATRIX_FOOD: Color = Color::new(0.9, 1.0, 0.9, 1.0);

const PANEL: Color = Color::new(0.2, 0.2, 0.2, 1.0);
const BUTTON: Color = Color::new(0.27, 0.27, 0.27, 1.0);
const BUTTON_HOVER: Color = Color::new(0.4, 0.4, 0.4, 1.0);
const MENU_TEXT: Color = Color::new(0.78, 0.78, 0.78, 1.0);
const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.7);

const MATRIX_GLYPHS: &[u8] = b"01<>[]{}()/\\|-=+*;:.,^~ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Stable glyph per cell so obstacles do not flicker.
fn matrix_char_for_cell(c: Cell) -> char {
    let hx = (c.x as i64).wrapping_mul(73_856_093);
    let hy = (c.y as i64).wrapping_mul(19_349_663);
    let h = (hx ^ hy).unsigned_abs() as usize;
    MATRIX_GLYPHS[h % MATRIX_GLYPHS.len()] as char
}

fn draw_cell(c: Cell, ctx: &AppContext, fill: Color) {
    let size = ctx.config.cell_size as f32;
    let r = c.to_rect(size, ctx.config.panel_height as f32);
    draw_rectangle(r.x, r.y, r.w, r.h, fill);
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, BLACK);
}

fn draw_glyph_cell(ch: char, c: Cell, ctx: &AppContext, color: Color) {
    let size = ctx.config.cell_size as f32;
    let r = c.to_rect(size, ctx.config.panel_height as f32);
    let params = TextParams {
        font_size: size as u16,
        font_scale: 1.0,
        font_scale_aspect: 1.0,
        color,
        ..Default::default()
    };
    draw_text_ex(&ch.to_string(), r.x + size * 0.2, r.y + size - 2.0, params);
}

fn draw_centered(text: &str, center_x: f32, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, center_x - m.width * 0.5, y, size as f32, color);
}

fn draw_button(label: &str, rect: Rect, selected: bool, mouse: Vec2) {
    let hovered = rect.contains(mouse);
    let fill = if hovered || selected { BUTTON_HOVER } else { BUTTON };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
    if selected {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, MATRIX_BODY);
    }
    let size = (rect.h * 0.5) as u16;
    let m = measure_text(label, None, size, 1.0);
    draw_text(
        label,
        rect.center().x - m.width * 0.5,
        rect.center().y + m.offset_y * 0.5,
        size as f32,
        MENU_TEXT,
    );
}

fn draw_menu<T: MenuItem>(menu: &Menu<T>, layout: &ButtonColumn, mouse: Vec2) {
    for (i, item) in menu.items().iter().enumerate() {
        draw_button(item.label(), layout.rect(i), menu.selected() == i, mouse);
    }
}

fn draw_panel(game: &GameScreen, ctx: &AppContext) {
    let w = ctx.config.screen_width();
    let h = ctx.config.panel_height as f32;
    draw_rectangle(0.0, 0.0, w, h, PANEL);
    let baseline = h * 0.5 + 8.0;
    draw_text(&format!("Score: {}", game.sim.score()), 15.0, baseline, 28.0, MATRIX_HEAD);
    draw_centered(game.sim.mode().label(), w * 0.5, baseline, 20, MENU_TEXT);
    let top = format!("Top Score: {}", ctx.top_score().max(game.sim.score()));
    let m = measure_text(&top, None, 22, 1.0);
    draw_text(&top, w - m.width - 15.0, baseline, 22.0, YELLOW);
}

fn draw_round(game: &GameScreen, ctx: &AppContext) {
    draw_panel(game, ctx);

    for c in game.sim.obstacles().iter() {
        draw_cell(*c, ctx, MATRIX_WALL);
        draw_glyph_cell(matrix_char_for_cell(*c), *c, ctx, BLACK);
    }
    for (i, c) in game.sim.body().enumerate() {
        draw_cell(*c, ctx, if i == 0 { MATRIX_HEAD } else { MATRIX_BODY });
    }
    if let Some(food) = game.sim.food() {
        draw_cell(food, ctx, RED);
        draw_glyph_cell('*', food, ctx, MATRIX_FOOD);
    }
}

fn draw_play_overlay(ctx: &AppContext) {
    let top = ctx.config.panel_height as f32;
    draw_rectangle(0.0, top, ctx.config.screen_width(), ctx.config.play_height as f32, OVERLAY);
}

fn draw_game(game: &GameScreen, ctx: &AppContext, mouse: Vec2) {
    draw_round(game, ctx);
    let cx = ctx.config.screen_width() * 0.5;
    let area_mid = ctx.config.panel_height as f32 + ctx.config.play_height as f32 * 0.5;

    match &game.phase {
        GamePhase::Playing => {}
        GamePhase::Paused(pause) => {
            draw_play_overlay(ctx);
            let layout = pause_layout(&ctx.config);
            draw_centered("Paused", cx, layout.top - 40.0, 56, YELLOW);
            draw_menu(&pause.menu, &layout, mouse);
            if let Some(settings) = &pause.settings {
                draw_settings(settings, ctx, mouse);
            }
        }
        GamePhase::Over => {
            draw_play_overlay(ctx);
            draw_centered("Game Over", cx, area_mid - 70.0, 50, RED);
            draw_centered(&format!("Score: {}", game.sim.score()), cx, area_mid - 20.0, 26, MATRIX_HEAD);
            if let Some(kind) = game.sim.collision() {
                draw_centered(kind.describe(), cx, area_mid + 15.0, 20, MENU_TEXT);
            }
            draw_centered("R: Retry", cx, area_mid + 60.0, 22, WHITE);
            draw_centered("M: Main Menu", cx, area_mid + 100.0, 22, WHITE);
        }
    }
}

fn draw_settings(settings: &SettingsScreen, ctx: &AppContext, mouse: Vec2) {
    let layout = settings_layout(&ctx.config, settings.modal);
    let (cx, title_y) = if settings.modal {
        let panel = settings_modal_panel(&ctx.config);
        draw_rectangle(panel.x, panel.y, panel.w, panel.h, PANEL);
        draw_rectangle_lines(panel.x, panel.y, panel.w, panel.h, 3.0, WHITE);
        (panel.center().x, panel.y + 50.0)
    } else {
        (ctx.config.screen_width() * 0.5, 100.0)
    };
    draw_centered("Settings", cx, title_y, 48, YELLOW);
    let volume = format!("Volume: {:.0}%", ctx.volume.level() * 100.0);
    draw_centered(&volume, cx, layout.top - 30.0, 28, MENU_TEXT);
    draw_menu(&settings.menu, &layout, mouse);
    draw_centered("Left/Right: adjust   M: mute   Esc: back", cx, layout.bottom() + 30.0, 16, GRAY);
}

fn draw_name_entry(entry: &NameEntry, ctx: &AppContext) {
    let cx = ctx.config.screen_width() * 0.5;
    let cy = ctx.config.screen_height() * 0.5;
    draw_centered("New High Score!", cx, cy - 140.0, 34, YELLOW);
    let hint = format!("Enter your name (max {} characters):", ctx.config.max_name_length);
    draw_centered(&hint, cx, cy - 100.0, 20, WHITE);
    draw_centered(&format!("Score: {}", entry.score), cx, cy - 70.0, 20, WHITE);

    let (w, h) = (300.0, 50.0);
    draw_rectangle(cx - w * 0.5, cy - h * 0.5, w, h, LIGHTGRAY);
    draw_rectangle_lines(cx - w * 0.5, cy - h * 0.5, w, h, 2.0, WHITE);
    let shown = if entry.name.is_empty() { DEFAULT_NAME } else { entry.name.as_str() };
    let color = if entry.name.is_empty() { GRAY } else { BLACK };
    draw_text(shown, cx - w * 0.5 + 10.0, cy + 10.0, 30.0, color);
    draw_centered("Enter: save   Esc: skip", cx, cy + 70.0, 18, GRAY);
}

fn draw_leaderboard(ctx: &AppContext, menu: &Menu<BackItem>, mouse: Vec2) {
    let cx = ctx.config.screen_width() * 0.5;
    let title = format!("Top {} Scores", ctx.store.capacity());
    draw_centered(&title, cx, 70.0, 56, YELLOW);
    if ctx.leaderboard.is_empty() {
        draw_centered("No scores yet!", cx, ctx.config.screen_height() * 0.5 - 50.0, 30, WHITE);
    } else {
        let rows = leaderboard_rows(&ctx.leaderboard, ctx.config.max_name_length);
        for (i, row) in rows.iter().enumerate() {
            draw_text(row, cx - 200.0, 140.0 + i as f32 * 40.0, 30.0, MENU_TEXT);
        }
    }
    draw_menu(menu, &leaderboard_layout(&ctx.config), mouse);
}

/// Draws the active screen of `app`.
pub fn draw(app: &App) {
    clear_background(BLACK);
    let ctx = app.context();
    let (mx, my) = mouse_position();
    let mouse = vec2(mx, my);
    let cx = ctx.config.screen_width() * 0.5;

    match app.screen() {
        Screen::Menu(main) => {
            draw_centered("Snake", cx, 120.0, 64, MATRIX_HEAD);
            draw_menu(&main.menu, &main_menu_layout(&ctx.config), mouse);
            let best = format!("Best: {}", ctx.top_score());
            draw_centered(&best, cx, ctx.config.screen_height() - 40.0, 20, MATRIX_BODY);
        }
        Screen::SelectMode(select) => {
            let layout = mode_select_layout(&ctx.config);
            draw_centered("Select Mode", cx, layout.top - 50.0, 48, YELLOW);
            draw_menu(&select.menu, &layout, mouse);
        }
        Screen::Game(game) => draw_game(game, ctx, mouse),
        Screen::Leaderboard(view) => draw_leaderboard(ctx, &view.menu, mouse),
        Screen::Settings(settings) => draw_settings(settings, ctx, mouse),
        Screen::EnterName(entry) => draw_name_entry(entry, ctx),
    }
}
