use anyhow::{Context, Result, anyhow};
use macroquad::prelude::*;
use tracing_subscriber::filter::EnvFilter;

use snake_arena::app::{self, App, Effect};
use snake_arena::config::{self, GameConfig};
use snake_arena::presentation::{self, Sounds};

fn window_conf(config: &GameConfig) -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: config.screen_width() as i32,
        window_height: config.screen_height() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn load_config() -> Result<GameConfig> {
    let path = config::config_path();
    GameConfig::load(&path).with_context(|| format!("loading config from {}", path.display()))
}

async fn run(config: GameConfig) -> Result<()> {
    prevent_quit();
    let sounds = Sounds::load()
        .await
        .map_err(|err| anyhow!("loading sound effects: {err:?}"))?;
    let seed = app::clock_seed();
    macroquad::rand::srand(seed);
    tracing::info!(seed, "rng seeded");
    let mut app = App::new(config);

    loop {
        let events = presentation::poll_input();
        let effects = app
            .frame(&events, get_time())
            .context("cannot set up the round")?;
        for effect in effects {
            match effect {
                Effect::PlaySound(clip) => sounds.play(clip, app.context().volume.level()),
                Effect::Quit => {
                    tracing::info!("bye");
                    return Ok(());
                }
            }
        }

        presentation::draw(&app);
        next_frame().await;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    };

    macroquad::Window::from_config(window_conf(&config), async move {
        if let Err(err) = run(config).await {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    });
}
