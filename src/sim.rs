use std::collections::VecDeque;

use macroquad::rand::gen_range;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::{Cell, Direction, GridSize};
use crate::obstacles::Obstacles;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Walls on every edge.
    Classic,
    /// Walled, plus random obstacles placed at round start.
    Obstacles,
    /// Edges wrap around.
    Borderless,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Obstacles => "Obstacles",
            GameMode::Borderless => "Borderless",
        }
    }

    fn wraps(self) -> bool {
        matches!(self, GameMode::Borderless)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
    Obstacle,
}

impl Collision {
    /// Cause line for the game-over overlay.
    pub fn describe(self) -> &'static str {
        match self {
            Collision::Wall => "Hit the wall",
            Collision::Body => "Bit your own tail",
            Collision::Obstacle => "Crashed into an obstacle",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    AteFood,
    Collided(Collision),
}

/// One round of play. Created at round start and reset in place on retry.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid: GridSize,
    mode: GameMode,
    /// Head is the front.
    body: VecDeque<Cell>,
    target_len: usize,
    direction: Direction,
    pending: Option<Direction>,
    food: Option<Cell>,
    obstacles: Obstacles,
    score: u32,
    tick_rate: f32,
    collision: Option<Collision>,

    start_body: Vec<Cell>,
    score_per_food: u32,
    initial_tick_rate: f32,
    max_tick_rate: f32,
    tick_rate_increment: f32,
    obstacle_count: usize,
    safety_radius: i32,
    obstacle_attempt_cap: usize,
}

impl Simulation {
    pub fn new(config: &GameConfig, mode: GameMode) -> Result<Self, GameError> {
        let mut sim = Self {
            grid: config.grid(),
            mode,
            body: VecDeque::new(),
            target_len: 0,
            direction: Direction::Right,
            pending: None,
            food: None,
            obstacles: Obstacles::empty(),
            score: 0,
            tick_rate: config.initial_tick_rate,
            collision: None,
            start_body: config.start_body(),
            score_per_food: config.score_per_food,
            initial_tick_rate: config.initial_tick_rate,
            max_tick_rate: config.max_tick_rate,
            tick_rate_increment: config.tick_rate_increment,
            obstacle_count: config.obstacle_count,
            safety_radius: config.safety_radius,
            obstacle_attempt_cap: config.obstacle_attempt_cap,
        };
        sim.reset()?;
        Ok(sim)
    }

    /// Starts a fresh round in the same mode. Obstacles are re-rolled.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.obstacles = match self.mode {
            GameMode::Obstacles => Obstacles::generate(
                self.grid,
                self.obstacle_count,
                &self.start_body,
                self.safety_radius,
                self.obstacle_attempt_cap,
            )?,
            GameMode::Classic | GameMode::Borderless => Obstacles::empty(),
        };
        self.body = self.start_body.iter().copied().collect();
        self.target_len = self.body.len();
        self.direction = Direction::Right;
        self.pending = None;
        self.score = 0;
        self.tick_rate = self.initial_tick_rate;
        self.collision = None;
        self.food = self.spawn_food();
        tracing::info!(mode = self.mode.label(), "round started");
        Ok(())
    }

    /// Buffers a direction change for the next tick. Reversals are refused.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Advances exactly one cell. After a collision the round is frozen and
    /// every further call reports the same collision.
    pub fn tick(&mut self) -> TickOutcome {
        if let Some(kind) = self.collision {
            return TickOutcome::Collided(kind);
        }

        if let Some(dir) = self.pending.take() {
            if dir != self.direction.opposite() {
                self.direction = dir;
            }
        }

        let Some(&head) = self.body.front() else {
            return self.collide(Collision::Body);
        };
        let mut new_head = head.step(self.direction);

        if self.mode.wraps() {
            new_head = self.grid.wrap(new_head);
        } else if !self.grid.contains(new_head) {
            return self.collide(Collision::Wall);
        }

        let grows = self.food == Some(new_head);
        if self.hits_body(new_head, grows) {
            return self.collide(Collision::Body);
        }
        if self.obstacles.contains(new_head) {
            return self.collide(Collision::Obstacle);
        }

        self.body.push_front(new_head);
        if grows {
            self.target_len += 1;
            self.score = self.score.saturating_add(self.score_per_food);
            self.speed_up();
            self.food = self.spawn_food();
            TickOutcome::AteFood
        } else {
            while self.body.len() > self.target_len {
                self.body.pop_back();
            }
            TickOutcome::Moved
        }
    }

    /// The tail cell is vacated this tick unless the snake grows, so it only
    /// counts as an obstacle on growth ticks.
    fn hits_body(&self, new_head: Cell, grows: bool) -> bool {
        let tail_vacates = !grows && self.body.len() >= self.target_len;
        let considered = if tail_vacates {
            self.body.len().saturating_sub(1)
        } else {
            self.body.len()
        };
        self.body.iter().take(considered).any(|c| *c == new_head)
    }

    fn collide(&mut self, kind: Collision) -> TickOutcome {
        self.collision = Some(kind);
        tracing::info!(mode = self.mode.label(), score = self.score, ?kind, "snake collided");
        TickOutcome::Collided(kind)
    }

    fn speed_up(&mut self) {
        let next = (self.tick_rate + self.tick_rate_increment).min(self.max_tick_rate);
        if next != self.tick_rate {
            tracing::debug!(from = self.tick_rate, to = next, "tick rate raised");
        }
        self.tick_rate = next;
    }

    /// Uniform draw among cells free of body and obstacles. Tries rejection
    /// sampling first and falls back to enumerating the free cells; `None`
    /// once the board is full.
    fn spawn_food(&self) -> Option<Cell> {
        let is_free = |c: &Cell| !self.body.contains(c) && !self.obstacles.contains(*c);

        for _ in 0..64 {
            let c = Cell::new(gen_range(0, self.grid.width), gen_range(0, self.grid.height));
            if is_free(&c) {
                tracing::debug!(x = c.x, y = c.y, "food spawned");
                return Some(c);
            }
        }

        let free: Vec<Cell> = self.grid.cells().filter(is_free).collect();
        if free.is_empty() {
            tracing::info!("no free cell left for food");
            return None;
        }
        let c = free[gen_range(0, free.len())];
        tracing::debug!(x = c.x, y = c.y, "food spawned");
        Some(c)
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    /// Segments from head to tail.
    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks per second the caller should schedule.
    pub fn tick_rate(&self) -> f32 {
        self.tick_rate
    }

    pub fn is_alive(&self) -> bool {
        self.collision.is_none()
    }

    pub fn collision(&self) -> Option<Collision> {
        self.collision
    }
}
