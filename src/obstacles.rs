use std::collections::HashSet;

use macroquad::rand::gen_range;

use crate::error::GameError;
use crate::grid::{Cell, GridSize};

/// Fixed blocking cells for one round of the obstacles variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Obstacles {
    cells: HashSet<Cell>,
}

impl Obstacles {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.cells.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rejection-samples `count` distinct cells off the starting body and out
    /// of the safety zone around its head (first element). Gives up after
    /// `attempt_cap` draws.
    pub fn generate(
        grid: GridSize,
        count: usize,
        start_body: &[Cell],
        safety_radius: i32,
        attempt_cap: usize,
    ) -> Result<Self, GameError> {
        let mut cells: HashSet<Cell> = HashSet::with_capacity(count);
        let mut attempts = 0;

        while cells.len() < count {
            if attempts >= attempt_cap {
                tracing::error!(
                    requested = count,
                    placed = cells.len(),
                    attempts,
                    "obstacle placement gave up"
                );
                return Err(GameError::ObstaclePlacement {
                    requested: count,
                    placed: cells.len(),
                    attempts,
                });
            }
            attempts += 1;

            let c = Cell::new(gen_range(0, grid.width), gen_range(0, grid.height));
            if cells.contains(&c) || !is_allowed(c, start_body, safety_radius) {
                continue;
            }
            cells.insert(c);
        }

        tracing::debug!(count, attempts, "obstacles placed");
        Ok(Self { cells })
    }
}

fn in_safety_zone(c: Cell, head: Cell, safety_radius: i32) -> bool {
    c.chebyshev(head) < safety_radius
}

fn is_allowed(c: Cell, start_body: &[Cell], safety_radius: i32) -> bool {
    if start_body.contains(&c) {
        return false;
    }
    match start_body.first() {
        Some(head) => !in_safety_zone(c, *head, safety_radius),
        None => true,
    }
}

/// Number of cells an obstacle may legally occupy.
pub fn available_cells(grid: GridSize, start_body: &[Cell], safety_radius: i32) -> usize {
    grid.cells()
        .filter(|c| is_allowed(*c, start_body, safety_radius))
        .count()
}

impl FromIterator<Cell> for Obstacles {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
