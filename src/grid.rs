use macroquad::math::Rect;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step as (dx, dy); rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Grid position as (column, row).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev (L-infinity) distance.
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Pixel rectangle of this cell, offset by the panel drawn above the grid.
    pub fn to_rect(self, cell_size: f32, top: f32) -> Rect {
        Rect::new(
            self.x as f32 * cell_size,
            top + self.y as f32 * cell_size,
            cell_size,
            cell_size,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(self, c: Cell) -> bool {
        (0..self.width).contains(&c.x) && (0..self.height).contains(&c.y)
    }

    /// Folds each axis back into range, re-entering from the opposite edge.
    pub fn wrap(self, c: Cell) -> Cell {
        Cell::new(c.x.rem_euclid(self.width), c.y.rem_euclid(self.height))
    }

    pub fn center(self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn area(self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Row-major iterator over every cell.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}
