use macroquad::math::Vec2;

use crate::grid::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Enter,
    Escape,
    Backspace,
    P,
    R,
    M,
    Minus,
    Plus,
}

impl Key {
    /// Arrow keys and WASD steer the snake.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up | Key::W => Some(Direction::Up),
            Key::Down | Key::S => Some(Direction::Down),
            Key::Left | Key::A => Some(Direction::Left),
            Key::Right | Key::D => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// Printable character typed, for name entry.
    Text(char),
    MouseDown { button: MouseButton, position: Vec2 },
}

impl InputEvent {
    pub fn click(position: Vec2) -> Self {
        InputEvent::MouseDown {
            button: MouseButton::Left,
            position,
        }
    }
}
