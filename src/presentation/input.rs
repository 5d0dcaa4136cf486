use macroquad::prelude::{
    KeyCode, MouseButton as MqButton, get_char_pressed, get_keys_pressed, is_mouse_button_pressed,
    is_quit_requested, mouse_position, vec2,
};

use crate::input::{InputEvent, Key, MouseButton};

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::W => Key::W,
        KeyCode::A => Key::A,
        KeyCode::S => Key::S,
        KeyCode::D => Key::D,
        KeyCode::Enter | KeyCode::KpEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::P => Key::P,
        KeyCode::R => Key::R,
        KeyCode::M => Key::M,
        KeyCode::Minus | KeyCode::KpSubtract => Key::Minus,
        KeyCode::Equal | KeyCode::KpAdd => Key::Plus,
        _ => return None,
    };
    Some(key)
}

/// Everything that happened since the previous frame.
pub fn poll_input() -> Vec<InputEvent> {
    let mut events = Vec::new();
    if is_quit_requested() {
        events.push(InputEvent::Quit);
    }

    events.extend(get_keys_pressed().into_iter().filter_map(map_key).map(InputEvent::KeyDown));

    while let Some(c) = get_char_pressed() {
        if !c.is_control() {
            events.push(InputEvent::Text(c));
        }
    }

    let (x, y) = mouse_position();
    for (mq, button) in [
        (MqButton::Left, MouseButton::Left),
        (MqButton::Right, MouseButton::Right),
        (MqButton::Middle, MouseButton::Middle),
    ] {
        if is_mouse_button_pressed(mq) {
            events.push(InputEvent::MouseDown {
                button,
                position: vec2(x, y),
            });
        }
    }
    events
}
