use macroquad::math::{Rect, Vec2};

use crate::input::{InputEvent, Key, MouseButton};

/// Vertical stack of equally sized buttons centered on `center_x`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ButtonColumn {
    pub center_x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub spacing: f32,
    pub count: usize,
}

impl ButtonColumn {
    pub fn new(center_x: f32, top: f32, width: f32, height: f32, spacing: f32, count: usize) -> Self {
        Self {
            center_x,
            top,
            width,
            height,
            spacing,
            count,
        }
    }

    /// Column whose vertical middle sits at `center_y`.
    pub fn centered_on(
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
        spacing: f32,
        count: usize,
    ) -> Self {
        let total = count as f32 * height + count.saturating_sub(1) as f32 * spacing;
        Self::new(center_x, center_y - total * 0.5, width, height, spacing, count)
    }

    pub fn rect(&self, index: usize) -> Rect {
        Rect::new(
            self.center_x - self.width * 0.5,
            self.top + index as f32 * (self.height + self.spacing),
            self.width,
            self.height,
        )
    }

    pub fn bottom(&self) -> f32 {
        self.rect(self.count.saturating_sub(1)).bottom()
    }

    pub fn hit(&self, position: Vec2) -> Option<usize> {
        (0..self.count).find(|i| self.rect(*i).contains(position))
    }
}

pub trait MenuItem: Copy + 'static {
    fn label(self) -> &'static str;
}

/// Keyboard/mouse navigation over a fixed list of items.
#[derive(Clone, Debug)]
pub struct Menu<T: MenuItem> {
    items: &'static [T],
    selected: usize,
}

impl<T: MenuItem> Menu<T> {
    pub fn new(items: &'static [T]) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &'static [T] {
        self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<T> {
        self.items.get(self.selected).copied()
    }

    /// Returns the activated item, if this event activated one.
    pub fn handle(&mut self, event: &InputEvent, layout: &ButtonColumn) -> Option<T> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        match event {
            InputEvent::KeyDown(Key::Up | Key::W) => {
                self.selected = (self.selected + len - 1) % len;
                None
            }
            InputEvent::KeyDown(Key::Down | Key::S) => {
                self.selected = (self.selected + 1) % len;
                None
            }
            InputEvent::KeyDown(Key::Enter) => self.selected_item(),
            InputEvent::MouseDown {
                button: MouseButton::Left,
                position,
            } => {
                let index = layout.hit(*position).filter(|i| *i < len)?;
                self.selected = index;
                self.selected_item()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    #[derive(Copy, Clone, Debug, PartialEq)]
    enum Item {
        One,
        Two,
        Three,
    }

    impl MenuItem for Item {
        fn label(self) -> &'static str {
            match self {
                Item::One => "One",
                Item::Two => "Two",
                Item::Three => "Three",
            }
        }
    }

    const ITEMS: &[Item] = &[Item::One, Item::Two, Item::Three];

    fn layout() -> ButtonColumn {
        ButtonColumn::new(400.0, 100.0, 200.0, 50.0, 10.0, 3)
    }

    #[test]
    fn rects_stack_downwards() {
        let col = layout();
        assert_eq!(col.rect(0), Rect::new(300.0, 100.0, 200.0, 50.0));
        assert_eq!(col.rect(2), Rect::new(300.0, 220.0, 200.0, 50.0));
        assert_eq!(col.bottom(), 270.0);
    }

    #[test]
    fn centered_column_is_symmetric() {
        let col = ButtonColumn::centered_on(400.0, 300.0, 200.0, 50.0, 10.0, 2);
        assert_eq!(col.top, 245.0);
        assert_eq!(col.bottom(), 355.0);
    }

    #[test]
    fn hit_ignores_gaps() {
        let col = layout();
        assert_eq!(col.hit(vec2(400.0, 125.0)), Some(0));
        assert_eq!(col.hit(vec2(400.0, 155.0)), None);
        assert_eq!(col.hit(vec2(400.0, 165.0)), Some(1));
        assert_eq!(col.hit(vec2(100.0, 165.0)), None);
    }

    #[test]
    fn keyboard_wraps_and_activates() {
        let mut menu = Menu::new(ITEMS);
        let col = layout();
        assert_eq!(menu.handle(&InputEvent::KeyDown(Key::Up), &col), None);
        assert_eq!(menu.selected_item(), Some(Item::Three));
        menu.handle(&InputEvent::KeyDown(Key::S), &col);
        assert_eq!(menu.selected_item(), Some(Item::One));
        assert_eq!(menu.handle(&InputEvent::KeyDown(Key::Enter), &col), Some(Item::One));
    }

    #[test]
    fn click_activates_button_under_cursor() {
        let mut menu = Menu::new(ITEMS);
        let col = layout();
        assert_eq!(menu.handle(&InputEvent::click(vec2(350.0, 230.0)), &col), Some(Item::Three));
        assert_eq!(menu.selected(), 2);
        assert_eq!(menu.handle(&InputEvent::click(vec2(10.0, 10.0)), &col), None);
        let right = InputEvent::MouseDown {
            button: MouseButton::Right,
            position: vec2(350.0, 125.0),
        };
        assert_eq!(menu.handle(&right, &col), None);
        assert_eq!(Item::Two.label(), "Two");
    }
}
