/// Game-over buttons and pointer hit-testing, in world coordinates.

use crate::constants::{HEIGHT, WIDTH};
use crate::entities::Rect;

pub const BUTTON_WIDTH: i32 = 200;
pub const BUTTON_HEIGHT: i32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Restart,
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub rect: Rect,
    pub choice: MenuChoice,
}

impl Button {
    pub fn new(label: &'static str, x: i32, y: i32, choice: MenuChoice) -> Self {
        Button {
            label,
            rect: Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT),
            choice,
        }
    }

    pub fn hovered(&self, pointer: Option<(i32, i32)>) -> bool {
        pointer.is_some_and(|(x, y)| self.rect.contains_point(x, y))
    }
}

/// "Play Again" / "Exit Game", side by side under the high-score list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverMenu {
    pub buttons: [Button; 2],
}

impl Default for GameOverMenu {
    fn default() -> Self {
        let y = HEIGHT / 2 + 100;
        GameOverMenu {
            buttons: [
                Button::new("Play Again", WIDTH / 2 - 220, y, MenuChoice::Restart),
                Button::new("Exit Game", WIDTH / 2 + 20, y, MenuChoice::Exit),
            ],
        }
    }
}

impl GameOverMenu {
    pub fn choice_at(&self, x: i32, y: i32) -> Option<MenuChoice> {
        self.buttons
            .iter()
            .find(|b| b.rect.contains_point(x, y))
            .map(|b| b.choice)
    }
}
