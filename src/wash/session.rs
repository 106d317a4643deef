use glam::Vec2;

use super::{TraceOutcome, WashGame};

/// Pointer input on the wash sprite, in sprite pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WashInput {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// One open wash window: the game plus the pointer button state. Only moves
/// while the button is held are traced.
#[derive(Debug, Clone, Default)]
pub struct WashMinigame {
    game: WashGame,
    pointer_held: bool,
}

impl WashMinigame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self) -> &WashGame {
        &self.game
    }

    pub fn handle(&mut self, input: WashInput) -> TraceOutcome {
        match input {
            WashInput::Down(_) => {
                self.pointer_held = true;
                TraceOutcome::Ignored
            }
            WashInput::Move(pos) if self.pointer_held => self.game.trace(pos),
            WashInput::Move(_) => TraceOutcome::Ignored,
            WashInput::Up => {
                self.pointer_held = false;
                TraceOutcome::Ignored
            }
        }
    }
}
