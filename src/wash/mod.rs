//! Wash minigame: trace each body part in order until the cat is clean.

pub mod hitbox;
pub mod session;

use std::collections::HashSet;

use glam::Vec2;

pub use hitbox::{BodyPart, GridCell};
pub use session::{WashInput, WashMinigame};

use crate::sprite::SpriteFrame;

/// Result of one traced pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Off target, already traced, or the game is over.
    Ignored,
    /// A new cell of the current part.
    Hit,
    /// The named part is done; the next one is now the target.
    PartComplete(BodyPart),
    /// The last part is done.
    GameComplete,
}

/// Progress of one wash. `completed` is always a prefix of
/// [`BodyPart::SEQUENCE`] and `hit_cells` only ever holds cells of
/// `current_part`.
#[derive(Debug, Clone, PartialEq)]
pub struct WashGame {
    current_part: BodyPart,
    completed: Vec<BodyPart>,
    scrub_count: u32,
    complete: bool,
    hit_cells: HashSet<GridCell>,
}

impl Default for WashGame {
    fn default() -> Self {
        Self::new()
    }
}

impl WashGame {
    pub fn new() -> Self {
        Self {
            current_part: BodyPart::SEQUENCE[0],
            completed: Vec::with_capacity(BodyPart::SEQUENCE.len()),
            scrub_count: 0,
            complete: false,
            hit_cells: HashSet::new(),
        }
    }

    pub fn current_part(&self) -> BodyPart {
        self.current_part
    }

    pub fn completed(&self) -> &[BodyPart] {
        &self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Samples that landed on the current part, repeats included.
    pub fn scrub_count(&self) -> u32 {
        self.scrub_count
    }

    pub fn hit_cells(&self) -> &HashSet<GridCell> {
        &self.hit_cells
    }

    /// Sheet rect for the current progress milestone.
    pub fn sprite_frame(&self) -> SpriteFrame {
        SpriteFrame::cell(0, hitbox::sprite_row(&self.completed), hitbox::WASH_SPRITE_SIZE)
    }

    /// Trace the pointer at `pos` (sprite pixels).
    pub fn trace(&mut self, pos: Vec2) -> TraceOutcome {
        if self.complete {
            return TraceOutcome::Ignored;
        }

        let cell = hitbox::grid_cell(pos);
        if hitbox::part_at(cell) != Some(self.current_part) {
            return TraceOutcome::Ignored;
        }

        self.scrub_count += 1;
        if !self.hit_cells.insert(cell) {
            return TraceOutcome::Ignored;
        }
        if self.hit_cells.len() < self.current_part.required_hits() {
            return TraceOutcome::Hit;
        }

        let done = self.current_part;
        self.completed.push(done);
        self.hit_cells.clear();
        self.scrub_count = 0;
        match done.next() {
            Some(next) => {
                self.current_part = next;
                TraceOutcome::PartComplete(done)
            }
            None => {
                self.complete = true;
                TraceOutcome::GameComplete
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{cell_center, finishing_cells};
    use super::*;

    #[test]
    fn starts_dirty_on_head() {
        let game = WashGame::new();
        assert_eq!(game.current_part(), BodyPart::Head);
        assert!(game.completed().is_empty());
        assert!(!game.is_complete());
        assert_eq!(game.sprite_frame().y, 192);
    }

    #[test]
    fn off_target_is_ignored() {
        let mut game = WashGame::new();
        // A torso cell while the head is the target.
        assert_eq!(game.trace(cell_center(GridCell { x: 6, y: 7 })), TraceOutcome::Ignored);
        assert_eq!(game.trace(Vec2::new(-20.0, 500.0)), TraceOutcome::Ignored);
        assert!(game.hit_cells().is_empty());
        assert_eq!(game.scrub_count(), 0);
    }

    #[test]
    fn repeats_count_as_scrubs_not_hits() {
        let mut game = WashGame::new();
        let p = cell_center(BodyPart::Head.cells()[0]);
        assert_eq!(game.trace(p), TraceOutcome::Hit);
        assert_eq!(game.trace(p + Vec2::splat(2.0)), TraceOutcome::Ignored);
        assert_eq!(game.hit_cells().len(), 1);
        assert_eq!(game.scrub_count(), 2);
    }

    #[test]
    fn head_completes_at_threshold_and_resets_cells() {
        let mut game = WashGame::new();
        let cells = finishing_cells(BodyPart::Head);
        let (last, rest) = cells.split_last().unwrap();
        for p in rest {
            assert_eq!(game.trace(*p), TraceOutcome::Hit);
        }
        assert_eq!(game.trace(*last), TraceOutcome::PartComplete(BodyPart::Head));
        assert_eq!(game.current_part(), BodyPart::Torso);
        assert_eq!(game.completed(), &[BodyPart::Head]);
        assert!(game.hit_cells().is_empty());
        assert_eq!(game.scrub_count(), 0);
        assert_eq!(game.sprite_frame().y, 2 * 192);
    }

    #[test]
    fn full_wash_in_reverse_cell_order() {
        let mut game = WashGame::new();
        let mut outcomes = Vec::new();
        for part in BodyPart::SEQUENCE {
            let mut cells = finishing_cells(part);
            cells.reverse();
            for p in cells {
                outcomes.push(game.trace(p));
            }
            assert!(game.hit_cells().is_empty());
        }
        assert_eq!(outcomes.last(), Some(&TraceOutcome::GameComplete));
        assert!(game.is_complete());
        assert_eq!(game.completed(), &BodyPart::SEQUENCE);
        assert_eq!(game.sprite_frame().y, 0);
        assert_eq!(
            game.trace(cell_center(BodyPart::Tail.cells()[0])),
            TraceOutcome::Ignored
        );
    }
}
