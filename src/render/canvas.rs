use std::sync::Arc;

use crate::assets::{Bitmap, ImageKey};
use crate::sprite::{Bounds, SpriteFrame};

/// 2D drawing surface in logical canvas pixels.
pub trait Canvas {
    fn clear(&mut self);
    /// Copy `src` (sheet pixels) of `image` into `dest` (canvas pixels).
    /// Later draws paint over earlier ones.
    fn draw_image(&mut self, image: &Arc<Bitmap>, src: SpriteFrame, dest: Bounds);
}

#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub image: Arc<Bitmap>,
    pub src: SpriteFrame,
    pub dest: Bounds,
}

/// Consecutive draws sharing one bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRun {
    pub image: ImageKey,
    pub start: usize,
    pub len: usize,
}

/// Records draws in paint order for one frame.
#[derive(Debug, Default)]
pub struct SpriteBatch {
    commands: Vec<DrawCommand>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Group consecutive commands by bitmap. Runs are never merged across a
    /// different bitmap, so paint order is preserved.
    pub fn runs(&self) -> Vec<DrawRun> {
        let mut runs: Vec<DrawRun> = Vec::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.image == cmd.image.key => run.len += 1,
                _ => runs.push(DrawRun {
                    image: cmd.image.key,
                    start: i,
                    len: 1,
                }),
            }
        }
        runs
    }
}

impl Canvas for SpriteBatch {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw_image(&mut self, image: &Arc<Bitmap>, src: SpriteFrame, dest: Bounds) {
        self.commands.push(DrawCommand {
            image: Arc::clone(image),
            src,
            dest,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn runs_split_on_bitmap_change() {
        let a = Arc::new(Bitmap::blank(4, 4));
        let b = Arc::new(Bitmap::blank(4, 4));
        let src = SpriteFrame::cell(0, 0, 4);
        let dest = Bounds::new(Vec2::ZERO, Vec2::splat(4.0));

        let mut batch = SpriteBatch::new();
        batch.clear();
        for image in [&a, &a, &b, &a] {
            batch.draw_image(image, src, dest);
        }

        let runs = batch.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[0].image, runs[0].start, runs[0].len), (a.key, 0, 2));
        assert_eq!((runs[1].image, runs[1].len), (b.key, 1));
        assert_eq!((runs[2].image, runs[2].start), (a.key, 3));
    }

    #[test]
    fn clear_drops_previous_frame() {
        let a = Arc::new(Bitmap::blank(1, 1));
        let mut batch = SpriteBatch::new();
        batch.draw_image(&a, SpriteFrame::cell(0, 0, 1), Bounds::new(Vec2::ZERO, Vec2::ONE));
        batch.clear();
        assert!(batch.commands().is_empty());
        assert!(batch.runs().is_empty());
    }
}
