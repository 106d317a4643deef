//! Sprite atlas model: how a sheet is sliced into named animations.
//!
//! Every sheet is a grid of square cells. Animation `a` occupies row
//! `a.row()` and its frame `i` is the cell in column `i`. Animation
//! identifiers are closed enums per entity kind, and a table is validated
//! against the decoded sheet when it is built, so an unknown or truncated
//! animation is a load-time error rather than a silent draw skip.

pub mod animated;

use std::fmt;
use std::hash::Hash;

use glam::Vec2;

pub use animated::{AnimatedSprite, StaticSprite};

/// Source rectangle inside a sheet, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteFrame {
    /// Cell `(col, row)` of a grid with square cells of `size` pixels.
    pub fn cell(col: u32, row: u32, size: u32) -> Self {
        Self {
            x: col * size,
            y: row * size,
            width: size,
            height: size,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// A closed set of animations for one entity kind.
///
/// `ALL[i].index() == i` must hold; tables are stored densely in that order.
pub trait AnimationKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn index(self) -> usize;
    fn name(self) -> &'static str;
    /// Sheet row holding this animation.
    fn row(self) -> u32;
    fn frame_count(self) -> u32;
}

/// One named animation: its frames in play order and per-frame delay (ms).
#[derive(Debug, Clone, PartialEq)]
pub struct Animation<K> {
    pub key: K,
    pub frames: Vec<SpriteFrame>,
    pub frame_delay: f64,
}

impl<K: AnimationKey> Animation<K> {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<SpriteFrame> {
        self.frames.get(index).copied()
    }
}

/// Grid geometry shared by every animation on one sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    pub frame_size: u32,
    pub frame_delay: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AtlasError {
    #[error("animation `{name}` has no frames")]
    EmptyAnimation { name: &'static str },
    #[error("frame delay must be positive, got {delay}ms")]
    InvalidFrameDelay { delay: f64 },
    #[error(
        "animation `{name}` needs a {needed_w}x{needed_h} sheet, but the sheet is {sheet_w}x{sheet_h}"
    )]
    OutOfBounds {
        name: &'static str,
        needed_w: u32,
        needed_h: u32,
        sheet_w: u32,
        sheet_h: u32,
    },
}

/// Every animation of kind `K`, sliced from one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTable<K> {
    animations: Vec<Animation<K>>,
}

impl<K: AnimationKey> AnimationTable<K> {
    /// Slice all of `K::ALL` out of a `sheet_w` x `sheet_h` sheet.
    pub fn build(layout: AtlasLayout, sheet_w: u32, sheet_h: u32) -> Result<Self, AtlasError> {
        if !(layout.frame_delay > 0.0) {
            return Err(AtlasError::InvalidFrameDelay {
                delay: layout.frame_delay,
            });
        }

        let size = layout.frame_size;
        let mut animations = Vec::with_capacity(K::ALL.len());
        for &key in K::ALL {
            debug_assert_eq!(key.index(), animations.len());

            let count = key.frame_count();
            if count == 0 {
                return Err(AtlasError::EmptyAnimation { name: key.name() });
            }

            let needed_w = count * size;
            let needed_h = (key.row() + 1) * size;
            if needed_w > sheet_w || needed_h > sheet_h {
                return Err(AtlasError::OutOfBounds {
                    name: key.name(),
                    needed_w,
                    needed_h,
                    sheet_w,
                    sheet_h,
                });
            }

            animations.push(Animation {
                key,
                frames: (0..count)
                    .map(|i| SpriteFrame::cell(i, key.row(), size))
                    .collect(),
                frame_delay: layout.frame_delay,
            });
        }

        Ok(Self { animations })
    }

    pub fn get(&self, key: K) -> &Animation<K> {
        let animation = &self.animations[key.index()];
        debug_assert_eq!(animation.key, key);
        animation
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Door {
        Shut,
        Swing,
    }

    impl AnimationKey for Door {
        const ALL: &'static [Self] = &[Door::Shut, Door::Swing];

        fn index(self) -> usize {
            self as usize
        }
        fn name(self) -> &'static str {
            match self {
                Door::Shut => "door-shut",
                Door::Swing => "door-swing",
            }
        }
        fn row(self) -> u32 {
            match self {
                Door::Shut => 0,
                Door::Swing => 2,
            }
        }
        fn frame_count(self) -> u32 {
            match self {
                Door::Shut => 1,
                Door::Swing => 3,
            }
        }
    }

    const LAYOUT: AtlasLayout = AtlasLayout {
        frame_size: 10,
        frame_delay: 100.0,
    };

    #[test]
    fn slices_rows_and_columns() {
        let table = AnimationTable::<Door>::build(LAYOUT, 30, 30).unwrap();
        let swing = table.get(Door::Swing);
        assert_eq!(swing.frame_count(), 3);
        assert_eq!(
            swing.frame(2),
            Some(SpriteFrame {
                x: 20,
                y: 20,
                width: 10,
                height: 10
            })
        );
        assert_eq!(swing.frame(3), None);
        assert_eq!(table.get(Door::Shut).frames[0].y, 0);
        assert_eq!(table.longest(Door::ALL), 300.0);
    }

    #[test]
    fn rejects_sheet_too_small() {
        let err = AnimationTable::<Door>::build(LAYOUT, 30, 20).unwrap_err();
        assert_eq!(
            err,
            AtlasError::OutOfBounds {
                name: "door-swing",
                needed_w: 30,
                needed_h: 30,
                sheet_w: 30,
                sheet_h: 20,
            }
        );
    }

    #[test]
    fn rejects_non_positive_delay() {
        let layout = AtlasLayout {
            frame_size: 10,
            frame_delay: 0.0,
        };
        assert!(matches!(
            AnimationTable::<Door>::build(layout, 30, 30),
            Err(AtlasError::InvalidFrameDelay { .. })
        ));
    }

    #[test]
    fn bounds_are_inclusive() {
        let b = Bounds::new(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0));
        assert!(b.contains(Vec2::new(10.0, 15.0)));
        assert!(!b.contains(Vec2::new(15.1, 12.0)));
        assert_eq!(b.center(), Vec2::new(12.5, 12.5));
    }
}
