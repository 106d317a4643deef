use std::sync::Arc;

use glam::Vec2;

use crate::assets::Bitmap;
use crate::config::{TUB_DEFAULT_X, TUB_DEFAULT_Y, TUB_FRAME_SIZE};
use crate::sprite::{AnimatedSprite, AnimationKey, AnimationTable, Bounds};

pub type TubSprite = AnimatedSprite<TubAnimation>;

/// Rows of the tub sheet, one frame each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TubAnimation {
    Empty,
    Filled,
}

impl AnimationKey for TubAnimation {
    const ALL: &'static [Self] = &[Self::Empty, Self::Filled];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Empty => "tub-empty",
            Self::Filled => "tub-filled",
        }
    }

    fn row(self) -> u32 {
        self as u32
    }

    fn frame_count(self) -> u32 {
        1
    }
}

/// The tub at its fixed spot in the middle of the canvas, empty.
pub fn place_tub(image: Arc<Bitmap>, animations: Arc<AnimationTable<TubAnimation>>) -> TubSprite {
    TubSprite {
        image,
        pos: Vec2::new(TUB_DEFAULT_X, TUB_DEFAULT_Y),
        size: Vec2::splat(TUB_FRAME_SIZE as f32),
        animation: TubAnimation::Empty,
        frame: 0,
        last_frame_time: 0.0,
        animations,
    }
}

/// True when the center of `other` lies inside the tub.
pub fn holds(tub: &TubSprite, other: Bounds) -> bool {
    tub.bounds().contains(other.center())
}

/// Top-left position that centers a sprite of `size` on the tub.
pub fn seat(tub: &TubSprite, size: Vec2) -> Vec2 {
    tub.pos + (tub.size - size) * 0.5
}
