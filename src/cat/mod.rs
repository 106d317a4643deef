pub mod behavior;

use std::sync::Arc;

use glam::Vec2;

use crate::assets::Bitmap;
use crate::config::{CANVAS_WIDTH, CAT_SITTING_Y, CAT_TARGET_X, FRAME_SIZE};
use crate::sprite::{AnimatedSprite, AnimationKey, AnimationTable};

pub type CatSprite = AnimatedSprite<CatAnimation>;

/// Rows of the cat sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatAnimation {
    SitBlink,
    SitTailWhip,
    SitGroomPaw,
    WalkLeft,
    WalkRight,
    Carried,
    InTub,
}

impl AnimationKey for CatAnimation {
    const ALL: &'static [Self] = &[
        Self::SitBlink,
        Self::SitTailWhip,
        Self::SitGroomPaw,
        Self::WalkLeft,
        Self::WalkRight,
        Self::Carried,
        Self::InTub,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::SitBlink => "sit-blink",
            Self::SitTailWhip => "sit-tail-whip",
            Self::SitGroomPaw => "sit-groom-paw",
            Self::WalkLeft => "walk-left",
            Self::WalkRight => "walk-right",
            Self::Carried => "carried",
            Self::InTub => "in-tub",
        }
    }

    fn row(self) -> u32 {
        self as u32
    }

    fn frame_count(self) -> u32 {
        match self {
            Self::SitBlink => 4,
            Self::SitTailWhip => 6,
            Self::SitGroomPaw => 15,
            Self::WalkLeft | Self::WalkRight => 9,
            Self::Carried | Self::InTub => 1,
        }
    }
}

/// Resting pose between idle animations.
pub const BASE_POSE: CatAnimation = CatAnimation::SitBlink;

/// Idle animations picked at random after each pause.
pub const SIT_ANIMATIONS: [CatAnimation; 3] = [
    CatAnimation::SitBlink,
    CatAnimation::SitTailWhip,
    CatAnimation::SitGroomPaw,
];

/// What the cat is doing. Owned by the scene; the behavior controller only
/// proposes the next value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatState {
    WalkingToSpot,
    SittingAtSpot,
    AnimatingAtSpot,
    Dragged,
    InTub,
    WalkingAway,
}

impl CatState {
    pub fn label(self) -> &'static str {
        match self {
            Self::WalkingToSpot => "Walking to spot",
            Self::SittingAtSpot => "Sitting",
            Self::AnimatingAtSpot => "Idling",
            Self::Dragged => "Carried",
            Self::InTub => "In tub",
            Self::WalkingAway => "Walking away",
        }
    }

    /// States whose updates come from outside the behavior controller.
    pub fn is_externally_driven(self) -> bool {
        matches!(self, Self::Dragged | Self::InTub)
    }

    /// States from which the player may pick the cat up.
    pub fn is_grabbable(self) -> bool {
        matches!(self, Self::SittingAtSpot | Self::AnimatingAtSpot | Self::InTub)
    }
}

/// Where the cat settles after walking in or being dropped.
pub fn sitting_spot() -> Vec2 {
    Vec2::new(CAT_TARGET_X, CAT_SITTING_Y)
}

/// Where the cat enters: just past the right canvas edge, walking left.
pub fn spawn_point() -> Vec2 {
    Vec2::new(CANVAS_WIDTH, CAT_SITTING_Y)
}

/// Fresh cat at the spawn point, first walk frame.
pub fn spawn_cat(image: Arc<Bitmap>, animations: Arc<AnimationTable<CatAnimation>>) -> CatSprite {
    CatSprite {
        image,
        pos: spawn_point(),
        size: Vec2::splat(FRAME_SIZE as f32),
        animation: CatAnimation::WalkLeft,
        frame: 0,
        last_frame_time: 0.0,
        animations,
    }
}

/// The same cat re-entering from the spawn point.
pub fn respawn(cat: &CatSprite, now: f64) -> CatSprite {
    cat.with_animation(CatAnimation::WalkLeft, now)
        .with_position(spawn_point())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_declaration_order() {
        for (i, anim) in CatAnimation::ALL.iter().enumerate() {
            assert_eq!(anim.index(), i);
        }
    }

    #[test]
    fn spawns_off_canvas_walking_left() {
        let cat = testing::cat();
        assert_eq!(cat.pos, Vec2::new(800.0, 32.0));
        assert_eq!(cat.animation, CatAnimation::WalkLeft);
        assert_eq!(cat.frame, 0);
        assert_eq!(cat.frame_count(), 9);
    }

    #[test]
    fn groom_paw_reads_row_two() {
        let cat = testing::cat().with_animation(CatAnimation::SitGroomPaw, 0.0);
        let frame = cat.current_frame().unwrap();
        assert_eq!((frame.x, frame.y), (0, 192));
        assert_eq!(cat.frame_count(), 15);
    }

    #[test]
    fn grabbable_states() {
        assert!(CatState::SittingAtSpot.is_grabbable());
        assert!(CatState::InTub.is_grabbable());
        assert!(!CatState::WalkingToSpot.is_grabbable());
        assert!(!CatState::WalkingAway.is_grabbable());
        assert!(!CatState::Dragged.is_grabbable());
    }

    #[test]
    fn carried_and_bathing_cats_are_driven_by_the_scene() {
        assert!(CatState::Dragged.is_externally_driven());
        assert!(CatState::InTub.is_externally_driven());
        assert!(!CatState::SittingAtSpot.is_externally_driven());
        assert!(!CatState::WalkingAway.is_externally_driven());
    }
}
