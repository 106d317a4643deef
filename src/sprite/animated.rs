use std::sync::Arc;

use glam::Vec2;

use super::{Animation, AnimationKey, AnimationTable, Bounds, SpriteFrame};
use crate::assets::Bitmap;

/// Runtime state of one animated sprite instance.
///
/// Cloning is cheap (sheet and table are shared), and callers replace the
/// whole value instead of patching fields, so a snapshot captured on an
/// earlier tick never changes underneath its holder.
#[derive(Debug, Clone)]
pub struct AnimatedSprite<K: AnimationKey> {
    pub image: Arc<Bitmap>,
    /// Top-left corner in canvas pixels.
    pub pos: Vec2,
    /// Draw size in canvas pixels.
    pub size: Vec2,
    pub animation: K,
    pub frame: usize,
    /// Timestamp (ms) the current frame started showing.
    pub last_frame_time: f64,
    pub animations: Arc<AnimationTable<K>>,
}

impl<K: AnimationKey> AnimatedSprite<K> {
    pub fn current_animation(&self) -> &Animation<K> {
        self.animations.get(self.animation)
    }

    pub fn frame_count(&self) -> usize {
        self.current_animation().frame_count()
    }

    /// Source rect for the current frame, or `None` when the frame index is
    /// out of range for the current animation.
    pub fn current_frame(&self) -> Option<SpriteFrame> {
        self.current_animation().frame(self.frame)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }

    /// Switch to `animation` at frame 0, starting its clock at `now`.
    pub fn with_animation(&self, animation: K, now: f64) -> Self {
        Self {
            animation,
            frame: 0,
            last_frame_time: now,
            ..self.clone()
        }
    }

    pub fn with_position(&self, pos: Vec2) -> Self {
        Self {
            pos,
            ..self.clone()
        }
    }
}

/// A fixed decoration: the whole bitmap stretched into a rectangle.
#[derive(Debug, Clone)]
pub struct StaticSprite {
    pub image: Arc<Bitmap>,
    pub pos: Vec2,
    pub size: Vec2,
}

impl StaticSprite {
    pub fn source(&self) -> SpriteFrame {
        SpriteFrame {
            x: 0,
            y: 0,
            width: self.image.width,
            height: self.image.height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }
}
