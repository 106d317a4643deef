//! Autonomous cat behavior.
//!
//! `update_cat` is a pure step function: it reads the current sprite, state
//! and state-entry time and proposes a complete replacement, or `None` when
//! nothing changes this tick. It never touches the scene.

use super::{sitting_spot, CatSprite, CatState, BASE_POSE, SIT_ANIMATIONS};
use crate::config::{CAT_TARGET_X, PAUSE_DURATION, WALK_SPEED};

/// Source of the random idle-animation choice.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl RandomSource for fastrand::Rng {
    fn pick(&mut self, len: usize) -> usize {
        self.usize(0..len)
    }
}

/// Proposed next snapshot of the cat.
#[derive(Debug, Clone)]
pub struct CatStep {
    pub cat: CatSprite,
    pub state: CatState,
    /// Timestamp (ms) `state` was entered.
    pub state_since: f64,
}

/// Advance the cat one tick at time `now` (ms).
pub fn update_cat(
    cat: &CatSprite,
    state: CatState,
    state_since: f64,
    now: f64,
    rng: &mut impl RandomSource,
) -> Option<CatStep> {
    match state {
        CatState::Dragged | CatState::InTub => None,

        CatState::WalkingToSpot => {
            let next_x = cat.pos.x - WALK_SPEED;
            if cat.pos.x > CAT_TARGET_X && next_x > CAT_TARGET_X {
                Some(CatStep {
                    cat: stride(cat, now),
                    state,
                    state_since,
                })
            } else {
                Some(sit_down(cat, now))
            }
        }

        CatState::SittingAtSpot => {
            if now - state_since < PAUSE_DURATION {
                return None;
            }
            let pick = SIT_ANIMATIONS[rng.pick(SIT_ANIMATIONS.len())];
            log::debug!("cat starts {:?}", pick);
            Some(CatStep {
                cat: cat.with_animation(pick, now),
                state: CatState::AnimatingAtSpot,
                state_since: now,
            })
        }

        CatState::AnimatingAtSpot => {
            let corrected = frame_due(cat, now)?;
            let next = cat.frame + 1;
            if next < cat.frame_count() {
                Some(CatStep {
                    cat: CatSprite {
                        frame: next,
                        last_frame_time: corrected,
                        ..cat.clone()
                    },
                    state,
                    state_since,
                })
            } else {
                Some(CatStep {
                    cat: cat.with_animation(BASE_POSE, now),
                    state: CatState::SittingAtSpot,
                    state_since: now,
                })
            }
        }

        CatState::WalkingAway => Some(CatStep {
            cat: stride(cat, now),
            state,
            state_since,
        }),
    }
}

/// Step left by the walk speed, cycling the walk animation.
fn stride(cat: &CatSprite, now: f64) -> CatSprite {
    let mut next = cat.clone();
    next.pos.x -= WALK_SPEED;
    if let Some(corrected) = frame_due(cat, now) {
        next.frame = (cat.frame + 1) % cat.frame_count();
        next.last_frame_time = corrected;
    }
    next
}

fn sit_down(cat: &CatSprite, now: f64) -> CatStep {
    CatStep {
        cat: cat.with_animation(BASE_POSE, now).with_position(sitting_spot()),
        state: CatState::SittingAtSpot,
        state_since: now,
    }
}

/// If the current frame has been shown for at least one frame delay, the
/// new frame start time. The remainder past the last whole delay is kept so
/// uneven tick lengths don't slow the animation down.
fn frame_due(cat: &CatSprite, now: f64) -> Option<f64> {
    let delay = cat.current_animation().frame_delay;
    let elapsed = now - cat.last_frame_time;
    (elapsed >= delay).then(|| now - elapsed % delay)
}
