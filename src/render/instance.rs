use bytemuck::{Pod, Zeroable};

use super::canvas::DrawCommand;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in canvas pixels.
    pub position: [f32; 2],
    /// Draw size in canvas pixels.
    pub size: [f32; 2],
    /// Source rect in normalized sheet coordinates.
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

impl SpriteInstance {
    pub fn from_command(cmd: &DrawCommand) -> Self {
        let sheet_w = cmd.image.width.max(1) as f32;
        let sheet_h = cmd.image.height.max(1) as f32;
        let src = cmd.src;
        Self {
            position: cmd.dest.min.into(),
            size: cmd.dest.size.into(),
            uv_min: [src.x as f32 / sheet_w, src.y as f32 / sheet_h],
            uv_max: [
                (src.x + src.width) as f32 / sheet_w,
                (src.y + src.height) as f32 / sheet_h,
            ],
        }
    }
}
