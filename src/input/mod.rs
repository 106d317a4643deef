//! Pointer-to-drag translation.
//!
//! The controller knows nothing about game state: the caller supplies the
//! draggable target's bounds and a permission check on press, and gets back
//! semantic drag events in canvas coordinates. Moves and releases are fed
//! from the whole window, so a drag survives the pointer leaving the canvas.

use glam::Vec2;

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sprite::Bounds;

/// Maps window pixels onto the fixed logical canvas stretched over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    pub canvas_size: Vec2,
    pub displayed_size: Vec2,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        let canvas = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        Self::new(canvas, canvas)
    }
}

impl CanvasViewport {
    pub fn new(canvas_size: Vec2, displayed_size: Vec2) -> Self {
        Self {
            canvas_size,
            displayed_size,
        }
    }

    /// Canvas pixels per displayed pixel on each axis. A collapsed window
    /// maps 1:1.
    pub fn scale(&self) -> Vec2 {
        if self.displayed_size.x <= 0.0 || self.displayed_size.y <= 0.0 {
            return Vec2::ONE;
        }
        self.canvas_size / self.displayed_size
    }

    pub fn to_canvas(&self, client: Vec2) -> Vec2 {
        client * self.scale()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// A drag began; `offset` is the grab point relative to the target's
    /// top-left corner.
    Start { offset: Vec2 },
    /// New top-left position for the dragged target, grab offset applied.
    Move { pos: Vec2 },
    End,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    grab_offset: Vec2,
}

/// At most one drag session at a time.
#[derive(Debug, Default)]
pub struct DragController {
    viewport: CanvasViewport,
    session: Option<DragSession>,
}

impl DragController {
    pub fn set_viewport(&mut self, viewport: CanvasViewport) {
        self.viewport = viewport;
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start a drag if none is active, `can_drag` allows it and `client`
    /// lands on `target`. The permission check runs only when no session is
    /// active.
    pub fn pointer_down(
        &mut self,
        client: Vec2,
        target: Bounds,
        can_drag: impl FnOnce() -> bool,
    ) -> Option<DragEvent> {
        if self.session.is_some() || !can_drag() {
            return None;
        }
        let pos = self.viewport.to_canvas(client);
        if !target.contains(pos) {
            return None;
        }
        let grab_offset = pos - target.min;
        self.session = Some(DragSession { grab_offset });
        Some(DragEvent::Start {
            offset: grab_offset,
        })
    }

    pub fn pointer_move(&mut self, client: Vec2) -> Option<DragEvent> {
        let session = self.session?;
        let pos = self.viewport.to_canvas(client) - session.grab_offset;
        Some(DragEvent::Move { pos })
    }

    /// Ends the active session, wherever the pointer is.
    pub fn pointer_up(&mut self) -> Option<DragEvent> {
        self.session.take().map(|_| DragEvent::End)
    }
}
