//! What the overlay shows and what it can ask for.
//!
//! The app captures a [`HudSnapshot`] from the scene before each egui frame.
//! `draw_ui` reads only the snapshot and reports user intent as
//! [`HudAction`]s, which the app applies to the scene afterwards.

use std::sync::Arc;

use glam::Vec2;

use super::timer::{FramePhase, PhaseTimers};
use crate::assets::Bitmap;
use crate::cat::behavior::RandomSource;
use crate::scene::{LoadState, Scene};
use crate::sprite::SpriteFrame;
use crate::tub::TubAnimation;
use crate::wash::hitbox::{CELL_SIZE, WASH_SPRITE_SIZE};
use crate::wash::{BodyPart, GridCell, WashInput};

/// On-screen size of one wash sprite pixel.
pub const WASH_DISPLAY_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudAction {
    OpenWash,
    Wash(WashInput),
    CloseWash,
}

/// Read-only view of an open wash.
#[derive(Debug, Clone)]
pub struct WashView {
    pub source: SpriteFrame,
    pub completed: usize,
    pub current_part: BodyPart,
    pub complete: bool,
    pub hit_cells: Vec<GridCell>,
    pub scrub_count: u32,
}

#[derive(Debug, Clone)]
pub struct HudSnapshot {
    pub load_state: LoadState,
    pub wash_available: bool,
    pub wash: Option<WashView>,
    pub wash_sheet: Option<Arc<Bitmap>>,
    pub cat_state: &'static str,
    /// Cat's top-left corner in canvas pixels.
    pub cat_pos: Option<Vec2>,
    pub tub_filled: bool,
    pub sim_time_ms: f64,
    pub tick_count: u64,
    pub pending_timers: usize,
}

impl HudSnapshot {
    pub fn capture<R: RandomSource>(scene: &Scene<R>) -> Self {
        let wash = scene.wash().map(|w| {
            let game = w.game();
            WashView {
                source: game.sprite_frame(),
                completed: game.completed().len(),
                current_part: game.current_part(),
                complete: game.is_complete(),
                hit_cells: game.hit_cells().iter().copied().collect(),
                scrub_count: game.scrub_count(),
            }
        });
        Self {
            load_state: scene.load_state(),
            wash_available: scene.wash_available(),
            wash,
            wash_sheet: scene.wash_sheet().cloned(),
            cat_state: scene.cat_state().label(),
            cat_pos: scene.cat().map(|cat| cat.pos),
            tub_filled: scene
                .tub()
                .is_some_and(|tub| tub.animation == TubAnimation::Filled),
            sim_time_ms: scene.now(),
            tick_count: scene.tick_count(),
            pending_timers: scene.pending_timers(),
        }
    }
}

/// Frame statistics shown in the debug panel.
pub struct DebugStats<'a> {
    pub visible: bool,
    pub fps: f64,
    pub frame_time_avg: f64,
    pub frame_time_min: f64,
    pub frame_time_max: f64,
    pub frame_times: &'a [f64],
    pub frame_count: u64,
    pub phases: &'a PhaseTimers,
}

pub fn instruction(wash: &WashView) -> String {
    if wash.complete {
        "The cat is clean!".to_string()
    } else {
        format!("Wash the {}", wash.current_part.label())
    }
}

pub fn progress_text(completed: usize) -> String {
    format!("{} / {} parts cleaned", completed, BodyPart::SEQUENCE.len())
}

/// Pointer position on the displayed wash sprite, in sprite pixels.
pub fn sprite_point(sprite_min: egui::Pos2, pointer: egui::Pos2) -> Vec2 {
    Vec2::new(pointer.x - sprite_min.x, pointer.y - sprite_min.y) / WASH_DISPLAY_SCALE
}

/// Normalized source rect of `frame` in a `width` x `height` sheet.
pub fn uv_rect(frame: SpriteFrame, width: u32, height: u32) -> egui::Rect {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    egui::Rect::from_min_max(
        egui::pos2(frame.x as f32 / w, frame.y as f32 / h),
        egui::pos2(
            (frame.x + frame.width) as f32 / w,
            (frame.y + frame.height) as f32 / h,
        ),
    )
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

pub fn draw_ui(
    ctx: &egui::Context,
    hud: &HudSnapshot,
    stats: &DebugStats<'_>,
    wash_texture: Option<&egui::TextureHandle>,
) -> Vec<HudAction> {
    let mut actions = Vec::new();

    if hud.wash_available {
        egui::Area::new(egui::Id::new("wash_button"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                let button = egui::Button::new(egui::RichText::new("Wash the cat").size(18.0));
                if ui.add(button).clicked() {
                    actions.push(HudAction::OpenWash);
                }
            });
    }

    if let Some(wash) = &hud.wash {
        draw_wash_window(ctx, wash, hud.wash_sheet.as_deref(), wash_texture, &mut actions);
    }

    if stats.visible {
        draw_debug_panel(ctx, hud, stats);
    }

    actions
}

fn draw_wash_window(
    ctx: &egui::Context,
    wash: &WashView,
    sheet: Option<&Bitmap>,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Vec<HudAction>,
) {
    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgb(250, 246, 230))
        .corner_radius(8.0)
        .inner_margin(12.0);

    egui::Window::new("Bath time")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(40));
            ui.heading(instruction(wash));
            ui.add_space(6.0);

            let side = WASH_SPRITE_SIZE as f32 * WASH_DISPLAY_SCALE;
            let (response, painter) =
                ui.allocate_painter(egui::vec2(side, side), egui::Sense::drag());
            let rect = response.rect;

            match (texture, sheet) {
                (Some(texture), Some(sheet)) => {
                    let uv = uv_rect(wash.source, sheet.width, sheet.height);
                    painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
                }
                _ => {
                    painter.rect_filled(rect, 6.0, egui::Color32::from_gray(200));
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "cat sprite unavailable",
                        egui::FontId::proportional(14.0),
                        egui::Color32::from_gray(90),
                    );
                }
            }

            let cell = CELL_SIZE * WASH_DISPLAY_SCALE;
            for c in &wash.hit_cells {
                let min = rect.min + egui::vec2(c.x as f32 * cell, c.y as f32 * cell);
                painter.rect_filled(
                    egui::Rect::from_min_size(min, egui::vec2(cell, cell)),
                    0.0,
                    egui::Color32::from_rgba_unmultiplied(120, 200, 255, 90),
                );
            }

            if let Some(pointer) = response.interact_pointer_pos() {
                let pos = sprite_point(rect.min, pointer);
                if response.drag_started() {
                    actions.push(HudAction::Wash(WashInput::Down(pos)));
                }
                if response.dragged() {
                    actions.push(HudAction::Wash(WashInput::Move(pos)));
                }
            }
            if response.drag_stopped() {
                actions.push(HudAction::Wash(WashInput::Up));
            }

            ui.add_space(6.0);
            let total = BodyPart::SEQUENCE.len() as f32;
            ui.add(
                egui::ProgressBar::new(wash.completed as f32 / total)
                    .desired_width(side)
                    .text(progress_text(wash.completed)),
            );
            ui.add_space(4.0);
            if ui.button("Close").clicked() {
                actions.push(HudAction::CloseWash);
            }
        });
}

fn draw_debug_panel(ctx: &egui::Context, hud: &HudSnapshot, s: &DebugStats<'_>) {
    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .default_width(300.0)
        .resizable(true)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));

            // --- Performance ---
            ui.heading("Performance");
            ui.label(format!("FPS: {:.1} | frames: {}", s.fps, s.frame_count));
            ui.label(format!(
                "Frame: {:.2}ms avg | {:.2} min | {:.2} max",
                s.frame_time_avg * 1000.0,
                s.frame_time_min * 1000.0,
                s.frame_time_max * 1000.0,
            ));
            ui.add_space(4.0);

            // --- Frame time histogram ---
            if !s.frame_times.is_empty() {
                let max_time = s
                    .frame_times
                    .iter()
                    .copied()
                    .fold(0.0f64, f64::max)
                    .max(0.020);

                let (response, painter) =
                    ui.allocate_painter(egui::vec2(280.0, 50.0), egui::Sense::hover());
                let rect = response.rect;
                let bar_width = rect.width() / s.frame_times.len() as f32;

                for (i, &t) in s.frame_times.iter().enumerate() {
                    let h = (t / max_time) as f32 * rect.height();
                    let x = rect.left() + i as f32 * bar_width;
                    let color = if t > 0.01667 {
                        egui::Color32::from_rgb(255, 100, 80)
                    } else {
                        egui::Color32::from_rgb(80, 200, 120)
                    };
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(x, rect.bottom() - h),
                            egui::pos2(x + bar_width, rect.bottom()),
                        ),
                        0.0,
                        color,
                    );
                }
            }
            ui.add_space(4.0);

            // --- Phase timers ---
            ui.heading("Frame Phases");
            for phase in FramePhase::ALL {
                let us = s.phases.get(phase);
                ui.label(
                    egui::RichText::new(format!("{:<8} {:>6.0}us", phase.label(), us)).monospace(),
                );
            }
            ui.label(
                egui::RichText::new(format!("{:<8} {:>6.0}us", "Total", s.phases.total_us()))
                    .monospace(),
            );
            ui.add_space(4.0);

            // --- Scene ---
            ui.heading("Scene");
            ui.label(format!("Load: {:?}", hud.load_state));
            match hud.cat_pos {
                Some(pos) => ui.label(format!("Cat: {} at ({:.0}, {:.0})", hud.cat_state, pos.x, pos.y)),
                None => ui.label(format!("Cat: {}", hud.cat_state)),
            };
            ui.label(format!("Tub: {}", if hud.tub_filled { "filled" } else { "empty" }));
            ui.label(format!(
                "Sim time: {:.1}s | Ticks: {}",
                hud.sim_time_ms / 1000.0,
                hud.tick_count
            ));
            ui.label(format!("Pending timers: {}", hud.pending_timers));
            if let Some(wash) = &hud.wash {
                ui.label(format!(
                    "Wash: {} | cells {} / {} | strokes {}",
                    wash.current_part.label(),
                    wash.hit_cells.len(),
                    wash.current_part.required_hits(),
                    wash.scrub_count,
                ));
            }
            ui.add_space(4.0);
            ui.label("F12: Toggle | ESC: Quit");
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::loaded;
    use crate::cat::{self, CatState};

    #[test]
    fn texts_follow_progress() {
        let mut view = WashView {
            source: SpriteFrame::cell(0, 1, WASH_SPRITE_SIZE),
            completed: 2,
            current_part: BodyPart::FrontLeg,
            complete: false,
            hit_cells: Vec::new(),
            scrub_count: 0,
        };
        assert_eq!(instruction(&view), "Wash the front leg");
        assert_eq!(progress_text(view.completed), "2 / 5 parts cleaned");
        view.complete = true;
        assert_eq!(instruction(&view), "The cat is clean!");
    }

    #[test]
    fn pointer_maps_back_to_sprite_pixels() {
        let p = sprite_point(egui::pos2(100.0, 50.0), egui::pos2(118.0, 80.0));
        assert_eq!(p, Vec2::new(12.0, 20.0));
    }

    #[test]
    fn uv_selects_sheet_row() {
        let uv = uv_rect(SpriteFrame::cell(0, 2, 192), 192, 192 * 6);
        assert_eq!(uv.min, egui::pos2(0.0, 2.0 / 6.0));
        assert_eq!(uv.max, egui::pos2(1.0, 3.0 / 6.0));
    }

    #[test]
    fn snapshot_reflects_scene() {
        let mut scene = Scene::new(fastrand::Rng::with_seed(5));
        let hud = HudSnapshot::capture(&scene);
        assert_eq!(hud.load_state, LoadState::Loading);
        assert!(!hud.wash_available);
        assert!(hud.wash_sheet.is_none());
        assert!(hud.cat_pos.is_none());

        scene.on_assets_loaded(Ok(loaded()));
        let hud = HudSnapshot::capture(&scene);
        assert_eq!(hud.load_state, LoadState::Ready);
        assert_eq!(hud.cat_state, CatState::WalkingToSpot.label());
        assert!(hud.wash_sheet.is_some());
        assert!(hud.wash.is_none());
        assert_eq!(hud.cat_pos, Some(cat::spawn_point()));
        assert!(!hud.tub_filled);
    }
}
