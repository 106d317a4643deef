pub mod hud;
pub mod timer;

use std::collections::VecDeque;
use std::sync::Arc;

use winit::window::Window;

pub use self::hud::{HudAction, HudSnapshot};

use self::hud::DebugStats;
use self::timer::PhaseTimers;
use crate::assets::{Bitmap, ImageKey};
use crate::render::GpuState;

/// Number of frame times to keep in the histogram.
const FRAME_HISTORY_LEN: usize = 240;
/// Seconds between FPS log lines.
const LOG_INTERVAL: f64 = 5.0;

/// Rolling frame-time statistics, logged every few seconds.
pub struct FrameStats {
    /// Newest frame times (seconds), oldest first.
    pub frame_times: VecDeque<f64>,
    pub fps: f64,
    pub frame_time_avg: f64,
    pub frame_time_min: f64,
    pub frame_time_max: f64,

    frame_count: u64,
    log_timer: f64,
    log_frame_count: u32,
    log_frame_sum: f64,
    log_frame_min: f64,
    log_frame_max: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FRAME_HISTORY_LEN),
            fps: 0.0,
            frame_time_avg: 0.0,
            frame_time_min: 0.0,
            frame_time_max: 0.0,
            frame_count: 0,
            log_timer: 0.0,
            log_frame_count: 0,
            log_frame_sum: 0.0,
            log_frame_min: f64::MAX,
            log_frame_max: 0.0,
        }
    }
}

impl FrameStats {
    /// Record a frame time (seconds). Returns true when a log line was due.
    pub fn record(&mut self, dt: f64) -> bool {
        self.frame_count += 1;
        if self.frame_times.len() == FRAME_HISTORY_LEN {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        let len = self.frame_times.len();
        let mut sum = 0.0;
        let mut min = f64::MAX;
        let mut max = 0.0f64;
        for &t in self.frame_times.iter() {
            sum += t;
            min = min.min(t);
            max = max.max(t);
        }
        self.frame_time_avg = sum / len as f64;
        self.frame_time_min = min;
        self.frame_time_max = max;
        self.fps = if self.frame_time_avg > 0.0 {
            1.0 / self.frame_time_avg
        } else {
            0.0
        };

        self.log_frame_count += 1;
        self.log_frame_sum += dt;
        self.log_frame_min = self.log_frame_min.min(dt);
        self.log_frame_max = self.log_frame_max.max(dt);
        self.log_timer += dt;

        if self.log_timer < LOG_INTERVAL {
            return false;
        }
        let avg_ms = (self.log_frame_sum / self.log_frame_count as f64) * 1000.0;
        let fps = self.log_frame_count as f64 / self.log_timer;
        log::info!(
            "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
            fps,
            avg_ms,
            self.log_frame_min * 1000.0,
            self.log_frame_max * 1000.0,
            self.frame_count,
        );
        self.log_timer = 0.0;
        self.log_frame_count = 0;
        self.log_frame_sum = 0.0;
        self.log_frame_min = f64::MAX;
        self.log_frame_max = 0.0;
        true
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Output of one egui frame, ready for upload and rendering.
pub struct OverlayFrame {
    pub primitives: Vec<egui::epaint::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
    pub actions: Vec<HudAction>,
}

/// egui layer: wash UI for the player, F12 debug panel for us.
pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    pub debug_visible: bool,
    pub stats: FrameStats,
    pub timers: PhaseTimers,

    wash_texture: Option<(ImageKey, egui::TextureHandle)>,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            debug_visible: false,
            stats: FrameStats::default(),
            timers: PhaseTimers::default(),
            wash_texture: None,
        }
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::debug!("Debug panel {}", if self.debug_visible { "shown" } else { "hidden" });
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Whether the pointer is over an egui widget or dragging one.
    pub fn wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input() || self.egui_ctx.is_pointer_over_area()
    }

    /// Run the egui frame for `hud` and collect the player's actions.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        hud: &HudSnapshot,
    ) -> OverlayFrame {
        self.sync_wash_texture(hud.wash_sheet.as_ref());
        let raw_input = self.egui_state.take_egui_input(window);

        let frame_times: Vec<f64> = self.stats.frame_times.iter().copied().collect();
        let stats = DebugStats {
            visible: self.debug_visible,
            fps: self.stats.fps,
            frame_time_avg: self.stats.frame_time_avg,
            frame_time_min: self.stats.frame_time_min,
            frame_time_max: self.stats.frame_time_max,
            frame_times: &frame_times,
            frame_count: self.stats.frame_count(),
            phases: &self.timers,
        };
        let texture = self.wash_texture.as_ref().map(|(_, handle)| handle);

        let mut actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = hud::draw_ui(ctx, hud, &stats, texture);
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, pixels_per_point);

        OverlayFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [screen_w, screen_h],
                pixels_per_point,
            },
            actions,
        }
    }

    /// Keep the egui copy of the wash sheet in step with the scene's.
    fn sync_wash_texture(&mut self, sheet: Option<&Arc<Bitmap>>) {
        let Some(sheet) = sheet else {
            self.wash_texture = None;
            return;
        };
        if matches!(&self.wash_texture, Some((key, _)) if *key == sheet.key) {
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [sheet.width as usize, sheet.height as usize],
            &sheet.rgba,
        );
        let handle = self
            .egui_ctx
            .load_texture("wash-sheet", image, egui::TextureOptions::NEAREST);
        self.wash_texture = Some((sheet.key, handle));
    }

    /// Upload egui textures and buffers. Call before the egui render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &frame.screen_descriptor,
        )
    }

    /// Render egui into the given render pass.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'static>, frame: &OverlayFrame) {
        self.egui_renderer
            .render(render_pass, &frame.primitives, &frame.screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_track_window() {
        let mut stats = FrameStats::default();
        stats.record(0.010);
        stats.record(0.030);
        assert!((stats.frame_time_avg - 0.020).abs() < 1e-12);
        assert_eq!(stats.frame_time_min, 0.010);
        assert_eq!(stats.frame_time_max, 0.030);
        assert!((stats.fps - 50.0).abs() < 1e-9);
        assert_eq!(stats.frame_count(), 2);
    }

    #[test]
    fn logs_every_five_seconds() {
        let mut stats = FrameStats::default();
        let logged: Vec<bool> = (0..12).map(|_| stats.record(1.0)).collect();
        let at: Vec<usize> = logged
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| l.then_some(i))
            .collect();
        assert_eq!(at, vec![4, 9]);
    }

    #[test]
    fn history_keeps_newest_frames() {
        let mut stats = FrameStats::default();
        for i in 0..FRAME_HISTORY_LEN + 3 {
            stats.record(i as f64 * 1e-4);
        }
        assert_eq!(stats.frame_times.len(), FRAME_HISTORY_LEN);
        assert_eq!(stats.frame_times.front().copied(), Some(3.0 * 1e-4));
    }

    #[test]
    fn zero_dt_does_not_divide_by_zero() {
        let mut stats = FrameStats::default();
        stats.record(0.0);
        assert_eq!(stats.fps, 0.0);
    }
}
