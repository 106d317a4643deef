use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use crate::assets::{self, AssetError, FsAssetSource, LoadedAssets};
use crate::config::{self, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::input::CanvasViewport;
use crate::overlay::timer::FramePhase;
use crate::overlay::{HudAction, HudSnapshot, Overlay};
use crate::render::{FrameContext, GpuState, SpriteBatch};
use crate::cat::behavior::RandomSource;
use crate::scene::Scene;

/// Messages from background work back onto the event loop.
#[derive(Debug)]
pub enum AppEvent {
    AssetsLoaded(Box<Result<LoadedAssets, AssetError>>),
}

/// Pointer affordance for the scene's current phase.
fn cursor_for<R: RandomSource>(scene: &Scene<R>) -> CursorIcon {
    if scene.is_loading() {
        CursorIcon::Wait
    } else if scene.is_dragging() {
        CursorIcon::Grabbing
    } else {
        CursorIcon::Default
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    proxy: EventLoopProxy<AppEvent>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    scene: Scene,
    /// Reused each frame to record the scene's draws.
    batch: SpriteBatch,

    started: Instant,
    last_frame_time: Option<Instant>,
    /// Last cursor position in window pixels.
    cursor: Vec2,
    cursor_icon: CursorIcon,
}

impl App {
    fn new(proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            proxy,
            window: None,
            gpu: None,
            overlay: None,
            scene: Scene::new(fastrand::Rng::new()),
            batch: SpriteBatch::new(),
            started: Instant::now(),
            last_frame_time: None,
            cursor: Vec2::ZERO,
            cursor_icon: CursorIcon::Default,
        }
    }

    /// Decode sprite sheets off the event loop; the result comes back as an
    /// `AppEvent`.
    fn spawn_asset_loader(&self) {
        let proxy = self.proxy.clone();
        let root = config::asset_root();
        log::info!("Loading assets from {}", root.display());

        let spawned = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                let result = assets::load_game_assets(&FsAssetSource::new(root));
                if proxy
                    .send_event(AppEvent::AssetsLoaded(Box::new(result)))
                    .is_err()
                {
                    log::debug!("Event loop closed before assets arrived");
                }
            });
        if let Err(e) = spawned {
            log::error!("Failed to start asset loader: {e}");
        }
    }

    fn update_viewport(&mut self, width: u32, height: u32) {
        self.scene.set_viewport(CanvasViewport::new(
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            Vec2::new(width as f32, height as f32),
        ));
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.teardown();
        event_loop.exit();
    }

    fn apply(&mut self, action: HudAction) {
        match action {
            HudAction::OpenWash => {
                self.scene.open_wash();
            }
            HudAction::Wash(input) => self.scene.wash_input(input),
            HudAction::CloseWash => self.scene.close_wash(),
        }
    }

    /// Update, draw, overlay, present.
    fn redraw(&mut self) {
        let (Some(window), Some(gpu), Some(overlay)) =
            (self.window.as_ref(), self.gpu.as_mut(), self.overlay.as_mut())
        else {
            return;
        };

        // --- Timing ---
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            overlay.stats.record(now.duration_since(last).as_secs_f64());
        }
        self.last_frame_time = Some(now);
        let real_ms = now.duration_since(self.started).as_secs_f64() * 1000.0;

        // --- Update ---
        let phase = Instant::now();
        self.scene.tick(real_ms);
        for event in self.scene.drain_events() {
            log::info!("Scene event: {:?}", event);
        }
        overlay.timers.record(FramePhase::Update, phase.elapsed());

        // --- Draw ---
        let phase = Instant::now();
        self.scene.draw(&mut self.batch);
        let runs = gpu.prepare_sprites(&self.batch);
        overlay.timers.record(FramePhase::Draw, phase.elapsed());

        let Some(FrameContext {
            output,
            view,
            mut encoder,
        }) = gpu.begin_frame()
        else {
            return;
        };
        gpu.draw_sprites(&mut encoder, &view, &runs);

        // --- Overlay ---
        let phase = Instant::now();
        let hud = HudSnapshot::capture(&self.scene);
        let size = window.inner_size();
        let frame = overlay.run_frame(window, size.width, size.height, &hud);
        let extra = overlay.prepare(&gpu.device, &gpu.queue, &mut encoder, &frame);
        {
            let mut pass = GpuState::begin_egui_pass(&mut encoder, &view);
            overlay.render(&mut pass, &frame);
        }
        overlay.timers.record(FramePhase::Overlay, phase.elapsed());

        // --- Submit ---
        let phase = Instant::now();
        gpu.finish_frame(encoder, output, extra);
        overlay.timers.record(FramePhase::Submit, phase.elapsed());
        overlay.free_textures(&frame.textures_delta);

        for action in frame.actions {
            self.apply(action);
        }

        let icon = cursor_for(&self.scene);
        if icon != self.cursor_icon {
            if let Some(window) = &self.window {
                window.set_cursor(icon);
            }
            self.cursor_icon = icon;
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Cat Bath")
            .with_inner_size(winit::dpi::LogicalSize::new(CANVAS_WIDTH, CANVAS_HEIGHT));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        // Set before GPU init so a failed start still shows the wait cursor.
        self.cursor_icon = cursor_for(&self.scene);
        window.set_cursor(self.cursor_icon);

        let size = window.inner_size();
        self.update_viewport(size.width, size.height);
        log::info!("Window created: {}x{}", size.width, size.height);

        // Without a surface there is nothing to draw into: the scene stays
        // loading and the loop never starts.
        let gpu = match GpuState::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("Failed to initialize rendering: {e}");
                self.window = Some(window);
                event_loop.set_control_flow(ControlFlow::Wait);
                return;
            }
        };
        log::info!("wgpu + sprite pipeline initialized");

        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);
        self.window = Some(window);

        self.spawn_asset_loader();

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::AssetsLoaded(result) => self.scene.on_assets_loaded(*result),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.gpu.is_none() {
            return;
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.update_viewport(new_size.width, new_size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.scene.pointer_move(self.cursor);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    let over_ui = consumed
                        || self.overlay.as_ref().is_some_and(|o| o.wants_pointer());
                    if !over_ui {
                        self.scene.pointer_down(self.cursor);
                    }
                }
                // Releases end a drag wherever they happen.
                ElementState::Released => self.scene.pointer_up(),
            },
            WindowEvent::Focused(false) => self.scene.pointer_up(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::F12 => {
                    if let Some(overlay) = &mut self.overlay {
                        overlay.toggle_debug();
                    }
                }
                KeyCode::Escape => {
                    log::info!("ESC pressed, exiting");
                    self.shutdown(event_loop);
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Create the event loop and run until the window closes.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let mut app = App::new(event_loop.create_proxy());
    event_loop.run_app(&mut app)?;
    Ok(())
}
