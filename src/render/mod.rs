pub mod canvas;
pub mod instance;
pub mod pipeline;

use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window;

pub use self::canvas::{Canvas, DrawRun, SpriteBatch};

use self::instance::SpriteInstance;
use self::pipeline::{SpritePipeline, SpriteTexture, MAX_INSTANCES};
use crate::assets::ImageKey;
use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH, CLEAR_COLOR};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create window surface")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats on this adapter")]
    NoSurfaceFormat,
}

/// Core GPU state: device, queue, surface, sprite pipeline and the lazily
/// uploaded sheet textures.
pub struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub sprite_pipeline: SpritePipeline,
    textures: HashMap<ImageKey, SpriteTexture>,
    clear_color: wgpu::Color,
}

/// Intermediate frame state returned by `begin_frame`.
pub struct FrameContext {
    pub output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuState {
    /// Initialize wgpu and the sprite pipeline.
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        log::info!(
            "GPU adapter: {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("catbath_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);

        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Surface: format={:?}, alpha_mode={:?}", format, alpha_mode);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let sprite_pipeline = SpritePipeline::new(&device, format);
        // The canvas is a fixed logical size stretched over the window.
        sprite_pipeline.update_screen_size(&queue, CANVAS_WIDTH, CANVAS_HEIGHT);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            sprite_pipeline,
            textures: HashMap::new(),
            clear_color: clear_color(format.is_srgb()),
        })
    }

    /// Resize the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Upload any new sheets and this frame's instances. Returns the draw
    /// runs to replay in `draw_sprites`.
    pub fn prepare_sprites(&mut self, batch: &SpriteBatch) -> Vec<DrawRun> {
        for cmd in batch.commands() {
            if !self.textures.contains_key(&cmd.image.key) {
                let texture =
                    self.sprite_pipeline
                        .create_texture(&self.device, &self.queue, &cmd.image);
                log::debug!(
                    "Uploaded {}x{} sheet texture",
                    cmd.image.width,
                    cmd.image.height
                );
                self.textures.insert(cmd.image.key, texture);
            }
        }

        let instances: Vec<SpriteInstance> = batch
            .commands()
            .iter()
            .map(SpriteInstance::from_command)
            .collect();
        self.sprite_pipeline.update_instances(&self.queue, &instances);
        batch.runs()
    }

    /// Acquire the next surface texture and create a command encoder.
    /// Returns None if the surface is lost/outdated (caller should skip this frame).
    pub fn begin_frame(&self) -> Option<FrameContext> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return None;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return None;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
                return None;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        Some(FrameContext {
            output,
            view,
            encoder,
        })
    }

    /// Clear to the canvas colour and replay the prepared runs in paint order.
    pub fn draw_sprites(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        runs: &[DrawRun],
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let p = &self.sprite_pipeline;
        if p.num_instances == 0 {
            return;
        }
        render_pass.set_pipeline(&p.pipeline);
        render_pass.set_bind_group(0, &p.screen_bind_group, &[]);
        render_pass.set_vertex_buffer(0, p.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, p.instance_buffer.slice(..));
        render_pass.set_index_buffer(p.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for run in runs {
            let Some(texture) = self.textures.get(&run.image) else {
                continue;
            };
            let start = run.start.min(MAX_INSTANCES) as u32;
            let end = (run.start + run.len).min(MAX_INSTANCES) as u32;
            if start == end {
                continue;
            }
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(0..6, 0, start..end);
        }
    }

    /// Create an egui render pass that preserves existing content (LoadOp::Load).
    /// Returns a 'static render pass suitable for egui_wgpu::Renderer::render().
    pub fn begin_egui_pass(
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> wgpu::RenderPass<'static> {
        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.forget_lifetime()
    }

    /// Submit the command encoder and present.
    pub fn finish_frame(
        &self,
        encoder: wgpu::CommandEncoder,
        output: wgpu::SurfaceTexture,
        extra_cmd_bufs: Vec<wgpu::CommandBuffer>,
    ) {
        self.queue.submit(
            extra_cmd_bufs
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        output.present();
    }
}

/// Clear colour for the surface. sRGB targets expect linear values.
fn clear_color(srgb_target: bool) -> wgpu::Color {
    let [r, g, b] = if srgb_target {
        CLEAR_COLOR.map(srgb_to_linear)
    } else {
        CLEAR_COLOR
    };
    wgpu::Color { r, g, b, a: 1.0 }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
