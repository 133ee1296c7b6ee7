//! Application entrypoint: winit lifecycle around the glyph viewer.
//!
//! Startup order matters for the failure policy: the font is loaded and the
//! initial glyph meshed *before* the event loop exists, so a bad font or an
//! unrenderable default symbol surfaces as an `Err` from [`run_viewer`] and
//! the process exits nonzero. Window and GPU come up in `resumed`; from then
//! on every failure is either recovered (surface errors, bad symbols) or
//! logged.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use log::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::font::FontFace;
use crate::font::tessellate::QualityTier;
use crate::render::glyph_renderer::{self, GlyphRenderer};
use crate::render::gpu::Gpu;
use crate::render::projection;
use crate::viewer::GlyphViewer;
use crate::viewer::input::{self, Command};

/// Symbol shown before the user types anything.
pub const DEFAULT_SYMBOL: char = 'a';

/// System families tried when no font path is given, most specific first.
const DEFAULT_FAMILIES: &[&str] = &["Times New Roman", "Liberation Serif", "serif"];

/// Startup options, normally assembled from the command line.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Font file to load; `None` resolves a system serif face.
    pub font_path: Option<PathBuf>,
    pub symbol: char,
    pub quality: QualityTier,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            symbol: DEFAULT_SYMBOL,
            quality: QualityTier::default(),
        }
    }
}

/// Load the font, build the viewer, and run the event loop to completion.
pub fn run_viewer(options: ViewerOptions) -> anyhow::Result<()> {
    let face = match &options.font_path {
        Some(path) => FontFace::load(path)
            .with_context(|| format!("failed to load font {}", path.display()))?,
        None => {
            let families: Vec<String> =
                DEFAULT_FAMILIES.iter().map(|s| (*s).to_string()).collect();
            FontFace::from_system(&families).context("failed to resolve a system font")?
        }
    };

    info!(
        "font: {} ({} units/em)",
        face.family_name().unwrap_or_else(|| "<unnamed>".to_string()),
        face.units_per_em()
    );

    let viewer = GlyphViewer::new(face, options.symbol, options.quality)
        .with_context(|| format!("cannot display initial symbol {:?}", options.symbol))?;

    let event_loop = EventLoop::new().context("winit: failed to create event loop")?;
    // No animation: wake only for input and window events.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp {
        viewer,
        state: None,
    };
    event_loop.run_app(&mut app).context("winit: event loop failed")?;
    Ok(())
}

struct ViewerApp {
    viewer: GlyphViewer<FontFace>,
    state: Option<RenderState>,
}

/// Window-bound resources, created on `resumed`.
struct RenderState {
    window: Arc<Window>,
    gpu: Gpu,
    renderer: GlyphRenderer,
}

impl RenderState {
    fn render_frame(&mut self, viewer: &GlyphViewer<FontFace>) -> anyhow::Result<()> {
        if !self.gpu.can_render() {
            return Ok(());
        }

        let (surface_texture, view) = match self.gpu.acquire_frame() {
            Ok(v) => v,
            Err(
                wgpu::SurfaceError::Outdated
                | wgpu::SurfaceError::Lost
                | wgpu::SurfaceError::Other,
            ) => {
                self.gpu.resize(self.gpu.size);
                self.window.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                self.window.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow::anyhow!("wgpu SurfaceError::OutOfMemory"));
            }
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glyph_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glyph_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(glyph_renderer::BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let mvp = projection::ortho_matrix(self.gpu.size.width, self.gpu.size.height);
            self.renderer
                .draw(&self.gpu, &mut pass, viewer.current_mesh(), viewer.mode(), mvp);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }
}

/// Title reflecting the viewer state; the key hints mirror the input table.
fn window_title(viewer: &GlyphViewer<FontFace>) -> String {
    format!(
        "glyphscope [{}] {} (type a symbol, Space cycles mode, Esc quits)",
        viewer.active_symbol(),
        viewer.mode().label()
    )
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(WindowAttributes::default().with_title(window_title(&self.viewer)))
                .expect("winit: failed to create window"),
        );

        let gpu = pollster::block_on(Gpu::new(window.clone())).expect("failed to initialize GPU");
        let renderer = GlyphRenderer::new(&gpu);

        window.request_redraw();
        self.state = Some(RenderState {
            window,
            gpu,
            renderer,
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.gpu.resize(size);
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.state.is_pressed() {
                    return;
                }
                // Key repeats act like fresh presses; each press requests at
                // most one redraw.
                match input::command_for_key(&event.logical_key) {
                    Some(Command::Exit) => event_loop.exit(),
                    Some(Command::CycleMode) => {
                        let mode = self.viewer.advance_mode();
                        debug!("render mode: {}", mode.label());
                        state.window.set_title(&window_title(&self.viewer));
                        state.window.request_redraw();
                    }
                    Some(Command::SelectSymbol(ch)) => {
                        if let Err(err) = self.viewer.set_active_symbol(ch) {
                            warn!("cannot display {ch:?}: {err}");
                        }
                        state.window.set_title(&window_title(&self.viewer));
                        state.window.request_redraw();
                    }
                    None => {}
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = state.render_frame(&self.viewer) {
                    warn!("render error: {err:#}");
                }
            }
            _ => {}
        }
    }
}
