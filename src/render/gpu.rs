//! GPU context: instance, device, queue, and the window surface.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

/// Owns the wgpu device/queue and the surface tied to the viewer window.
pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_format: wgpu::TextureFormat,
    pub size: winit::dpi::PhysicalSize<u32>,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Bring up a GPU context for the given window.
    ///
    /// The surface is created first so adapter selection can be constrained
    /// to one that can actually present to it.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let size = window.inner_size();
        // The Arc keeps the window alive for as long as the surface.
        let surface = instance
            .create_surface(window)
            .context("wgpu: failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .context("wgpu: failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("wgpu: failed to request device")?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .first()
            .copied()
            .context("wgpu: surface reported no supported formats")?;

        let config = Self::make_surface_config(size, surface_format);
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            surface_format,
            size,
            config,
        })
    }

    /// Reconfigure the surface after a window resize.
    ///
    /// Zero-sized surfaces (minimized windows) are recorded but not
    /// configured; rendering skips those frames.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            self.config.width = 0;
            self.config.height = 0;
            return;
        }

        self.config = Self::make_surface_config(new_size, self.surface_format);
        self.surface.configure(&self.device, &self.config);
    }

    /// True when the surface has a drawable area.
    #[inline]
    pub fn can_render(&self) -> bool {
        self.config.width > 0 && self.config.height > 0
    }

    /// Acquire the next frame and an sRGB view onto it.
    ///
    /// Acquisition can fail transiently around resizes; the error is
    /// returned so the caller can reconfigure and retry.
    pub fn acquire_frame(
        &self,
    ) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });
        Ok((surface_texture, view))
    }

    fn make_surface_config(
        size: winit::dpi::PhysicalSize<u32>,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            view_formats: vec![surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: size.width,
            height: size.height,
            desired_maximum_frame_latency: 2,
            // The viewer redraws only on input; vsync is the right tradeoff.
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}
