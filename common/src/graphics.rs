//! GPU device and presentation surface behind a lab window
//!
//! Every lab opens exactly one window. The surface is configured with an
//! sRGB format whenever the adapter offers one, since scene and egui colors
//! are written as linear values.

use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// Window, surface and device for one running lab
pub struct GraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub window: Arc<Window>,
}

impl GraphicsContext {
    pub async fn new(title: &str, width: u32, height: u32) -> Result<(Self, EventLoop<()>)> {
        let (window, event_loop) = open_lab_window(title, width, height)?;
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("lab window has no drawable surface")?;
        let (adapter, device, queue) = request_gpu(&instance, &surface).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = preferred_format(&caps.formats).context("adapter offers no surface format for the lab window")?;
        let (width, height) = surface_extent(size);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!("lab surface {}x{} as {:?}", width, height, format);

        let ctx = Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
        };
        Ok((ctx, event_loop))
    }

    /// Minimized windows report a zero size; the last surface is kept
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        (self.config.width, self.config.height) = surface_extent(new_size);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn aspect_ratio(&self) -> f32 {
        aspect_of(self.size)
    }
}

fn open_lab_window(title: &str, width: u32, height: u32) -> Result<(Arc<Window>, EventLoop<()>)> {
    let event_loop = EventLoop::new().context("cannot start the lab event loop")?;
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .with_context(|| format!("cannot open window \"{}\"", title))?;
    Ok((Arc::new(window), event_loop))
}

async fn request_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no GPU adapter can present to the lab window")?;
    log::info!("lab adapter: {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("Lab Device"),
            },
            None,
        )
        .await
        .context("lab adapter refused a device")?;
    Ok((adapter, device, queue))
}

/// First sRGB format offered, else whatever comes first
pub fn preferred_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// wgpu rejects zero-sized surfaces
fn surface_extent(size: PhysicalSize<u32>) -> (u32, u32) {
    (size.width.max(1), size.height.max(1))
}

pub fn aspect_of(size: PhysicalSize<u32>) -> f32 {
    let (width, height) = surface_extent(size);
    width as f32 / height as f32
}

/// Uniform buffer written once at creation and updated with `write_buffer`
pub fn create_uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(data),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_srgb_format_is_preferred() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(preferred_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(preferred_format(&[TextureFormat::Rgba16Float]), Some(TextureFormat::Rgba16Float));
        assert_eq!(preferred_format(&[]), None);
    }

    #[test]
    fn test_minimized_window_keeps_a_valid_extent() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 0)), (1, 1));
        assert_eq!(aspect_of(PhysicalSize::new(1280, 0)), 1280.0);
        assert!((aspect_of(PhysicalSize::new(1280, 720)) - 16.0 / 9.0).abs() < 1e-6);
    }
}
