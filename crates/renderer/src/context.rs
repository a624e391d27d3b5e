use std::num::NonZeroU32;

use anyhow::{anyhow, Context as AnyhowContext, Result};
use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// A window surface with a current OpenGL core context and loaded entry points.
///
/// Everything here must stay on the thread that created it.
pub struct GlContext {
    pub gl: glow::Context,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    size: PhysicalSize<u32>,
}

impl GlContext {
    pub fn new(window: &Window, vsync: bool) -> Result<Self> {
        let raw_display = window
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?
            .as_raw();
        let raw_window = window
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?
            .as_raw();

        let display = unsafe { Display::new(raw_display, display_preference(raw_window)) }
            .context("failed to open GL display")?;

        let template = ConfigTemplateBuilder::new()
            .with_depth_size(24)
            .with_transparency(false)
            .build();
        let config = unsafe { display.find_configs(template) }
            .context("failed to enumerate GL configs")?
            .reduce(|best, candidate| {
                if candidate.depth_size() > best.depth_size() {
                    candidate
                } else {
                    best
                }
            })
            .ok_or_else(|| anyhow!("no GL config with a depth buffer is available"))?;
        tracing::debug!(
            depth = config.depth_size(),
            samples = config.num_samples(),
            "selected GL config"
        );

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window,
            non_zero(size.width),
            non_zero(size.height),
        );
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create GL window surface")?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window));
        let context = unsafe { display.create_context(&config, &context_attributes) }
            .context("failed to create OpenGL 3.3 core context")?
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            tracing::warn!(%err, vsync, "failed to set swap interval");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };
        log_driver_info(&gl);

        Ok(Self {
            gl,
            surface,
            context,
            size,
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.width.max(1) as f32 / self.size.height.max(1) as f32
    }

    /// Resizes the surface and viewport. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.size = size;
        self.surface
            .resize(&self.context, non_zero(size.width), non_zero(size.height));
        unsafe {
            self.gl
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap GL buffers")
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

#[cfg(target_os = "windows")]
fn display_preference(raw_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(Some(raw_window))
}

#[cfg(target_os = "macos")]
fn display_preference(_raw_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_preference(_raw_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

fn log_driver_info(gl: &glow::Context) {
    let (vendor, renderer, version, glsl) = unsafe {
        (
            gl.get_parameter_string(glow::VENDOR),
            gl.get_parameter_string(glow::RENDERER),
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
        )
    };
    tracing::info!(%vendor, %renderer, %version, %glsl, "initialised OpenGL context");
}
