use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::camera::Camera;
use crate::context::GlContext;
use crate::input::{AppState, InputOutcome};
use crate::scene::{check_programs, Scene};
use crate::types::{RendererConfig, WindowSettings};

/// Opens the window and drives the `winit` event loop until it is closed.
///
/// The GL context, scene and [`AppState`] are moved into the event loop
/// closure; every GL call happens on this thread.
pub(crate) fn run_interactive(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window = build_window(&event_loop, &config.window, true)?;
    let mut gl_context = GlContext::new(&window, config.window.vsync)?;
    let mut scene = Some(Scene::new(
        &gl_context.gl,
        &config.programs,
        config.scene.clone(),
    )?);
    grab_cursor(&window);

    let mut app = AppState::new(
        Camera::new(config.camera),
        config.mouse_scale,
        Instant::now(),
    );

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => {
                        debug!(width = size.width, height = size.height, "window resized");
                        gl_context.resize(size);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                ..
                            },
                        ..
                    } => {
                        if app.handle_key(code, state) == InputOutcome::Exit {
                            info!("escape pressed; closing window");
                            elwt.exit();
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => app.handle_cursor_moved(position),
                    WindowEvent::MouseWheel { delta, .. } => app.handle_scroll(delta),
                    WindowEvent::RedrawRequested => {
                        app.begin_frame(Instant::now());
                        if let Some(scene) = scene.as_ref() {
                            scene.draw(&gl_context.gl, &app.camera, gl_context.aspect_ratio());
                        }
                        if let Err(err) = gl_context.swap_buffers() {
                            error!(error = %err, "failed to present frame");
                            elwt.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => window.request_redraw(),
                Event::LoopExiting => {
                    if let Some(scene) = scene.take() {
                        scene.delete(&gl_context.gl);
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop terminated with an error: {err}"))
}

/// Builds every program on a hidden window and fails if any did not link.
pub(crate) fn run_check(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window = build_window(&event_loop, &config.window, false)?;
    let gl_context = GlContext::new(&window, false)?;

    let reports = check_programs(&gl_context.gl, &config.programs)?;
    let mut failed = 0;
    for report in &reports {
        match &report.outcome {
            Ok(()) => info!(program = report.name, "program linked"),
            Err(err) => {
                failed += 1;
                error!(
                    program = report.name,
                    tag = %err.tag(),
                    diagnostics = report.diagnostics,
                    "{err}"
                );
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} shader programs failed to link", reports.len());
    }
    info!(programs = reports.len(), "all shader programs linked");
    Ok(())
}

fn build_window(
    event_loop: &EventLoop<()>,
    settings: &WindowSettings,
    visible: bool,
) -> Result<Window> {
    let (width, height) = settings.size;
    WindowBuilder::new()
        .with_title(settings.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(settings.resizable)
        .with_visible(visible)
        .build(event_loop)
        .context("failed to create window")
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        warn!(error = %err, "cursor grab unavailable; mouse look may stop at the window edge");
    }
    window.set_cursor_visible(false);
}
