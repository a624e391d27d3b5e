//! Renderer crate for the silhouette OpenGL demo.
//!
//! The crate glues the `winit` window, a `glutin` OpenGL 3.3 core context and
//! the shader/mesh setup together. The overall flow is:
//!
//! ```text
//!   CLI / silhouette
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ GlContext ──▶ Scene::new (3 ShaderPrograms, 2 Meshes)
//!          │
//!          └─▶ winit event loop ──▶ AppState (camera, keys, mouse, clock)
//!                                         │
//!                                         └─▶ Scene::draw ──▶ swap_buffers
//! ```
//!
//! [`shader::ShaderProgram`] is the reusable piece: it builds GLSL programs
//! through the [`shader::ShaderApi`] seam, logging every failure without
//! aborting. Everything else follows the GL call sequence the demo
//! needs.

pub mod camera;
mod context;
pub mod input;
pub mod mesh;
mod scene;
pub mod shader;
mod types;
mod window;

use anyhow::Result;

pub use camera::{Camera, CameraMovement, CameraSettings};
pub use context::GlContext;
pub use input::{AppState, InputOutcome};
pub use scene::{check_programs, ProgramReport, Scene};
pub use shader::{
    GlShaderProgram, ProgramSources, ShaderApi, ShaderError, ShaderProgram, ShaderStage,
    StageSource,
};
pub use types::{ProgramSet, RenderMode, RendererConfig, SceneSettings, WindowSettings};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Runs the interactive window or the link check, depending on the mode.
    ///
    /// Shader problems never make the interactive mode fail; only window or
    /// context creation errors do. Check mode fails when any program does
    /// not link.
    pub fn run(&mut self) -> Result<()> {
        match self.config.mode {
            RenderMode::Interactive => window::run_interactive(&self.config),
            RenderMode::Check => window::run_check(&self.config),
        }
    }
}
