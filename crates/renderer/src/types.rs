use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::camera::CameraSettings;
use crate::shader::{ProgramSources, StageSource};

/// What [`Renderer::run`](crate::Renderer::run) should do once the context is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Open the window and run the fly-camera loop.
    #[default]
    Interactive,
    /// Build every program on a hidden window, report link status, and exit.
    Check,
}

/// Window and swapchain options.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    /// Inner size in physical pixels.
    pub size: (u32, u32),
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            size: (800, 600),
            title: "LearnOpenGL".to_string(),
            resizable: false,
            vsync: true,
        }
    }
}

/// Sources for the three programs the scene draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSet {
    /// Lit cube.
    pub target: ProgramSources,
    /// Unlit light marker.
    pub light: ProgramSources,
    /// Silhouette edges; carries the geometry stage.
    pub outline: ProgramSources,
}

impl ProgramSet {
    /// The shipped file names, resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::default().resolved_against(dir)
    }

    pub fn resolved_against(&self, dir: &Path) -> Self {
        Self {
            target: self.target.resolved_against(dir),
            light: self.light.resolved_against(dir),
            outline: self.outline.resolved_against(dir),
        }
    }

    /// Programs paired with a display name, in draw order.
    pub fn named(&self) -> [(&'static str, &ProgramSources); 3] {
        [
            ("target", &self.target),
            ("light", &self.light),
            ("outline", &self.outline),
        ]
    }
}

impl Default for ProgramSet {
    fn default() -> Self {
        Self {
            target: ProgramSources::from_paths("target.vs", "target.fs"),
            light: ProgramSources::from_paths("light.vs", "light.fs"),
            outline: ProgramSources::from_paths("outline.vs", "outline.fs")
                .with_geometry(StageSource::path("outline.gs")),
        }
    }
}

/// Colours and placement for the objects in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub clear_color: [f32; 4],
    pub object_color: Vec3,
    pub light_color: Vec3,
    /// Used when the light does not follow the camera.
    pub light_position: Vec3,
    /// Light (and silhouette) from the eye position.
    pub light_follows_camera: bool,
    /// Uniform scale applied to the outline cube so edges sit outside the lit cube.
    pub outline_scale: f32,
    pub show_light_cube: bool,
}

impl SceneSettings {
    /// Where the light sits this frame, given the camera's eye position.
    pub fn light_position_for(&self, eye: Vec3) -> Vec3 {
        if self.light_follows_camera {
            eye
        } else {
            self.light_position
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.1, 1.0],
            object_color: Vec3::new(1.0, 0.5, 0.31),
            light_color: Vec3::new(1.0, 0.5, 1.0),
            light_position: Vec3::new(0.0, 0.0, 2.0),
            light_follows_camera: true,
            outline_scale: 1.2,
            show_light_cube: false,
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI flags and scene file: which shader files
/// to compile, how large the window is, and where the camera starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub window: WindowSettings,
    pub programs: ProgramSet,
    pub camera: CameraSettings,
    /// Factor applied to raw cursor offsets before camera sensitivity.
    pub mouse_scale: f32,
    pub scene: SceneSettings,
    pub mode: RenderMode,
}

impl Default for RendererConfig {
    /// An 800x600 interactive window reading shaders from `./shader`.
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            programs: ProgramSet::in_dir(&PathBuf::from("shader")),
            camera: CameraSettings::default(),
            mouse_scale: 0.1,
            scene: SceneSettings::default(),
            mode: RenderMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_programs_resolve_into_shader_dir() {
        let config = RendererConfig::default();
        assert_eq!(
            config.programs.target.vertex,
            StageSource::path(Path::new("shader").join("target.vs"))
        );
        assert_eq!(
            config.programs.outline.geometry,
            Some(StageSource::path(Path::new("shader").join("outline.gs")))
        );
        assert!(config.programs.light.geometry.is_none());
    }

    #[test]
    fn named_programs_follow_draw_order() {
        let names: Vec<_> = ProgramSet::default()
            .named()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(names, ["target", "light", "outline"]);
    }
}
