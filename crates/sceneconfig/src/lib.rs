use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

/// Largest field of view the camera zoom may reach, in degrees.
pub const MAX_ZOOM: f64 = 45.0;
pub const MIN_ZOOM: f64 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Scene file contents. Every section is optional and falls back to the
/// values the demo ships with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub shaders: ShaderSection,
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub scene: SceneSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShaderSection {
    /// Directory the program file names are relative to.
    pub dir: PathBuf,
    pub target: ProgramFiles,
    pub light: ProgramFiles,
    pub outline: ProgramFiles,
}

/// Stage file names for one program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgramFiles {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraSection {
    pub position: [f64; 3],
    pub yaw: f64,
    pub pitch: f64,
    pub speed: f64,
    pub sensitivity: f64,
    /// Applied to raw cursor deltas before `sensitivity`.
    pub mouse_scale: f64,
    pub zoom: f64,
    pub near: f64,
    pub far: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneSection {
    pub clear_color: [f64; 4],
    pub object_color: [f64; 3],
    pub light_color: [f64; 3],
    pub light_position: [f64; 3],
    pub light_follows_camera: bool,
    pub outline_scale: f64,
    pub show_light_cube: bool,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowSection::default(),
            shaders: ShaderSection::default(),
            camera: CameraSection::default(),
            scene: SceneSection::default(),
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "LearnOpenGL".into(),
            resizable: false,
            vsync: true,
        }
    }
}

impl Default for ShaderSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("shader"),
            target: ProgramFiles::new("target.vs", "target.fs"),
            light: ProgramFiles::new("light.vs", "light.fs"),
            outline: ProgramFiles::new("outline.vs", "outline.fs").with_geometry("outline.gs"),
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 3.0,
            sensitivity: 0.25,
            mouse_scale: 0.1,
            zoom: MAX_ZOOM,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.1, 1.0],
            object_color: [1.0, 0.5, 0.31],
            light_color: [1.0, 0.5, 1.0],
            light_position: [0.0, 0.0, 2.0],
            light_follows_camera: true,
            outline_scale: 1.2,
            show_light_cube: false,
        }
    }
}

impl ProgramFiles {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<PathBuf>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }
}

impl ShaderSection {
    /// Programs paired with their table name, in draw order.
    pub fn programs(&self) -> [(&'static str, &ProgramFiles); 3] {
        [
            ("target", &self.target),
            ("light", &self.light),
            ("outline", &self.outline),
        ]
    }
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates `path`, then anchors `shaders.dir` at the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_shader_dir(base);
        }
        Ok(config)
    }

    /// Joins a relative `shaders.dir` onto `base`. Absolute directories are kept.
    pub fn resolve_shader_dir(&mut self, base: &Path) {
        if self.shaders.dir.is_relative() {
            self.shaders.dir = base.join(&self.shaders.dir);
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let camera = &self.camera;
        let scene = &self.scene;
        let floats = [
            ("camera.position", camera.position.as_slice()),
            ("camera.yaw", std::slice::from_ref(&camera.yaw)),
            ("camera.pitch", std::slice::from_ref(&camera.pitch)),
            ("camera.speed", std::slice::from_ref(&camera.speed)),
            ("camera.sensitivity", std::slice::from_ref(&camera.sensitivity)),
            ("camera.mouse_scale", std::slice::from_ref(&camera.mouse_scale)),
            ("camera.zoom", std::slice::from_ref(&camera.zoom)),
            ("camera.near", std::slice::from_ref(&camera.near)),
            ("camera.far", std::slice::from_ref(&camera.far)),
            ("scene.clear_color", scene.clear_color.as_slice()),
            ("scene.object_color", scene.object_color.as_slice()),
            ("scene.light_color", scene.light_color.as_slice()),
            ("scene.light_position", scene.light_position.as_slice()),
            ("scene.outline_scale", std::slice::from_ref(&scene.outline_scale)),
        ];
        for (name, values) in floats {
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite, got {values:?}"
                )));
            }
        }

        if !(MIN_ZOOM..=MAX_ZOOM).contains(&camera.zoom) {
            return Err(ConfigError::Invalid(format!(
                "camera.zoom must be within [{MIN_ZOOM}, {MAX_ZOOM}], got {}",
                camera.zoom
            )));
        }

        if camera.near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.near must be > 0, got {}",
                camera.near
            )));
        }

        if camera.near >= camera.far {
            return Err(ConfigError::Invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                camera.near, camera.far
            )));
        }

        for (name, value) in [
            ("camera.speed", camera.speed),
            ("camera.sensitivity", camera.sensitivity),
            ("camera.mouse_scale", camera.mouse_scale),
            ("scene.outline_scale", self.scene.outline_scale),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be > 0, got {value}"
                )));
            }
        }

        Ok(())
    }
}
