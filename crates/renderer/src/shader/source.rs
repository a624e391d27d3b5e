use std::fs;
use std::path::{Path, PathBuf};

use super::{ShaderError, ShaderStage};

/// Where a stage's GLSL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSource {
    /// Read from disk when the program is built.
    Path(PathBuf),
    /// Literal source text.
    Inline(String),
}

impl StageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn inline(source: impl Into<String>) -> Self {
        Self::Inline(source.into())
    }

    /// Joins relative paths onto `dir`; absolute paths and inline text pass through.
    pub fn resolved_against(&self, dir: &Path) -> Self {
        match self {
            Self::Path(path) if path.is_relative() && !path.as_os_str().is_empty() => {
                Self::Path(dir.join(path))
            }
            other => other.clone(),
        }
    }
}

/// Stage sources for one program. A geometry stage is attached only when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: StageSource,
    pub fragment: StageSource,
    pub geometry: Option<StageSource>,
}

impl ProgramSources {
    pub fn new(vertex: StageSource, fragment: StageSource) -> Self {
        Self {
            vertex,
            fragment,
            geometry: None,
        }
    }

    pub fn from_paths(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self::new(StageSource::path(vertex), StageSource::path(fragment))
    }

    pub fn with_geometry(mut self, geometry: StageSource) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn resolved_against(&self, dir: &Path) -> Self {
        Self {
            vertex: self.vertex.resolved_against(dir),
            fragment: self.fragment.resolved_against(dir),
            geometry: self
                .geometry
                .as_ref()
                .map(|source| source.resolved_against(dir)),
        }
    }

    /// Stages in compile order: vertex, fragment, then geometry if present.
    pub fn stages(&self) -> impl Iterator<Item = (ShaderStage, &StageSource)> {
        [
            Some((ShaderStage::Vertex, &self.vertex)),
            Some((ShaderStage::Fragment, &self.fragment)),
            self.geometry
                .as_ref()
                .map(|source| (ShaderStage::Geometry, source)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Loads the text for one stage.
pub fn read_stage_source(stage: ShaderStage, source: &StageSource) -> Result<String, ShaderError> {
    match source {
        StageSource::Inline(text) => Ok(text.clone()),
        StageSource::Path(path) if path.as_os_str().is_empty() => Err(ShaderError::SourceRead {
            stage,
            path: path.clone(),
            reason: "no path given".to_string(),
        }),
        StageSource::Path(path) => fs::read_to_string(path).map_err(|err| ShaderError::SourceRead {
            stage,
            path: path.clone(),
            reason: err.to_string(),
        }),
    }
}
