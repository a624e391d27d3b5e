//! GLSL program construction.
//!
//! A [`ShaderProgram`] is built from two or three stage sources:
//!
//! ```text
//!   StageSource ──read──▶ text ──compile──▶ stage handle ─┐
//!   StageSource ──read──▶ text ──compile──▶ stage handle ─┼─attach─▶ link ─▶ program
//!   StageSource ──read──▶ text ──compile──▶ stage handle ─┘ (geometry, optional)
//! ```
//!
//! A failure at any step is logged and recorded on the program but never
//! aborts construction: the program handle
//! is always returned so the render loop keeps running. Callers that need a
//! working program call [`ShaderProgram::ensure_linked`].
//!
//! All GL traffic goes through [`ShaderApi`], implemented for
//! `glow::Context`.

use std::fmt;
use std::path::PathBuf;

mod api;
#[cfg(test)]
pub(crate) mod fake;
mod program;
mod source;

pub use api::ShaderApi;
pub use program::{GlShaderProgram, ShaderProgram};
pub use source::{read_stage_source, ProgramSources, StageSource};

/// Pipeline stage a piece of GLSL is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// GL enum passed to `glCreateShader`.
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        }
    }

    /// Upper-case name used in diagnostic tags.
    pub fn tag(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
            ShaderStage::Geometry => "GEOMETRY",
        }
    }

    fn object_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex shader",
            ShaderStage::Fragment => "fragment shader",
            ShaderStage::Geometry => "geometry shader",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
            ShaderStage::Geometry => f.write_str("geometry"),
        }
    }
}

/// Everything that can go wrong while building a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source at '{}': {reason}", .path.display())]
    SourceRead {
        stage: ShaderStage,
        path: PathBuf,
        reason: String,
    },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {log}")]
    Link { log: String },
    #[error("driver refused to create a {object}: {reason}")]
    ObjectCreation {
        object: &'static str,
        reason: String,
    },
}

impl ShaderError {
    /// Fixed-prefix tag identifying the failing stage and category.
    pub fn tag(&self) -> String {
        match self {
            ShaderError::SourceRead { stage, .. } => {
                format!("ERROR::SHADER::{}::FILE_NOT_SUCCESSFULLY_READ", stage.tag())
            }
            ShaderError::Compile { stage, .. } => {
                format!("ERROR::SHADER::{}::COMPILATION_FAILED", stage.tag())
            }
            ShaderError::Link { .. } => "ERROR::SHADER::PROGRAM::LINKING_FAILED".to_string(),
            ShaderError::ObjectCreation { .. } => "ERROR::SHADER::OBJECT::CREATION_FAILED".to_string(),
        }
    }

    /// Stage the error belongs to, if it is stage specific.
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            ShaderError::SourceRead { stage, .. } | ShaderError::Compile { stage, .. } => {
                Some(*stage)
            }
            ShaderError::Link { .. } | ShaderError::ObjectCreation { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_name_stage_and_category() {
        let compile = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3: error".into(),
        };
        assert_eq!(compile.tag(), "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED");
        assert_eq!(compile.stage(), Some(ShaderStage::Fragment));

        let read = ShaderError::SourceRead {
            stage: ShaderStage::Geometry,
            path: PathBuf::from("missing.gs"),
            reason: "not found".into(),
        };
        assert_eq!(read.tag(), "ERROR::SHADER::GEOMETRY::FILE_NOT_SUCCESSFULLY_READ");
        assert!(read.to_string().contains("missing.gs"));

        let link = ShaderError::Link { log: String::new() };
        assert_eq!(link.tag(), "ERROR::SHADER::PROGRAM::LINKING_FAILED");
        assert_eq!(link.stage(), None);
    }

    #[test]
    fn stage_kinds_map_to_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_kind(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_kind(), glow::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Geometry.gl_kind(), glow::GEOMETRY_SHADER);
        assert_eq!(ShaderStage::Geometry.to_string(), "geometry");
    }
}
