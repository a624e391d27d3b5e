use tracing::{debug, error};

use super::source::read_stage_source;
use super::{ProgramSources, ShaderApi, ShaderError, ShaderStage, StageSource};

/// Program built against a live `glow` context.
pub type GlShaderProgram = ShaderProgram<glow::Program>;

/// A linked (or failed-to-link) GPU program.
///
/// The program owns its handle exclusively and never changes after
/// [`build`](Self::build). Diagnostics gathered while building are kept so
/// callers can inspect what went wrong without scraping logs.
#[derive(Debug)]
pub struct ShaderProgram<P> {
    handle: P,
    linked: bool,
    diagnostics: Vec<ShaderError>,
}

impl<P> ShaderProgram<P>
where
    P: Copy + PartialEq + std::fmt::Debug,
{
    /// Reads, compiles and links `sources` on the current context.
    ///
    /// Failures along the way are logged and recorded, and the program
    /// handle is returned anyway. A stage the driver refuses to create is
    /// left out and the program is reported as unlinked. The only error is
    /// the driver refusing to allocate the program object itself.
    pub fn build<A>(api: &A, sources: &ProgramSources) -> Result<Self, ShaderError>
    where
        A: ShaderApi<Program = P>,
    {
        let mut diagnostics = Vec::new();
        let mut stages = Vec::with_capacity(3);
        let mut missing = Vec::new();
        for (stage, source) in sources.stages() {
            match compile_stage(api, stage, source, &mut diagnostics) {
                Some(shader) => stages.push(shader),
                None => missing.push(stage),
            }
        }

        let handle = match api.create_program() {
            Ok(handle) => handle,
            Err(reason) => {
                release_stages(api, None, &stages);
                let err = ShaderError::ObjectCreation {
                    object: "program",
                    reason,
                };
                record(&mut diagnostics, err.clone());
                return Err(err);
            }
        };

        for &shader in &stages {
            api.attach_shader(handle, shader);
        }

        let linked = api.link_program(handle) && missing.is_empty();
        if linked {
            debug!(program = ?handle, stages = stages.len(), "linked shader program");
        } else {
            let mut log = api.program_info_log(handle).trim_end().to_string();
            if log.is_empty() {
                if let Some(stage) = missing.first() {
                    log = format!("{stage} stage could not be created");
                }
            }
            record(&mut diagnostics, ShaderError::Link { log });
        }

        // The program keeps its own copy of the compiled code once linked.
        release_stages(api, Some(handle), &stages);

        Ok(Self {
            handle,
            linked,
            diagnostics,
        })
    }

    pub fn handle(&self) -> P {
        self.handle
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Problems recorded during [`build`](Self::build).
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Turns a failed link into an error for callers that cannot render without it.
    pub fn ensure_linked(&self) -> Result<(), ShaderError> {
        if self.linked {
            return Ok(());
        }
        let link_error = self
            .diagnostics
            .iter()
            .find(|diagnostic| matches!(diagnostic, ShaderError::Link { .. }))
            .cloned();
        Err(link_error.unwrap_or(ShaderError::Link { log: String::new() }))
    }

    /// Installs the program for subsequent draw calls.
    pub fn use_program<A>(&self, api: &A)
    where
        A: ShaderApi<Program = P>,
    {
        api.use_program(Some(self.handle));
    }

    /// Looks up a uniform by name; undeclared or optimised-out names yield `None`.
    pub fn uniform_location<A>(&self, api: &A, name: &str) -> Option<A::UniformLocation>
    where
        A: ShaderApi<Program = P>,
    {
        api.uniform_location(self.handle, name)
    }

    pub fn delete<A>(self, api: &A)
    where
        A: ShaderApi<Program = P>,
    {
        api.delete_program(self.handle);
    }
}

/// Compiles one stage, returning `None` when the driver refuses the object.
fn compile_stage<A: ShaderApi>(
    api: &A,
    stage: ShaderStage,
    source: &StageSource,
    diagnostics: &mut Vec<ShaderError>,
) -> Option<A::Shader> {
    let text = match read_stage_source(stage, source) {
        Ok(text) => text,
        Err(err) => {
            record(diagnostics, err);
            String::new()
        }
    };

    let shader = match api.create_shader(stage) {
        Ok(shader) => shader,
        Err(reason) => {
            record(
                diagnostics,
                ShaderError::ObjectCreation {
                    object: stage.object_name(),
                    reason,
                },
            );
            return None;
        }
    };

    if !api.compile_shader(shader, &text) {
        record(
            diagnostics,
            ShaderError::Compile {
                stage,
                log: api.shader_info_log(shader).trim_end().to_string(),
            },
        );
    }
    Some(shader)
}

fn release_stages<A: ShaderApi>(api: &A, program: Option<A::Program>, stages: &[A::Shader]) {
    for &shader in stages {
        if let Some(program) = program {
            api.detach_shader(program, shader);
        }
        api.delete_shader(shader);
    }
}

fn record(diagnostics: &mut Vec<ShaderError>, err: ShaderError) {
    error!(tag = %err.tag(), "{err}");
    diagnostics.push(err);
}
