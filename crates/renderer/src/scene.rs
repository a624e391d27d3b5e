use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use glow::HasContext;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::mesh::Mesh;
use crate::shader::{GlShaderProgram, ProgramSources, ShaderError, ShaderProgram};
use crate::types::{ProgramSet, SceneSettings};

const LIGHT_CUBE_SCALE: f32 = 0.2;

/// Programs, meshes and scene settings for one frame of drawing.
pub struct Scene {
    target: GlShaderProgram,
    light: GlShaderProgram,
    outline: GlShaderProgram,
    lit_cube: Mesh,
    outline_cube: Mesh,
    settings: SceneSettings,
}

impl Scene {
    /// Builds the programs and uploads the meshes on the current context.
    ///
    /// Programs that fail to compile or link are kept; their geometry simply
    /// renders wrong while the diagnostics sit in the log.
    pub fn new(gl: &glow::Context, programs: &ProgramSet, settings: SceneSettings) -> Result<Self> {
        let [target, light, outline] = build_programs(gl, programs)?;
        let lit_cube = Mesh::lit_cube(gl).context("failed to upload lit cube")?;
        let outline_cube = Mesh::outline_cube(gl).context("failed to upload outline cube")?;

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            target,
            light,
            outline,
            lit_cube,
            outline_cube,
            settings,
        })
    }

    pub fn draw(&self, gl: &glow::Context, camera: &Camera, aspect: f32) {
        let [r, g, b, a] = self.settings.clear_color;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let view = camera.view_matrix();
        let projection = camera.projection_matrix(aspect);
        let light_position = self.settings.light_position_for(camera.position());

        self.target.use_program(gl);
        set_vec3(gl, &self.target, "objectColor", self.settings.object_color);
        set_vec3(gl, &self.target, "lightColor", self.settings.light_color);
        set_vec3(gl, &self.target, "lightPos", light_position);
        set_vec3(gl, &self.target, "viewPos", camera.position());
        set_mat4(gl, &self.target, "view", &view);
        set_mat4(gl, &self.target, "projection", &projection);
        set_mat4(gl, &self.target, "model", &Mat4::IDENTITY);
        self.lit_cube.draw(gl);

        if self.settings.show_light_cube {
            let model = light_cube_model(light_position);
            self.light.use_program(gl);
            set_mat4(gl, &self.light, "view", &view);
            set_mat4(gl, &self.light, "projection", &projection);
            set_mat4(gl, &self.light, "model", &model);
            self.lit_cube.draw(gl);
        }

        // Silhouette edges are found relative to the light, which defaults to the eye.
        self.outline.use_program(gl);
        set_vec3(gl, &self.outline, "lightPos", light_position);
        set_mat4(gl, &self.outline, "view", &view);
        set_mat4(gl, &self.outline, "projection", &projection);
        set_mat4(
            gl,
            &self.outline,
            "model",
            &Mat4::from_scale(Vec3::splat(self.settings.outline_scale)),
        );
        self.outline_cube.draw(gl);
    }

    pub fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.use_program(None);
        }
        self.target.delete(gl);
        self.light.delete(gl);
        self.outline.delete(gl);
        self.lit_cube.delete(gl);
        self.outline_cube.delete(gl);
    }
}

/// Builds each program and reports whether it linked, without drawing anything.
pub fn check_programs(gl: &glow::Context, programs: &ProgramSet) -> Result<Vec<ProgramReport>> {
    let built = build_programs(gl, programs)?;
    let reports = programs
        .named()
        .into_iter()
        .zip(built)
        .map(|((name, _), program)| {
            let report = ProgramReport {
                name,
                outcome: program.ensure_linked(),
                diagnostics: program.diagnostics().len(),
            };
            program.delete(gl);
            report
        })
        .collect();
    Ok(reports)
}

/// Link outcome for one named program.
#[derive(Debug)]
pub struct ProgramReport {
    pub name: &'static str,
    pub outcome: Result<(), ShaderError>,
    pub diagnostics: usize,
}

fn build_programs(gl: &glow::Context, programs: &ProgramSet) -> Result<[GlShaderProgram; 3]> {
    let build = |name: &str, sources: &ProgramSources| -> Result<GlShaderProgram> {
        let program = ShaderProgram::build(gl, sources)
            .with_context(|| format!("failed to create {name} program"))?;
        if program.is_linked() {
            info!(program = name, handle = ?program.handle(), "shader program ready");
        } else {
            warn!(
                program = name,
                diagnostics = program.diagnostics().len(),
                "shader program did not link; its geometry will not render correctly"
            );
        }
        Ok(program)
    };
    Ok([
        build("target", &programs.target)?,
        build("light", &programs.light)?,
        build("outline", &programs.outline)?,
    ])
}

/// Shrunken cube placed where the light currently is.
fn light_cube_model(light_position: Vec3) -> Mat4 {
    Mat4::from_translation(light_position) * Mat4::from_scale(Vec3::splat(LIGHT_CUBE_SCALE))
}

fn set_vec3(gl: &glow::Context, program: &GlShaderProgram, name: &str, value: Vec3) {
    let location = program.uniform_location(gl, name);
    unsafe {
        gl.uniform_3_f32(location.as_ref(), value.x, value.y, value.z);
    }
}

fn set_mat4(gl: &glow::Context, program: &GlShaderProgram, name: &str, value: &Mat4) {
    let location = program.uniform_location(gl, name);
    unsafe {
        gl.uniform_matrix_4_f32_slice(location.as_ref(), false, &value.to_cols_array());
    }
}
