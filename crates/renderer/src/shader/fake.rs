//! In-memory stand-in for a GL driver so program construction can be tested
//! without a window or GPU.
//!
//! Compilation succeeds when the source declares `main` and its brackets
//! balance. Linking succeeds when exactly one vertex and one fragment stage
//! are attached and every attached stage compiled. Active uniforms are the
//! `uniform <type> <name>;` declarations of the linked stages.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{ShaderApi, ShaderStage};

#[derive(Default)]
pub(crate) struct FakeGl {
    state: RefCell<FakeState>,
}

#[derive(Default)]
struct FakeState {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    active: Option<u32>,
    refuse_programs: bool,
    refused_stages: Vec<ShaderStage>,
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    attached_at_link: usize,
    linked: bool,
    uniforms: Vec<String>,
    log: String,
}

impl FakeGl {
    pub(crate) fn refuse_programs(&self) {
        self.state.borrow_mut().refuse_programs = true;
    }

    pub(crate) fn refuse_stage(&self, stage: ShaderStage) {
        self.state.borrow_mut().refused_stages.push(stage);
    }

    pub(crate) fn link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    pub(crate) fn program_exists(&self, program: u32) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    pub(crate) fn attached_count_at_link(&self, program: u32) -> usize {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(0, |p| p.attached_at_link)
    }

    pub(crate) fn active_program(&self) -> Option<u32> {
        self.state.borrow().active
    }

    pub(crate) fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    fn next_id(state: &mut FakeState) -> u32 {
        state.next_id += 1;
        state.next_id
    }
}

fn compile_error(source: &str) -> Option<String> {
    if source.trim().is_empty() {
        return Some("0:1: error: empty shader source".to_string());
    }
    if !source.contains("void main") {
        return Some("0:1: error: missing entry point 'main'".to_string());
    }
    let balanced = |open: char, close: char| {
        source.chars().filter(|&c| c == open).count() == source.chars().filter(|&c| c == close).count()
    };
    if !balanced('(', ')') || !balanced('{', '}') {
        return Some("0:1: error: syntax error, unexpected ';'".to_string());
    }
    None
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let declaration = line.trim().strip_prefix("uniform ")?;
        let name = declaration.split_whitespace().last()?;
        Some(name.trim_end_matches(';').to_string())
    })
}

impl ShaderApi for FakeGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.refused_stages.contains(&stage) {
            return Err("GL_INVALID_ENUM".to_string());
        }
        let id = Self::next_id(&mut state);
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.shaders.get_mut(&shader) else {
            return false;
        };
        entry.source = source.to_string();
        match compile_error(source) {
            Some(log) => {
                entry.compiled = false;
                entry.log = log;
            }
            None => {
                entry.compiled = true;
                entry.log.clear();
            }
        }
        entry.compiled
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.refuse_programs {
            return Err("out of memory".to_string());
        }
        let id = Self::next_id(&mut state);
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(entry) = self.state.borrow_mut().programs.get_mut(&program) {
            entry.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(entry) = self.state.borrow_mut().programs.get_mut(&program) {
            entry.attached.retain(|&attached| attached != shader);
        }
    }

    fn link_program(&self, program: u32) -> bool {
        let mut state = self.state.borrow_mut();
        let FakeState {
            shaders, programs, ..
        } = &mut *state;
        let Some(entry) = programs.get_mut(&program) else {
            return false;
        };

        let stages: Vec<&FakeShader> = entry
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect();
        let count = |stage| stages.iter().filter(|s| s.stage == stage).count();
        let all_compiled = stages.iter().all(|s| s.compiled);

        entry.attached_at_link = entry.attached.len();
        entry.linked = all_compiled
            && count(ShaderStage::Vertex) == 1
            && count(ShaderStage::Fragment) == 1
            && count(ShaderStage::Geometry) <= 1;

        if entry.linked {
            let uniforms: HashSet<String> = stages
                .iter()
                .flat_map(|s| declared_uniforms(&s.source))
                .collect();
            entry.uniforms = uniforms.into_iter().collect();
            entry.uniforms.sort();
            entry.log.clear();
        } else {
            entry.uniforms.clear();
            entry.log = "error: linking with uncompiled/missing shader stage".to_string();
        }
        entry.linked
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.active == Some(program) {
            state.active = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.state.borrow_mut().active = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let entry = state.programs.get(&program)?;
        entry
            .uniforms
            .iter()
            .position(|uniform| uniform == name)
            .map(|index| index as u32)
    }
}
