//! Scripted stand-in for a GL driver, used by unit tests that can't open a context.

use crate::render::driver::{check_source, GlDriver};
use crate::render::shaders::ShaderStage;
use crate::utils::error::Result;
use gl::types::*;
use std::cell::RefCell;
use std::collections::HashMap;

struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: GLuint,
    shaders: HashMap<GLuint, MockShader>,
    programs: HashMap<GLuint, MockProgram>,
    current: GLuint,
    refuse_create: bool,
    silence_logs: bool,
    fail_links: bool,
    compile_calls: usize,
    link_calls: usize,
}

impl State {
    fn allocate(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }

    fn log_or_silence(&self, log: String) -> String {
        if self.silence_logs {
            String::new()
        } else {
            log
        }
    }
}

#[derive(Default)]
pub struct MockDriver {
    state: RefCell<State>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every create call return 0.
    pub fn refuse_create(&self, refuse: bool) {
        self.state.borrow_mut().refuse_create = refuse;
    }

    /// Failed compiles and links report an empty info log.
    pub fn silence_logs(&self, silence: bool) {
        self.state.borrow_mut().silence_logs = silence;
    }

    /// Every link clears the status flag regardless of the attached shaders.
    pub fn fail_links(&self, fail: bool) {
        self.state.borrow_mut().fail_links = fail;
    }

    pub fn compile_calls(&self) -> usize {
        self.state.borrow().compile_calls
    }

    pub fn link_calls(&self) -> usize {
        self.state.borrow().link_calls
    }

    pub fn current_program(&self) -> GLuint {
        self.state.borrow().current
    }

    pub fn attached(&self, program: GLuint) -> Vec<GLuint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub fn shader_stage(&self, shader: GLuint) -> Option<ShaderStage> {
        self.state.borrow().shaders.get(&shader).map(|s| s.stage)
    }
}

impl GlDriver for MockDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let mut state = self.state.borrow_mut();
        if state.refuse_create {
            return 0;
        }
        let id = state.allocate();
        state.shaders.insert(
            id,
            MockShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        id
    }

    fn shader_source(&self, shader: GLuint, source: &str) -> Result<()> {
        check_source(source)?;
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
        Ok(())
    }

    fn compile_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.compile_calls += 1;
        let error = match state.shaders.get(&shader) {
            Some(s) => syntax_error(&s.source),
            None => return,
        };
        let log = error.map(|e| state.log_or_silence(e));
        if let Some(s) = state.shaders.get_mut(&shader) {
            s.compiled = log.is_none();
            s.log = log.unwrap_or_default();
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        if state.refuse_create {
            return 0;
        }
        let id = state.allocate();
        state.programs.insert(id, MockProgram::default());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.link_calls += 1;

        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let shaders: Vec<&MockShader> = attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .collect();

        let count = |stage: ShaderStage| shaders.iter().filter(|s| s.stage == stage).count();
        let error = if state.fail_links {
            Some("error: linking failed".to_string())
        } else if shaders.iter().any(|s| !s.compiled) {
            Some("error: linking with uncompiled shader".to_string())
        } else if count(ShaderStage::Vertex) != 1 || count(ShaderStage::Fragment) != 1 {
            Some("error: program needs one vertex and one fragment shader".to_string())
        } else {
            None
        };

        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        if error.is_none() {
            for shader in &shaders {
                for (qualifier, name) in declarations(&shader.source) {
                    let symbols = match qualifier {
                        "uniform" => &mut uniforms,
                        "in" | "attribute" if shader.stage == ShaderStage::Vertex => {
                            &mut attributes
                        }
                        _ => continue,
                    };
                    if !symbols.contains(&name) {
                        symbols.push(name);
                    }
                }
            }
        }

        let log = error.map(|e| state.log_or_silence(e));
        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = log.is_none();
            p.log = log.unwrap_or_default();
            p.attributes = attributes;
            p.uniforms = uniforms;
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.state.borrow_mut().current = program;
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.attributes.iter().position(|a| a == name))
            .map_or(-1, |index| index as GLint)
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map_or(-1, |index| index as GLint)
    }
}

/// Rough GLSL check: needs a `main`, balanced braces and a `;` before each `}`.
fn syntax_error(source: &str) -> Option<String> {
    if !source.contains("main") {
        return Some("0:0(0): error: function `main' is not defined".to_string());
    }

    let mut depth = 0i32;
    let mut line = 1;
    let mut last = None;
    for c in source.chars() {
        match c {
            '\n' => line += 1,
            '{' => depth += 1,
            '}' => {
                if !matches!(last, Some(';' | '{' | '}')) {
                    return Some(format!(
                        "0:{}: error: syntax error, unexpected '}}', expecting ';'",
                        line
                    ));
                }
                depth -= 1;
                if depth < 0 {
                    return Some(format!("0:{}: error: syntax error, unexpected '}}'", line));
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            last = Some(c);
        }
    }

    if depth != 0 {
        return Some(format!("0:{}: error: syntax error, unexpected end of file", line));
    }
    None
}

/// `(qualifier, name)` pairs for `in`/`attribute`/`uniform` declarations.
fn declarations(source: &str) -> Vec<(&'static str, String)> {
    let mut found = Vec::new();
    for statement in source.split(|c| c == ';' || c == '{' || c == '}') {
        let tokens: Vec<&str> = statement.split_whitespace().collect();
        for (i, token) in tokens.iter().enumerate() {
            let qualifier = match *token {
                "in" => "in",
                "attribute" => "attribute",
                "uniform" => "uniform",
                _ => continue,
            };
            if let Some(name) = tokens.get(i + 2) {
                let name = name.split('[').next().unwrap_or(name);
                found.push((qualifier, name.to_string()));
            }
            break;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_detection() {
        assert!(syntax_error("void main(){gl_Position=vec4(0);}").is_none());
        assert!(syntax_error("void main(){gl_Position=vec4(0)}").is_some());
        assert!(syntax_error("void main(){").is_some());
        assert!(syntax_error("void f(){}").is_some());
    }

    #[test]
    fn test_declarations() {
        let decls = declarations("layout (location = 0) in vec3 aPos;\nuniform mat4 bones[4];\nvoid main(){}");
        assert_eq!(
            decls,
            vec![("in", "aPos".to_string()), ("uniform", "bones".to_string())]
        );
    }
}
