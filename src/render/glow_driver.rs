use crate::render::driver::{check_source, resolvable_name, GlDriver};
use crate::render::shaders::ShaderStage;
use crate::utils::error::Result;
use gl::types::*;
use glow::HasContext;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Forwards to a `glow::Context`, translating glow's typed objects back to raw ids.
///
/// Failed creates come back as `0` and missing locations as `-1`, the same values
/// the native entry points report.
#[derive(Clone)]
pub struct GlowDriver {
    gl: Arc<glow::Context>,
}

impl GlowDriver {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }
}

fn shader(id: GLuint) -> Option<glow::NativeShader> {
    NonZeroU32::new(id).map(glow::NativeShader)
}

fn program(id: GLuint) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id).map(glow::NativeProgram)
}

fn location_or_sentinel(location: Option<u32>) -> GLint {
    location
        .and_then(|index| GLint::try_from(index).ok())
        .unwrap_or(-1)
}

impl GlDriver for GlowDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        match unsafe { self.gl.create_shader(stage.gl_enum()) } {
            Ok(shader) => shader.0.get(),
            Err(e) => {
                log::warn!("glow refused to create a {} shader: {}", stage, e);
                0
            }
        }
    }

    fn shader_source(&self, id: GLuint, source: &str) -> Result<()> {
        check_source(source)?;
        if let Some(shader) = shader(id) {
            unsafe { self.gl.shader_source(shader, source) };
        }
        Ok(())
    }

    fn compile_shader(&self, id: GLuint) {
        if let Some(shader) = shader(id) {
            unsafe { self.gl.compile_shader(shader) };
        }
    }

    fn shader_compile_status(&self, id: GLuint) -> bool {
        shader(id).map_or(false, |shader| unsafe { self.gl.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, id: GLuint) -> String {
        shader(id)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> GLuint {
        match unsafe { self.gl.create_program() } {
            Ok(program) => program.0.get(),
            Err(e) => {
                log::warn!("glow refused to create a program: {}", e);
                0
            }
        }
    }

    fn attach_shader(&self, program_id: GLuint, shader_id: GLuint) {
        if let (Some(program), Some(shader)) = (program(program_id), shader(shader_id)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn link_program(&self, id: GLuint) {
        if let Some(program) = program(id) {
            unsafe { self.gl.link_program(program) };
        }
    }

    fn program_link_status(&self, id: GLuint) -> bool {
        program(id).map_or(false, |program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, id: GLuint) -> String {
        program(id)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn use_program(&self, id: GLuint) {
        unsafe { self.gl.use_program(program(id)) };
    }

    fn attrib_location(&self, id: GLuint, name: &str) -> GLint {
        if !resolvable_name(name) {
            return -1;
        }
        let location = program(id)
            .and_then(|program| unsafe { self.gl.get_attrib_location(program, name) });
        location_or_sentinel(location)
    }

    fn uniform_location(&self, id: GLuint, name: &str) -> GLint {
        if !resolvable_name(name) {
            return -1;
        }
        let location = program(id)
            .and_then(|program| unsafe { self.gl.get_uniform_location(program, name) })
            .map(|location| location.0);
        location_or_sentinel(location)
    }
}
