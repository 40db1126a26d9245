use crate::render::shaders::ShaderStage;
use crate::utils::error::Result;
use gl::types::*;
use std::ffi::{c_void, CString};
use std::ptr;

/// The subset of the GL shader/program API the shim forwards to.
///
/// Ids are the driver's raw object names. `0` from a create call means the driver
/// refused to create the object, and `-1` from a location query is the driver's
/// "not found" sentinel.
pub trait GlDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str) -> Result<()>;
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;

    fn use_program(&self, program: GLuint);
    fn attrib_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
}

/// Forwards to the global `gl` bindings.
///
/// Function pointers must have been loaded with [`NativeGl::load_with`] and every call
/// must happen on the thread whose context is current.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeGl;

impl NativeGl {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        NativeGl
    }

    /// True once the shader entry points have been resolved.
    pub fn is_loaded() -> bool {
        gl::CreateShader::is_loaded() && gl::CreateProgram::is_loaded()
    }
}

impl GlDriver for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) -> Result<()> {
        let c_str = CString::new(source.as_bytes())?;
        unsafe {
            gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        }
        Ok(())
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |capacity, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, capacity, written, buffer);
        })
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |capacity, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, capacity, written, buffer);
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        match symbol_name(name) {
            Some(cname) => unsafe { gl::GetAttribLocation(program, cname.as_ptr()) },
            None => -1,
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match symbol_name(name) {
            Some(cname) => unsafe { gl::GetUniformLocation(program, cname.as_ptr()) },
            None => -1,
        }
    }
}

/// Names with an interior NUL can't reach the driver; they resolve to the sentinel.
pub(crate) fn resolvable_name(name: &str) -> bool {
    if name.contains('\0') {
        log::warn!("Symbol name {:?} contains a NUL byte and cannot be resolved", name);
        return false;
    }
    true
}

pub(crate) fn symbol_name(name: &str) -> Option<CString> {
    if !resolvable_name(name) {
        return None;
    }
    CString::new(name).ok()
}

/// Rejects sources the native entry points can't accept, whatever the binding.
pub(crate) fn check_source(source: &str) -> Result<()> {
    if source.contains('\0') {
        CString::new(source)?;
    }
    Ok(())
}

/// Reads an info log of `len` bytes (as reported by `INFO_LOG_LENGTH`, terminator
/// included) and keeps only what the driver actually wrote.
pub(crate) fn read_info_log<F>(len: GLint, read: F) -> String
where
    F: FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
{
    if len <= 0 {
        return String::new();
    }

    let mut buffer: Vec<u8> = vec![0; len as usize];
    let mut written: GLsizei = 0;
    read(len, &mut written, buffer.as_mut_ptr() as *mut GLchar);

    buffer.truncate(written.clamp(0, len) as usize);
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
