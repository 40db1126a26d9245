// shaders.rs - Shader compilation and program linking

use crate::render::driver::GlDriver;
use crate::utils::error::{Result, ShaderError};
use gl::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        };
        f.write_str(name)
    }
}

/// How a cleared compile/link status is treated when the driver has nothing to say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any cleared status flag is an error, with or without a diagnostic log.
    #[default]
    Strict,
    /// A cleared status is only an error when the driver reports a non-empty log;
    /// otherwise the handle is returned anyway. A driver that refuses to create the
    /// object (id 0) is still an error under this policy.
    RequireLog,
}

/// GLSL source for the vertex stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexShader(String);

/// GLSL source for the fragment stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentShader(String);

macro_rules! shader_source_type {
    ($ty:ident, $stage:expr) => {
        impl $ty {
            pub const STAGE: ShaderStage = $stage;

            pub fn new(source: impl Into<String>) -> Self {
                Self(source.into())
            }

            pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
                Ok(Self(fs::read_to_string(path)?))
            }

            pub fn source(&self) -> &str {
                &self.0
            }

            pub fn compile<D: GlDriver + ?Sized>(&self, gl: &D) -> Result<ShaderHandle> {
                self.compile_with(gl, StatusPolicy::default())
            }

            pub fn compile_with<D: GlDriver + ?Sized>(
                &self,
                gl: &D,
                policy: StatusPolicy,
            ) -> Result<ShaderHandle> {
                compile_shader_with(gl, Self::STAGE, &self.0, policy)
            }
        }

        impl From<&str> for $ty {
            fn from(source: &str) -> Self {
                Self::new(source)
            }
        }

        impl From<String> for $ty {
            fn from(source: String) -> Self {
                Self(source)
            }
        }
    };
}

shader_source_type!(VertexShader, ShaderStage::Vertex);
shader_source_type!(FragmentShader, ShaderStage::Fragment);

/// A compiled shader object. Owned by the driver; never deleted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle {
    id: GLuint,
    stage: ShaderStage,
}

impl ShaderHandle {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// A linked program object. Owned by the driver; never deleted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(GLuint);

impl ProgramHandle {
    pub fn id(&self) -> GLuint {
        self.0
    }

    /// Makes this the active program of the current context.
    pub fn activate<D: GlDriver + ?Sized>(&self, gl: &D) {
        gl.use_program(self.0);
    }

    pub fn attribute<D: GlDriver + ?Sized>(&self, gl: &D, name: &str) -> AttributeLocation {
        AttributeLocation(gl.attrib_location(self.0, name))
    }

    pub fn uniform<D: GlDriver + ?Sized>(&self, gl: &D, name: &str) -> UniformLocation {
        UniformLocation(gl.uniform_location(self.0, name))
    }
}

/// Attribute slot exactly as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub GLint);

/// Uniform slot exactly as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub GLint);

impl AttributeLocation {
    pub const NOT_FOUND: Self = Self(-1);

    pub fn is_found(&self) -> bool {
        self.0 >= 0
    }
}

impl UniformLocation {
    pub const NOT_FOUND: Self = Self(-1);

    pub fn is_found(&self) -> bool {
        self.0 >= 0
    }
}

pub fn compile_shader<D: GlDriver + ?Sized>(
    gl: &D,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle> {
    compile_shader_with(gl, stage, source, StatusPolicy::default())
}

pub fn compile_shader_with<D: GlDriver + ?Sized>(
    gl: &D,
    stage: ShaderStage,
    source: &str,
    policy: StatusPolicy,
) -> Result<ShaderHandle> {
    let id = gl.create_shader(stage);
    if id == 0 {
        return Err(ShaderError::CreateShader(stage));
    }

    gl.shader_source(id, source)?;
    gl.compile_shader(id);

    if !gl.shader_compile_status(id) {
        let log = gl.shader_info_log(id);
        if log.is_empty() && policy == StatusPolicy::RequireLog {
            log::warn!("Shader {} ({}) failed to compile without a diagnostic", id, stage);
        } else {
            return Err(ShaderError::Compilation { id, stage, log });
        }
    } else {
        log::debug!("Compiled {} shader {}", stage, id);
    }

    Ok(ShaderHandle { id, stage })
}

/// Compiles both stages, attaches them (fragment first) and links.
pub fn link_program<D: GlDriver + ?Sized>(
    gl: &D,
    fragment: &FragmentShader,
    vertex: &VertexShader,
) -> Result<ProgramHandle> {
    link_program_with(gl, fragment, vertex, StatusPolicy::default())
}

pub fn link_program_with<D: GlDriver + ?Sized>(
    gl: &D,
    fragment: &FragmentShader,
    vertex: &VertexShader,
    policy: StatusPolicy,
) -> Result<ProgramHandle> {
    let id = gl.create_program();
    if id == 0 {
        return Err(ShaderError::CreateProgram);
    }

    let fragment = fragment.compile_with(gl, policy)?;
    let vertex = vertex.compile_with(gl, policy)?;

    gl.attach_shader(id, fragment.id());
    gl.attach_shader(id, vertex.id());
    gl.link_program(id);

    if !gl.program_link_status(id) {
        let log = gl.program_info_log(id);
        if log.is_empty() && policy == StatusPolicy::RequireLog {
            log::warn!("Program {} failed to link without a diagnostic", id);
        } else {
            return Err(ShaderError::Linking { id, log });
        }
    } else {
        log::info!(
            "Linked program {} (fragment {}, vertex {})",
            id,
            fragment.id(),
            vertex.id()
        );
    }

    Ok(ProgramHandle(id))
}
