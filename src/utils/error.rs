use crate::render::shaders::ShaderStage;
use gl::types::GLuint;
use std::ffi::NulError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Driver refused to create a {0} shader object")]
    CreateShader(ShaderStage),

    #[error("Driver refused to create a program object")]
    CreateProgram,

    /// The driver cleared the compile status of shader `id`.
    #[error("Compile error in shader {id}: \"{log}\"")]
    Compilation {
        id: GLuint,
        stage: ShaderStage,
        log: String,
    },

    /// The driver cleared the link status of program `id`.
    #[error("Link error in program {id}: \"{log}\"")]
    Linking { id: GLuint, log: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

impl ShaderError {
    /// Driver object id the failure refers to, if any.
    pub fn object_id(&self) -> Option<GLuint> {
        match self {
            ShaderError::Compilation { id, .. } | ShaderError::Linking { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Diagnostic text read back from the driver, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ShaderError::Compilation { log, .. } | ShaderError::Linking { log, .. } => Some(log),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShaderError>;
