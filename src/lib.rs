pub mod config;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::ShimConfig;
pub use render::driver::{GlDriver, NativeGl};
pub use render::glow_driver::GlowDriver;
pub use render::shaders::{
    compile_shader, compile_shader_with, link_program, link_program_with, AttributeLocation,
    FragmentShader, ProgramHandle, ShaderHandle, ShaderStage, StatusPolicy, UniformLocation,
    VertexShader,
};
pub use utils::error::{Result, ShaderError};
pub use utils::fatal::OrFatal;
