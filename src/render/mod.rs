pub mod driver;
pub mod glow_driver;
#[cfg(test)]
pub(crate) mod mock;
pub mod shaders;

pub use driver::{GlDriver, NativeGl};
pub use glow_driver::GlowDriver;
pub use shaders::{
    compile_shader, compile_shader_with, link_program, link_program_with, AttributeLocation,
    FragmentShader, ProgramHandle, ShaderHandle, ShaderStage, StatusPolicy, UniformLocation,
    VertexShader,
};
