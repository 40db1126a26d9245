pub mod error;
pub mod fatal;

pub use error::{Result, ShaderError};
pub use fatal::OrFatal;
