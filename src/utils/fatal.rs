use crate::utils::error::ShaderError;

/// Opt-in fail-fast handling for shader results.
///
/// Compile and link failures are usually programmer errors caught at startup, so callers
/// that have no recovery path can log the driver diagnostic and stop the process here.
pub trait OrFatal<T> {
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for Result<T, ShaderError> {
    fn or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        }
    }
}
