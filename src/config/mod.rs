pub mod core;

pub use self::core::{load_or_create_config, load_or_create_config_at, Backend, ShimConfig};
