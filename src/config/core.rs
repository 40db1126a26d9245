use crate::render::shaders::StatusPolicy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which binding the demo drives the shim through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Native,
    Glow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    pub log_level: LevelFilter,
    pub status_policy: StatusPolicy,
    /// Exit the process on the first compile/link error instead of returning it.
    pub fail_fast: bool,
    pub backend: Backend,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            status_policy: StatusPolicy::Strict,
            fail_fast: true,
            backend: Backend::Native,
        }
    }
}

impl ShimConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;
        Self::from_toml_str(&content)
    }
}

pub fn load_or_create_config() -> Result<ShimConfig> {
    load_or_create_config_at(get_config_path()?)
}

pub fn load_or_create_config_at(config_path: impl AsRef<Path>) -> Result<ShimConfig> {
    let config_path = config_path.as_ref();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = ShimConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(config_path, toml_content).context("Failed to write default config")?;
        return Ok(default_config);
    }

    ShimConfig::load(config_path)
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "MetroManDevTeam", "glshim")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join("glshim.toml"))
}
