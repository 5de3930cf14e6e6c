//! CLI command implementations for CareHub.

pub mod check;
pub mod fixtures;
pub mod serve;

use anyhow::{Context, Result, bail};
use carehub_core::CarehubConfig;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CAREHUB_CONFIG";

/// Configuration file used when neither the flag nor the env var is set.
pub const DEFAULT_CONFIG: &str = "carehub.yaml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Named by the user; a missing file is then an error.
    pub explicit: bool,
}

impl ConfigSource {
    /// Flag first, then `CAREHUB_CONFIG`, then `carehub.yaml`.
    pub fn resolve(flag: Option<PathBuf>, env_value: Option<String>) -> Self {
        match flag.or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from)) {
            Some(path) => Self { path, explicit: true },
            None => Self {
                path: PathBuf::from(DEFAULT_CONFIG),
                explicit: false,
            },
        }
    }

    pub fn from_env(flag: Option<PathBuf>) -> Self {
        Self::resolve(flag, std::env::var(CONFIG_ENV).ok())
    }

    pub fn load(&self) -> Result<CarehubConfig> {
        if self.explicit && !self.path.exists() {
            bail!("Config file not found: {}", self.path.display());
        }
        load_config(&self.path)
    }
}

fn load_config(path: &Path) -> Result<CarehubConfig> {
    CarehubConfig::load_or_default(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
