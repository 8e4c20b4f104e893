use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turtle_bt::ExecutorConfig;
use turtle_sim::SimConfig;

/// Runner configuration, read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub executor: ExecutorConfig,
    pub sim: SimConfig,

    /// Action catalog to check against instead of the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        if let (Some(catalog), Some(dir)) = (&config.catalog, path.parent()) {
            config.catalog = Some(dir.join(catalog));
        }
        Ok(config)
    }

    /// Load `.turtle-bt/config.yaml` under `dir`, or defaults when it does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(".turtle-bt/config.yaml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}
