use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cardscore_eval::{EvalError, MetricRegistry};
use cardscore_generate::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "cardscore.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid settings in {path}: max_history must be at least 1")]
    MaxHistory { path: PathBuf },
    #[error("invalid metric weights: {0}")]
    Weights(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub runs_dir: PathBuf,
    pub max_history: usize,
    pub log_level: String,
    /// Per-metric weight overrides, keyed by metric name.
    pub weights: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            runs_dir: PathBuf::from("runs"),
            max_history: DEFAULT_MAX_HISTORY,
            log_level: "info".to_string(),
            weights: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if settings.max_history == 0 {
            return Err(SettingsError::MaxHistory {
                path: path.to_path_buf(),
            });
        }
        Ok(settings)
    }

    /// Metric registry with this file's weight overrides applied.
    pub fn registry(&self) -> Result<MetricRegistry, SettingsError> {
        if self.weights.is_empty() {
            return Ok(MetricRegistry::standard());
        }
        Ok(MetricRegistry::with_weights(&self.weights)?)
    }
}

/// Load settings from an explicit path, or from `cardscore.toml` if present.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !fallback.exists() {
                return Ok(Settings::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    Settings::from_toml(&content, &path)
}
