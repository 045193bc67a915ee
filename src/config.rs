use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::RenderOptions;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "RENTAL_DASHBOARD_CONFIG";
/// Environment variable overriding `data_path`.
pub const DATA_ENV: &str = "RENTAL_DASHBOARD_DATA";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rental-dashboard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("histogram_bins must be at least 1")]
    ZeroBins,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_width")]
    pub window_width: f32,
    #[serde(default = "default_height")]
    pub window_height: f32,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("cleaned_data_fixed.csv")
}
fn default_bins() -> usize {
    30
}
fn default_width() -> f32 {
    1400.0
}
fn default_height() -> f32 {
    900.0
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            histogram_bins: default_bins(),
            window_width: default_width(),
            window_height: default_height(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        if cfg.histogram_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }
        Ok(cfg)
    }

    /// Read the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from) // $RENTAL_DASHBOARD_CONFIG overrides the default location
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut cfg = if path.exists() {
            log::info!("Reading config from {}", path.display());
            Self::from_toml(&std::fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };
        if let Ok(data) = std::env::var(DATA_ENV) {
            cfg.data_path = PathBuf::from(data);
        }
        Ok(cfg)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            histogram_bins: self.histogram_bins,
        }
    }
}
