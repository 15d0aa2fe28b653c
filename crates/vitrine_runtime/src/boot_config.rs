//! Boot Configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `VITRINE_DURATION`, `VITRINE_ASSET_DIR`, `VITRINE_SEED`
//! 2. Config file: `$VITRINE_CONFIG`, or `vitrine.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [display]
//! width = 1920
//! height = 1080
//! pixel_ratio = 2.0
//! target_fps = 60
//!
//! [assets]
//! asset_dir = "site"
//! worker_threads = 2
//!
//! [page.background]
//! particle_count = 2000
//! seed = 7
//!
//! [session]
//! duration_secs = 10.0
//! load_after_ms = 250
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vitrine_asset::AssetServerConfig;
use vitrine_page::PageConfig;

pub const CONFIG_ENV: &str = "VITRINE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "vitrine.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

/// Simulated window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio for every surface
    pub pixel_ratio: f32,
    /// Frame pacing; 0 runs unthrottled
    pub target_fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
            target_fps: 60,
        }
    }
}

/// How long and how the page is driven
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run time in seconds; 0 runs until Ctrl+C
    pub duration_secs: f64,
    /// When the document `load` event fires
    pub load_after_ms: u64,
    /// Interval between frame rate log lines; 0 disables them
    pub stats_interval_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10.0,
            load_after_ms: 250,
            stats_interval_secs: 5.0,
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub display: DisplayConfig,
    pub assets: AssetServerConfig,
    pub page: PageConfig,
    pub session: SessionConfig,
    /// File the configuration came from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl BootConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if explicit.is_some() || path.exists() {
            let loaded = Self::load_from_file(&path)?;
            log::info!("Loaded config from {}", path.display());
            loaded
        } else {
            log::debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
            Self::default()
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("VITRINE_DURATION") {
            self.session.duration_secs = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or(ConfigError::InvalidEnv {
                    var: "VITRINE_DURATION",
                    value: value.clone(),
                })?;
            log::info!("Duration from env: {}s", self.session.duration_secs);
        }

        if let Some(value) = lookup("VITRINE_ASSET_DIR") {
            if !value.is_empty() {
                self.assets.asset_dir = PathBuf::from(value);
                log::info!("Asset dir from env: {}", self.assets.asset_dir.display());
            }
        }

        if let Some(value) = lookup("VITRINE_SEED") {
            let seed = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                var: "VITRINE_SEED",
                value: value.clone(),
            })?;
            self.page.background.seed = Some(seed);
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Boot Configuration:");
        log::info!(
            "  Display: {}x{} @{}x, target {} fps",
            self.display.width,
            self.display.height,
            self.display.pixel_ratio,
            self.display.target_fps
        );
        log::info!(
            "  Assets: {} ({} workers)",
            self.assets.asset_dir.display(),
            self.assets.worker_threads
        );
        match self.page.background.seed {
            Some(seed) => log::info!("  Background seed: {}", seed),
            None => log::info!("  Background seed: random"),
        }
        if self.session.duration_secs > 0.0 {
            log::info!("  Duration: {}s", self.session.duration_secs);
        } else {
            log::info!("  Duration: until Ctrl+C");
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BootConfig::default();
        assert_eq!(config.display.target_fps, 60);
        assert_eq!(config.assets.worker_threads, 2);
        assert_eq!(config.page.robot_delay_ms, 500);
        assert_eq!(config.page.background.particle_count, 2000);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[display]\nwidth = 1920\n\n[page.background]\nseed = 9\n\n[session]\nduration_secs = 2.5"
        )
        .unwrap();

        let config = BootConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.display.width, 1920);
        assert_eq!(config.display.height, 720);
        assert_eq!(config.page.background.seed, Some(9));
        assert_eq!(config.page.background.shape_count, 15);
        assert_eq!(config.session.duration_secs, 2.5);
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nwidth = \"wide\"").unwrap();
        assert!(matches!(
            BootConfig::load_from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let missing = file.path().with_extension("absent");
        assert!(matches!(
            BootConfig::load_from_file(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BootConfig::default();
        config
            .apply_overrides(env(&[
                ("VITRINE_DURATION", "0"),
                ("VITRINE_ASSET_DIR", "/srv/site"),
                ("VITRINE_SEED", "1234"),
            ]))
            .unwrap();

        assert_eq!(config.session.duration_secs, 0.0);
        assert_eq!(config.assets.asset_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.page.background.seed, Some(1234));
    }

    #[test]
    fn test_invalid_env() {
        let mut config = BootConfig::default();
        let err = config
            .apply_overrides(env(&[("VITRINE_DURATION", "-3")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "VITRINE_DURATION", .. }));

        let err = config
            .apply_overrides(env(&[("VITRINE_SEED", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("VITRINE_SEED"));
    }
}
