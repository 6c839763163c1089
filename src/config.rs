use crate::forecast::ViewMode;
use anyhow::Context;
use log::info;
use serde::Deserialize;
use std::{fs::File, io::ErrorKind, path::PathBuf, time::Duration};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SPI device for the e-ink panel. Ignored when there's no real hardware
    pub display_port: String,
    pub provider: ProviderConfig,
    /// How often the UI loop checks for input, in milliseconds
    pub tick_interval_ms: u64,
    /// Mode the view starts in
    pub initial_mode: ViewMode,
}

/// Where forecast data comes from
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Random data. Pass a seed to get the same data every time
    Mock {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// A JSON forecast file
    Snapshot { path: PathBuf },
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "./config.json";

    /// Load config from the given path, or the default path. A missing file
    /// gets the default config, a malformed one is an error.
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| Self::DEFAULT_PATH.into());
        info!("Loading config from `{}`", path.display());
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("`{}` not found, using default config", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(format!(
                    "Error opening config file {}",
                    path.display()
                ))
            }
        };
        serde_json::from_reader(file)
            .context(format!("Error parsing config file {}", path.display()))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_port: "/dev/spidev0.0".into(),
            provider: ProviderConfig::default(),
            tick_interval_ms: 500,
            initial_mode: ViewMode::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Mock { seed: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("config.json"))).unwrap();
        assert_eq!(config.provider, ProviderConfig::Mock { seed: None });
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.initial_mode, ViewMode::Hourly);
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"provider": {{"kind": "snapshot", "path": "f.json"}},
                "initial_mode": "daily"}}"#
        )
        .unwrap();
        let config = Config::load(Some(file.path().into())).unwrap();
        assert_eq!(
            config.provider,
            ProviderConfig::Snapshot {
                path: "f.json".into()
            }
        );
        assert_eq!(config.initial_mode, ViewMode::Daily);
        assert_eq!(config.display_port, "/dev/spidev0.0");
    }

    #[test]
    fn test_mock_seed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"provider": {{"kind": "mock", "seed": 7}}}}"#)
            .unwrap();
        let config = Config::load(Some(file.path().into())).unwrap();
        assert_eq!(config.provider, ProviderConfig::Mock { seed: Some(7) });
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(Some(file.path().into())).is_err());
    }
}
