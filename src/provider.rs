//! Forecast providers. The view never generates data itself, it's handed a
//! [ForecastSet] that came from one of these.

use crate::{
    config::ProviderConfig,
    forecast::{ConditionIcon, ForecastPoint, ForecastSet},
};
use chrono::{DateTime, Duration, Local};
use log::{error, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Something that can produce a forecast
pub trait ForecastProvider {
    /// Get a descriptive name for this provider, for logging
    fn name(&self) -> &str;

    fn fetch_forecast(&mut self) -> Result<ForecastSet, ProviderError>;
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Couldn't reach the data at all
    #[error("Forecast source `{source_name}` unavailable")]
    ProviderUnavailable {
        source_name: String,
        #[source]
        source: BoxError,
    },
    /// Reached the data but it doesn't hold a valid forecast
    #[error("Forecast source `{source_name}` returned invalid data")]
    InvalidData {
        source_name: String,
        #[source]
        source: BoxError,
    },
}

/// Build the provider described by the config
pub fn from_config(config: &ProviderConfig) -> Box<dyn ForecastProvider> {
    match config {
        ProviderConfig::Mock { seed: Some(seed) } => {
            Box::new(MockProvider::seeded(*seed))
        }
        ProviderConfig::Mock { seed: None } => {
            Box::new(MockProvider::from_entropy())
        }
        ProviderConfig::Snapshot { path } => {
            Box::new(SnapshotProvider::new(path))
        }
    }
}

/// Fetch a forecast. If the provider fails, fall back to the placeholder and
/// hand back a notice for the user. A broken provider is never fatal.
pub fn load_forecast(
    provider: &mut dyn ForecastProvider,
) -> (ForecastSet, Option<String>) {
    info!("Loading forecast from provider {}", provider.name());
    match provider.fetch_forecast() {
        Ok(forecast) => (forecast, None),
        Err(err) => {
            let notice = match &err {
                ProviderError::ProviderUnavailable { .. } => {
                    "Forecast unavailable"
                }
                ProviderError::InvalidData { .. } => "Forecast data invalid",
            };
            error!("Error loading forecast: {:?}", anyhow::Error::from(err));
            (ForecastSet::placeholder(), Some(notice.to_owned()))
        }
    }
}

/// Random mock data. Shape is fixed, values are random. The RNG is injected
/// so tests can seed it.
#[derive(Debug)]
pub struct MockProvider<R> {
    rng: R,
}

impl MockProvider<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MockProvider<R> {
    const TEMPERATURE: RangeInclusive<i32> = 10..=25;
    const FEELS_LIKE: RangeInclusive<i32> = 5..=15;

    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a forecast with points starting at `now`. Hourly points are
    /// an hour apart, daily points a day apart.
    pub fn generate(&mut self, now: DateTime<Local>) -> ForecastSet {
        // https://docs.rs/chrono/latest/chrono/format/strftime/index.html
        let hourly = std::array::from_fn(|i| {
            let time = now + Duration::hours(i as i64);
            self.point(time.format("%I:%M %p").to_string())
        });
        let daily = std::array::from_fn(|i| {
            let time = now + Duration::days(i as i64);
            self.point(time.format("%a").to_string())
        });
        ForecastSet { hourly, daily }
    }

    fn point(&mut self, label: String) -> ForecastPoint {
        // Icon is independent of the temperatures. Good enough for a mock
        let icon_index = self.rng.gen_range(0..ConditionIcon::ALL.len());
        ForecastPoint {
            label,
            temperature: self.rng.gen_range(Self::TEMPERATURE),
            feels_like: self.rng.gen_range(Self::FEELS_LIKE),
            condition_icon: ConditionIcon::ALL[icon_index],
        }
    }
}

impl<R: Rng> ForecastProvider for MockProvider<R> {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_forecast(&mut self) -> Result<ForecastSet, ProviderError> {
        Ok(self.generate(Local::now()))
    }
}

/// Load a forecast from a JSON file on disk
#[derive(Debug)]
pub struct SnapshotProvider {
    path: PathBuf,
    name: String,
}

impl SnapshotProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_owned();
        let name = format!("snapshot:{}", path.display());
        Self { path, name }
    }
}

impl ForecastProvider for SnapshotProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_forecast(&mut self) -> Result<ForecastSet, ProviderError> {
        let source_name = self.path.display().to_string();
        let contents = fs::read(&self.path).map_err(|err| {
            ProviderError::ProviderUnavailable {
                source_name: source_name.clone(),
                source: err.into(),
            }
        })?;
        let forecast: ForecastSet = serde_json::from_slice(&contents)
            .map_err(|err| ProviderError::InvalidData {
                source_name,
                source: err.into(),
            })?;
        Ok(forecast)
    }
}
