//! Forecast data model. Everything here is plain data; the only mutable piece
//! of UI state is [ViewMode], which is owned by the view.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};

/// Number of points in each forecast sequence. 6 hours or 6 days
pub const HORIZON: usize = 6;

/// One forecast sample
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Time of day for hourly points, weekday abbreviation for daily points
    pub label: String,
    /// Degrees Celsius
    pub temperature: i32,
    /// Degrees Celsius
    pub feels_like: i32,
    /// Missing, null or otherwise unusable values become a cloud
    #[serde(default, deserialize_with = "icon_or_cloud")]
    pub condition_icon: ConditionIcon,
}

/// Immutable snapshot of everything the view can show. The horizon is part of
/// the type, so a set can't be built (or deserialized) with the wrong number
/// of points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSet {
    /// Ordered by increasing time
    pub hourly: [ForecastPoint; HORIZON],
    /// Ordered by increasing day
    pub daily: [ForecastPoint; HORIZON],
}

impl ForecastSet {
    /// Stand-in data, shown when the provider couldn't give us anything
    pub fn placeholder() -> Self {
        let point = || ForecastPoint {
            label: "--".into(),
            temperature: 0,
            feels_like: 0,
            condition_icon: ConditionIcon::Cloud,
        };
        Self {
            hourly: std::array::from_fn(|_| point()),
            daily: std::array::from_fn(|_| point()),
        }
    }

    /// Get the sequence for a view mode
    pub fn points(&self, mode: ViewMode) -> &[ForecastPoint; HORIZON] {
        match mode {
            ViewMode::Hourly => &self.hourly,
            ViewMode::Daily => &self.daily,
        }
    }
}

/// Symbolic weather condition, used to pick a glyph. Serializes as the
/// variant name. Unrecognized names deserialize as [ConditionIcon::Cloud];
/// non-string values are handled on [ForecastPoint].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionIcon {
    Sun,
    #[default]
    Cloud,
    Rain,
    Snow,
    Wind,
}

impl ConditionIcon {
    pub const ALL: [Self; 5] =
        [Self::Sun, Self::Cloud, Self::Rain, Self::Snow, Self::Wind];

    /// Look up an icon by name, falling back to cloud for anything we don't
    /// know. Accepts the long glyph names (`CloudRain`) too.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sun" => Self::Sun,
            "cloud" => Self::Cloud,
            "rain" | "cloudrain" => Self::Rain,
            "snow" | "cloudsnow" => Self::Snow,
            "wind" => Self::Wind,
            _ => Self::Cloud,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Cloud => "Cloud",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Wind => "Wind",
        }
    }
}

impl Display for ConditionIcon {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// These impls are needed for serde
impl From<String> for ConditionIcon {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<ConditionIcon> for String {
    fn from(icon: ConditionIcon) -> Self {
        icon.name().to_owned()
    }
}

/// Accept any JSON value for an icon. Only strings can name a known icon,
/// everything else falls back to [ConditionIcon::Cloud].
fn icon_or_cloud<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ConditionIcon, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map(ConditionIcon::from_name)
        .unwrap_or_default())
}

/// Which forecast sequence is on screen
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Hourly,
    Daily,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Hourly => Self::Daily,
            Self::Daily => Self::Hourly,
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => write!(f, "hourly"),
            Self::Daily => write!(f, "daily"),
        }
    }
}
