//! The forecast widget. Holds the view mode and the data, and renders them
//! into a [ViewTree]. Rendering is pure; turning the tree into pixels is the
//! job of [crate::draw].

use crate::forecast::{ForecastPoint, ForecastSet, ViewMode, HORIZON};
use itertools::Itertools;
use log::info;

#[derive(Debug)]
pub struct ForecastView {
    mode: ViewMode,
    /// Never modified after construction
    forecast: ForecastSet,
    /// Shown under the grid, e.g. when the forecast couldn't be loaded
    notice: Option<String>,
}

impl ForecastView {
    pub const TITLE: &'static str = "Weather Forecast";

    pub fn new(forecast: ForecastSet, notice: Option<String>) -> Self {
        Self {
            mode: ViewMode::default(),
            forecast,
            notice,
        }
    }

    /// Start in a mode other than the default, e.g. from config. This isn't a
    /// user selection, so nothing is logged.
    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn forecast(&self) -> &ForecastSet {
        &self.forecast
    }

    /// Switch view mode. Return whether anything changed, so the caller can
    /// skip re-rendering if it didn't.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!("Switching view mode {} -> {}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// Build the view tree for the current mode. Cells are in exactly the
    /// order the forecast gives them.
    pub fn render(&self) -> ViewTree {
        let toggle = |label, mode| Toggle {
            label,
            mode,
            active: self.mode == mode,
        };
        ViewTree {
            title: Self::TITLE,
            toggles: [
                toggle("Next 6 Hours", ViewMode::Hourly),
                toggle("Next 6 Days", ViewMode::Daily),
            ],
            cells: self.forecast.points(self.mode).clone(),
            notice: self.notice.clone(),
        }
    }
}

/// Everything that ends up on screen, as plain data. Two trees that compare
/// equal produce identical frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewTree {
    pub title: &'static str,
    pub toggles: [Toggle; 2],
    pub cells: [ForecastPoint; HORIZON],
    pub notice: Option<String>,
}

impl ViewTree {
    /// One-line summary, for logging
    pub fn summary(&self) -> String {
        self.cells
            .iter()
            .map(|cell| {
                format!(
                    "{} {} {}/{}",
                    cell.label,
                    cell.condition_icon,
                    cell.temperature,
                    cell.feels_like
                )
            })
            .join(" | ")
    }
}

/// Mode selector button
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggle {
    pub label: &'static str,
    pub mode: ViewMode,
    pub active: bool,
}
