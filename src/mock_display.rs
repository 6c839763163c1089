use crate::{
    config::Config,
    draw::{self, Palette},
    frame::Frame,
    view::ViewTree,
};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::Size};
use log::{info, trace};

/// Mock display, to allow running on machines without the e-ink panel. Draws
/// into an in-memory frame and logs what would've been shown.
#[derive(Debug)]
pub struct Display {
    frame: Frame,
    /// The view currently on the "screen"
    current: Option<ViewTree>,
    /// Number of frames pushed
    updates: usize,
}

impl Display {
    /// Same dimensions as the real panel, in landscape
    pub const SIZE: Size = Size::new(296, 128);

    pub fn new(_: &Config) -> anyhow::Result<Self> {
        info!("No e-ink panel on this platform, using mock display");
        Ok(Self {
            frame: Frame::new(Self::SIZE),
            current: None,
            updates: 0,
        })
    }

    /// Draw the view, if it changed since the last tick. Return whether or
    /// not a new frame was drawn.
    pub fn tick(&mut self, tree: &ViewTree) -> anyhow::Result<bool> {
        trace!("Running display tick");
        if self.current.as_ref() == Some(tree) {
            return Ok(false);
        }

        draw::draw_view(
            tree,
            &mut self.frame,
            Palette {
                ink: BinaryColor::On,
                paper: BinaryColor::Off,
            },
        )?;
        self.current = Some(tree.clone());
        self.updates += 1;
        info!("Display update #{}: {}", self.updates, tree.summary());
        Ok(true)
    }

    #[cfg(test)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forecast::{tests::fixed_forecast, ViewMode},
        view::ForecastView,
    };

    #[test]
    fn test_only_draws_changes() {
        let mut display = Display::new(&Config::default()).unwrap();
        let mut view = ForecastView::new(fixed_forecast(), None);

        assert!(display.tick(&view.render()).unwrap());
        assert!(!display.tick(&view.render()).unwrap());
        let hourly = display.frame().clone();

        view.set_view_mode(ViewMode::Daily);
        assert!(display.tick(&view.render()).unwrap());
        assert_ne!(display.frame(), &hourly);

        view.set_view_mode(ViewMode::Hourly);
        assert!(display.tick(&view.render()).unwrap());
        assert_eq!(display.frame(), &hourly);
        assert_eq!(display.updates, 3);
    }
}
