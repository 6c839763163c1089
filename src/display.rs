use crate::{
    config::Config,
    draw::{self, Palette},
    view::ViewTree,
};
use anyhow::{anyhow, Context};
use display_interface_spi::SPIInterface;
use linux_embedded_hal::{
    spidev::{SpiModeFlags, SpidevOptions},
    sysfs_gpio::Direction,
    Delay, SpidevDevice, SysfsPin,
};
use log::{info, trace};
use std::fmt::Debug;
use weact_studio_epd::{
    graphics::{Display290BlackWhite, DisplayRotation},
    Color, WeActStudio290BlackWhiteDriver,
};

const PIN_BUSY: u64 = 17; // GPIO/BCM 17, pin 11
const PIN_DC: u64 = 22; // GPIO/BCM 22, pin 15
const PIN_RESET: u64 = 27; // GPIO/BCM 27, pin 13

type Driver = WeActStudio290BlackWhiteDriver<
    SPIInterface<SpidevDevice, SysfsPin>,
    SysfsPin,
    SysfsPin,
    Delay,
>;

/// Manage hardware communication for the e-ink panel
pub struct Display {
    driver: Driver,
    display: Display290BlackWhite,
    /// The view currently on the screen
    current: Option<ViewTree>,
}

impl Display {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut spi =
            SpidevDevice::open(&config.display_port).context("SPI device")?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(1_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("SPI configuration")?;

        let reset = init_pin(PIN_RESET, Direction::Out)
            .context("Initializing pin Reset")?;
        let dc =
            init_pin(PIN_DC, Direction::Out).context("Initializing pin D/C")?;
        let busy = init_pin(PIN_BUSY, Direction::In)
            .context("Initializing pin Busy")?;

        let interface = SPIInterface::new(spi, dc);
        let mut driver = Driver::new(interface, busy, reset, Delay);
        driver.init().map_err(map_error)?;
        info!("Display controller initialized");

        let mut display = Display290BlackWhite::new();
        display.set_rotation(DisplayRotation::Rotate90);

        Ok(Self {
            driver,
            display,
            current: None,
        })
    }

    /// Draw the view and push it to the panel, if it changed since the last
    /// tick. The panel is slow to refresh, so skipping unchanged frames
    /// matters. Return whether or not a new frame was sent.
    pub fn tick(&mut self, tree: &ViewTree) -> anyhow::Result<bool> {
        trace!("Running display tick");
        if self.current.as_ref() == Some(tree) {
            return Ok(false);
        }

        trace!("View changed: {}", tree.summary());
        draw::draw_view(
            tree,
            &mut self.display,
            Palette {
                ink: Color::Black,
                paper: Color::White,
            },
        )?;
        trace!("Sending frame to display");
        self.driver
            .full_update(&self.display)
            .map_err(map_error)?;
        trace!("Done updating display");
        self.current = Some(tree.clone());
        Ok(true)
    }
}

/// Initialize a GPIO pin
fn init_pin(pin_num: u64, direction: Direction) -> anyhow::Result<SysfsPin> {
    let pin = SysfsPin::new(pin_num);
    pin.export().context("Error exporting pin")?;
    while !pin.is_exported() {}
    pin.set_direction(direction)
        .context("Error setting pin direction")?;
    if matches!(direction, Direction::Out) {
        pin.set_value(1).context("Error enabling pin")?;
    }
    Ok(pin)
}

/// The error type from the driver doesn't implement Error so we have to map
/// manually
fn map_error<E: Debug>(error: E) -> anyhow::Error {
    anyhow!("{error:?}")
}
