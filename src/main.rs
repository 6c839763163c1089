mod config;
#[cfg_attr(not(target_arch = "arm"), path = "mock_display.rs")]
mod display;
mod draw;
mod forecast;
mod frame;
mod input;
mod provider;
mod view;

use crate::{config::Config, display::Display, view::ForecastView};
use anyhow::Context;
use log::info;
use std::{
    env,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("forecast_view=info"),
    )
    .init();

    // Optional config path as the only argument
    let config = Config::load(env::args_os().nth(1).map(PathBuf::from))?;

    // Data is loaded once per session
    let mut provider = provider::from_config(&config.provider);
    let (forecast, notice) = provider::load_forecast(provider.as_mut());
    let mut view =
        ForecastView::new(forecast, notice).with_mode(config.initial_mode);
    info!(
        "Forecast starts at {} / {}",
        view.forecast().hourly[0].label,
        view.forecast().daily[0].label
    );

    let mut display = Display::new(&config)?;
    let commands = input::spawn_stdin()?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::Relaxed))
        .context("Error setting termination handler")?;

    let mut dirty = true;
    while running.load(Ordering::Relaxed) {
        for command in commands.try_iter() {
            dirty |= view.set_view_mode(command.apply(view.mode()));
        }
        if dirty {
            display.tick(&view.render())?;
            dirty = false;
        }
        thread::sleep(config.tick_interval());
    }

    info!("Exiting");
    Ok(())
}
