//! User input. Mode selections are read from stdin on a background thread and
//! handed to the UI loop over a channel, so view state is only ever touched
//! by the main thread.

use crate::forecast::ViewMode;
use anyhow::{bail, Context};
use log::{info, warn};
use std::{
    io::{self, BufRead},
    str::FromStr,
    sync::mpsc::{self, Receiver},
    thread,
};

/// A single user selection
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModeCommand {
    Set(ViewMode),
    Toggle,
}

impl ModeCommand {
    /// Get the mode to switch to, given the current one
    pub fn apply(self, current: ViewMode) -> ViewMode {
        match self {
            Self::Set(mode) => mode,
            Self::Toggle => current.toggled(),
        }
    }
}

impl FromStr for ModeCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hourly" => Ok(Self::Set(ViewMode::Hourly)),
            "d" | "daily" => Ok(Self::Set(ViewMode::Daily)),
            "t" | "toggle" => Ok(Self::Toggle),
            other => bail!("Unknown command `{other}`"),
        }
    }
}

/// Spawn a thread that reads commands from stdin, one per line. Bad lines are
/// logged and skipped. The channel closes when stdin does.
pub fn spawn_stdin() -> anyhow::Result<Receiver<ModeCommand>> {
    let (tx, rx) = mpsc::channel::<ModeCommand>();
    thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            info!("Reading commands from stdin: h(ourly), d(aily), t(oggle)");
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("Error reading stdin: {err}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ModeCommand>() {
                    Ok(command) => {
                        // Receiver is gone, we're shutting down
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!("{err}"),
                }
            }
            info!("stdin closed");
        })
        .context("Error spawning input thread")?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::hourly_short("h", ModeCommand::Set(ViewMode::Hourly))]
    #[case::hourly_long("Hourly", ModeCommand::Set(ViewMode::Hourly))]
    #[case::daily_short("d\n", ModeCommand::Set(ViewMode::Daily))]
    #[case::daily_long(" DAILY ", ModeCommand::Set(ViewMode::Daily))]
    #[case::toggle("t", ModeCommand::Toggle)]
    fn test_parse(#[case] input: &str, #[case] expected: ModeCommand) {
        assert_eq!(input.parse::<ModeCommand>().unwrap(), expected);
    }

    #[rstest]
    #[case::weekly("weekly")]
    #[case::number("2")]
    fn test_parse_unknown(#[case] input: &str) {
        assert!(input.parse::<ModeCommand>().is_err());
    }

    #[test]
    fn test_apply() {
        assert_eq!(
            ModeCommand::Set(ViewMode::Daily).apply(ViewMode::Daily),
            ViewMode::Daily
        );
        assert_eq!(ModeCommand::Toggle.apply(ViewMode::Hourly), ViewMode::Daily);
        assert_eq!(ModeCommand::Toggle.apply(ViewMode::Daily), ViewMode::Hourly);
    }
}
