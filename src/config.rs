//! Command line configuration.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

/// Default number of grid rows.
pub(crate) const DEFAULT_ROWS: u16 = 16;

/// Default number of grid columns.
pub(crate) const DEFAULT_COLS: u16 = 8;

/// Default delay between animation frames in milliseconds.
pub(crate) const DEFAULT_FRAME_DELAY_MS: u64 = 100;

/// Runtime configuration parsed from the command line.
///
/// This structure holds the grid dimensions, the seed for the random source, the origin of move
/// directions and the animation pacing. Its [`Default`] implementation mirrors the command line
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of grid rows.
    #[arg(short, long, default_value_t = DEFAULT_ROWS, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub rows: u16,
    /// Number of grid columns.
    #[arg(short, long, default_value_t = DEFAULT_COLS, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub cols: u16,
    /// Seed for tile spawns and random moves; drawn from the OS when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Where move directions come from.
    #[arg(short, long, value_enum, default_value_t = InputMode::Random)]
    pub input: InputMode,
    /// Delay between animation frames, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub frame_delay_ms: u64,
    /// Append log records to this file. Logging is off when omitted.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            input: InputMode::Random,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            log_file: None,
        }
    }
}

impl Config {
    /// Delay between animation frames.
    #[must_use]
    pub const fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

/// Source of move directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// A direction is drawn at random every turn.
    #[default]
    Random,
    /// The player picks every direction from the keyboard.
    Keys,
}

impl InputMode {
    /// Returns the other input mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Random => Self::Keys,
            Self::Keys => Self::Random,
        }
    }

    /// Returns the label shown in menus and the status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Keys => "keys",
        }
    }
}
