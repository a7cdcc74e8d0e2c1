//! Optional file logging.
//!
//! The terminal belongs to the renderer while the game runs, so log records never go to the
//! standard streams. They are appended to a file when one is configured and dropped otherwise.

use std::{fs::OpenOptions, path::Path};

use color_eyre::eyre::Result;
use env_logger::{Env, Target};

/// Initializes the global logger to append to `path`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Passing [`None`] leaves the logger
/// unset, which discards every record.
///
/// # Errors
///
/// This function may return errors if:
/// - The log file cannot be opened for appending
/// - A global logger has already been installed
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}
