//! A terminal sliding-tile merge puzzle.
//!
//! The [`grid`] module holds the engine: a sparse grid of numbered tiles that slide and merge
//! when pushed along one of four directions, with a random tile spawned every turn. The rest of
//! the crate drives that engine from a terminal user interface, with moves picked at random or
//! read from the keyboard.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod config;
mod driver;
mod events;
pub mod grid;
mod logging;
mod palette;
mod types;
mod ui;

pub use app::App;
pub use config::{Config, InputMode};
pub use logging::init as init_logging;
