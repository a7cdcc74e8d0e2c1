//! Core application state and logic for the tile merge game.

use color_eyre::eyre::Result;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::DefaultTerminal;

use crate::{
    config::{Config, InputMode},
    driver::Driver,
    events,
    grid::Grid,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the tile merge game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// The board being played.
    ///
    /// This field is the only grid of the application. It keeps its dimensions for the whole run
    /// and is cleared whenever a new game starts.
    pub(crate) grid: Grid,
    /// Turn driver pacing spawns and settling passes.
    pub(crate) driver: Driver,
    /// Random source for tile spawns and random moves.
    pub(crate) rng: StdRng,
    /// Current source of move directions.
    pub(crate) input: InputMode,
}

impl App {
    /// Creates a new application from the parsed configuration.
    ///
    /// The random source is seeded from the configuration when a seed is given and from the
    /// operating system otherwise.
    ///
    /// # Errors
    ///
    /// This function may return errors if the configured grid dimensions are not positive.
    pub fn new(config: &Config) -> Result<Self> {
        let grid = Grid::new(config.rows.into(), config.cols.into())?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            grid,
            driver: Driver::new(config.frame_delay()),
            rng,
            input: config.input,
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Starts a fresh game on an empty grid with the same dimensions.
    pub(crate) fn new_game(&mut self) {
        info!(
            "new {}x{} game with {} input",
            self.grid.rows(),
            self.grid.cols(),
            self.input.label()
        );
        self.grid.clear();
        self.driver.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Phase;

    #[test]
    fn test_new_uses_config() {
        let config = Config {
            rows: 3,
            cols: 5,
            seed: Some(1),
            input: InputMode::Keys,
            ..Config::default()
        };

        let app = App::new(&config).expect("app should build");

        assert_eq!(app.grid.rows(), 3);
        assert_eq!(app.grid.cols(), 5);
        assert!(app.grid.is_empty());
        assert_eq!(app.input, InputMode::Keys);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
        assert!(!app.exit);
    }

    #[test]
    fn test_new_rejects_zero_rows() {
        let config = Config {
            rows: 0,
            ..Config::default()
        };

        assert!(App::new(&config).is_err());
    }

    #[test]
    fn test_seeded_apps_play_identically() {
        let config = Config {
            rows: 4,
            cols: 4,
            seed: Some(99),
            ..Config::default()
        };
        let mut first = App::new(&config).expect("app should build");
        let mut second = App::new(&config).expect("app should build");

        for _ in 0..40 {
            first
                .driver
                .advance(&mut first.grid, &mut first.rng, first.input);
            second
                .driver
                .advance(&mut second.grid, &mut second.rng, second.input);
        }

        assert_eq!(first.grid, second.grid);
        assert_eq!(first.driver.turns, second.driver.turns);
    }

    #[test]
    fn test_new_game_clears_state() {
        let config = Config {
            seed: Some(3),
            ..Config::default()
        };
        let mut app = App::new(&config).expect("app should build");
        for _ in 0..10 {
            app.driver.advance(&mut app.grid, &mut app.rng, app.input);
        }
        assert!(!app.grid.is_empty());

        app.new_game();

        assert!(app.grid.is_empty());
        assert_eq!(app.driver.phase, Phase::Spawning);
        assert_eq!(app.driver.turns, 0);
    }
}
