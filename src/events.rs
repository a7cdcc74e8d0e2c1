//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use log::{debug, info};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    config::InputMode,
    grid::Direction,
    types::{MainMenuItem, OptionsMenuItem, Screen},
    App,
};

/// Longest time to block waiting for input before the game is updated again.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler
/// functions based on the key pressed. It uses a timeout no longer than one animation frame so the
/// game keeps advancing while no key is pressed.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_TIMEOUT.min(app.driver.frame_delay))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code);
            }
        }
    }

    if matches!(app.screen, Screen::InGame) {
        app.driver.update(&mut app.grid, &mut app.rng, app.input);
    }

    Ok(())
}

/// Dispatches a single key press according to the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    if code == KeyCode::Char('q') {
        app.exit = true;
        return;
    }

    if matches!(app.screen, Screen::InGame) {
        handle_game_key(app, code);
        return;
    }

    match code {
        KeyCode::Char('j') => handle_j_events(app),
        KeyCode::Char('k') => handle_k_events(app),
        KeyCode::Char('l') => handle_l_events(app),
        KeyCode::Char('h') => handle_h_events(app),
        _ => {}
    }
}

/// Maps a key to the direction it moves tiles in.
///
/// Both the vi keys and the arrow keys are accepted.
pub(crate) const fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('h') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('j') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('l') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Handles key presses on the in-game screen.
///
/// Direction keys are only taken in keyboard mode and only while the driver waits for a move;
/// presses during a settling animation are dropped. `m` switches between random and keyboard
/// moves without touching the board.
fn handle_game_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        KeyCode::Char('r') => app.new_game(),
        KeyCode::Char('m') => {
            app.input = app.input.toggled();
            info!("switched to {} moves", app.input.label());
        }
        _ => {
            if let Some(direction) = direction_for(code) {
                if app.input == InputMode::Keys && !app.driver.queue(direction) {
                    debug!("dropped {direction} key press while busy");
                }
            }
        }
    }
}

/// Handles 'j' key press events for downward navigation.
fn handle_j_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::Quit);
        }
        Screen::OptionsMenu(OptionsMenuItem::Input) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Back);
        }
        _ => {}
    }
}

/// Handles 'k' key press events for upward navigation.
fn handle_k_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Input);
        }
        _ => {}
    }
}

/// Handles 'l' key press events for selection and forward navigation.
///
/// This function processes the 'l' key press which is used for selecting menu items. Starting a
/// game always begins on an empty grid; selecting the input entry flips between random and
/// keyboard moves.
fn handle_l_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.new_game();
            app.screen = Screen::InGame;
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Input);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Input) => {
            app.input = app.input.toggled();
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::InGame => {}
    }
}

/// Handles 'h' key press events for backward navigation.
fn handle_h_events(app: &mut App) {
    if matches!(app.screen, Screen::OptionsMenu(_)) {
        app.screen = Screen::MainMenu(MainMenuItem::Options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, driver::Phase};

    /// Creates a seeded app on a small grid.
    fn create_test_app(input: InputMode) -> App {
        let config = Config {
            rows: 4,
            cols: 4,
            seed: Some(17),
            input,
            frame_delay_ms: 0,
            ..Config::default()
        };
        App::new(&config).expect("test app should build")
    }

    #[test]
    fn test_quit_from_any_screen() {
        for screen in [
            Screen::MainMenu(MainMenuItem::Options),
            Screen::OptionsMenu(OptionsMenuItem::Back),
            Screen::InGame,
        ] {
            let mut app = create_test_app(InputMode::Random);
            app.screen = screen;

            handle_key(&mut app, KeyCode::Char('q'));

            assert!(app.exit);
        }
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut app = create_test_app(InputMode::Random);

        handle_key(&mut app, KeyCode::Char('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Options));
        handle_key(&mut app, KeyCode::Char('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        handle_key(&mut app, KeyCode::Char('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        handle_key(&mut app, KeyCode::Char('k'));
        handle_key(&mut app, KeyCode::Char('k'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));

        handle_key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::InGame);
        assert!(app.grid.is_empty());
    }

    #[test]
    fn test_options_menu_toggles_input() {
        let mut app = create_test_app(InputMode::Random);
        app.screen = Screen::MainMenu(MainMenuItem::Options);

        handle_key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::OptionsMenu(OptionsMenuItem::Input));
        handle_key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.input, InputMode::Keys);
        handle_key(&mut app, KeyCode::Char('j'));
        handle_key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));

        app.screen = Screen::OptionsMenu(OptionsMenuItem::Input);
        handle_key(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Options));
    }

    #[test]
    fn test_direction_for_keys() {
        assert_eq!(direction_for(KeyCode::Char('h')), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Down), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Char('k')), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_game_keys_queue_moves_in_keys_mode() {
        let mut app = create_test_app(InputMode::Keys);
        app.screen = Screen::InGame;
        app.driver.phase = Phase::Choosing;

        handle_key(&mut app, KeyCode::Char('j'));

        assert_eq!(app.driver.last_move, Some(Direction::Down));
        assert!(matches!(app.driver.phase, Phase::Settling { .. }));
    }

    #[test]
    fn test_game_keys_ignored_in_random_mode() {
        let mut app = create_test_app(InputMode::Random);
        app.screen = Screen::InGame;
        app.driver.phase = Phase::Choosing;

        handle_key(&mut app, KeyCode::Left);

        assert_eq!(app.driver.phase, Phase::Choosing);
        assert_eq!(app.driver.last_move, None);
    }

    #[test]
    fn test_mode_switch_keeps_the_board() {
        let mut app = create_test_app(InputMode::Random);
        app.screen = Screen::InGame;
        for _ in 0..30 {
            app.driver.advance(&mut app.grid, &mut app.rng, app.input);
        }
        let board = app.grid.clone();
        let turns = app.driver.turns;
        assert!(!board.is_empty());

        handle_key(&mut app, KeyCode::Char('m'));
        assert_eq!(app.input, InputMode::Keys);
        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.grid, board);
        assert_eq!(app.driver.turns, turns);

        handle_key(&mut app, KeyCode::Char('m'));
        assert_eq!(app.input, InputMode::Random);
        assert_eq!(app.grid.len(), board.len());
    }

    #[test]
    fn test_restart_and_escape() {
        let mut app = create_test_app(InputMode::Random);
        app.screen = Screen::InGame;
        for _ in 0..6 {
            app.driver.advance(&mut app.grid, &mut app.rng, app.input);
        }

        handle_key(&mut app, KeyCode::Char('r'));
        assert!(app.grid.is_empty());
        assert_eq!(app.driver.phase, Phase::Spawning);

        handle_key(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
    }
}
