//! Type definitions and enums for the application state and navigation.

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu(MainMenuItem),
    /// Options configuration screen.
    ///
    /// This variant represents the options menu, where the source of move directions is chosen.
    OptionsMenu(OptionsMenuItem),
    /// In-game board screen.
    ///
    /// This variant represents the screen where the grid is displayed while tiles spawn, slide and
    /// merge.
    InGame,
}

/// Main menu navigation options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start Game" menu option.
    StartGame,
    /// "Options" menu option.
    Options,
    /// "Quit" menu option.
    Quit,
}

/// Options menu navigation choices.
///
/// This enumeration holds the different items in the options menu. It is used to determine which
/// items can the user select in the options menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OptionsMenuItem {
    /// Input mode toggle.
    Input,
    /// "Return" navigation option.
    Back,
}

/// Generic menu type configuration.
///
/// This enumeration holds the different specifics particular to each generic menu type in the
/// application's interface. Both menus share their centered, bordered layout and differ only in
/// title and entry count.
pub(crate) enum MenuType {
    /// Main menu configuration.
    MainMenu(u8),
    /// Options menu configuration.
    OptionsMenu(u8),
}

impl MenuType {
    /// Returns the title drawn in the menu's border.
    pub(crate) const fn repr(&self) -> &str {
        match self {
            Self::MainMenu(_) => "Main Menu",
            Self::OptionsMenu(_) => "Options Menu",
        }
    }

    /// Returns the number of entries in the menu.
    ///
    /// This function provides access to the number of menu items for layout calculations, allowing
    /// the UI to properly size the menu containers.
    pub(crate) const fn value(&self) -> u8 {
        match self {
            Self::MainMenu(value) | Self::OptionsMenu(value) => *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_variants() {
        let main_menu = Screen::MainMenu(MainMenuItem::StartGame);
        let options_menu = Screen::OptionsMenu(OptionsMenuItem::Input);

        assert_eq!(main_menu, Screen::MainMenu(MainMenuItem::StartGame));
        assert_ne!(main_menu, Screen::InGame);
        assert_ne!(options_menu, Screen::OptionsMenu(OptionsMenuItem::Back));
    }

    #[test]
    fn test_menu_type_repr_and_value() {
        let main_menu = MenuType::MainMenu(3);
        let options_menu = MenuType::OptionsMenu(2);

        assert_eq!(main_menu.repr(), "Main Menu");
        assert_eq!(options_menu.repr(), "Options Menu");
        assert_eq!(main_menu.value(), 3);
        assert_eq!(options_menu.value(), 2);
    }

    #[test]
    fn test_debug_implementations() {
        assert_eq!(format!("{:?}", Screen::InGame), "InGame");
        assert_eq!(format!("{:?}", MainMenuItem::StartGame), "StartGame");
        assert_eq!(format!("{:?}", OptionsMenuItem::Input), "Input");
    }
}
