//! Tile color palette for the in-game board.

use ratatui::style::Color;

/// Green channel of the tier-zero color, one step below the color of a 2 tile.
const BASE_GREEN: u32 = 0x44;

/// Brightness added to the green channel per tier.
const GREEN_STEP: u32 = 0x11;

/// Highest tier with its own shade; every tile above it shares the brightest green.
const MAX_TIER: u32 = 11;

/// Returns the color tier of a tile value, which is its base-two logarithm.
pub(crate) fn tier(value: u32) -> u32 {
    value.checked_ilog2().unwrap_or(0)
}

/// Maps a tile value to the shade of green it is drawn in.
///
/// Values 2 through 1024 step from `#005500` up to `#00EE00`; 2048 and above are `#00FF00`.
pub(crate) fn tile_color(value: u32) -> Color {
    let green = BASE_GREEN + GREEN_STEP * tier(value).min(MAX_TIER);

    Color::Rgb(0, u8::try_from(green).unwrap_or(u8::MAX), 0)
}
