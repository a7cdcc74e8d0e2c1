//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    config::InputMode,
    grid::{Grid, CELL_WIDTH},
    palette,
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
    App,
};

/// Style of menu entries that are not under the cursor.
const CONTENT_STYLE: Style = Style::new().fg(Color::Green);

/// Style of the menu entry under the cursor.
const ACTIVE_CONTENT_STYLE: Style = Style::new().fg(Color::White).bg(Color::Green);

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from layout lookups or size conversions on the game screen.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match &app.screen {
        Screen::MainMenu(item) => main_menu(frame, *item),
        Screen::OptionsMenu(item) => options_menu(frame, *item, app.input),
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the generic layout structure for the main and options menus.
///
/// This function creates the centered, bordered block shared by both menus and returns one
/// single-line area per entry. The specific menu content is handled by the caller using the
/// [`MenuType`] parameter.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: &MenuType) -> Rc<[Rect]> {
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(frame.area())[1];

    let layout = Layout::vertical([Constraint::Length(u16::from(menu.value()) + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); usize::from(menu.value())]).split(inner_space)
}

/// Renders a list of menu entries, highlighting the one under the cursor.
fn render_entries(frame: &mut Frame, areas: &[Rect], entries: &[(String, bool)]) {
    for (area, (label, selected)) in areas.iter().zip(entries) {
        let style = if *selected {
            ACTIVE_CONTENT_STYLE
        } else {
            CONTENT_STYLE
        };
        frame.render_widget(Line::styled(label.as_str(), style).centered(), *area);
    }
}

/// Renders the main menu screen with navigation options.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::MainMenu(3));

    render_entries(
        frame,
        &inner_layout,
        &[
            ("Start Game".to_owned(), item == MainMenuItem::StartGame),
            ("Options".to_owned(), item == MainMenuItem::Options),
            ("Quit".to_owned(), item == MainMenuItem::Quit),
        ],
    );
}

/// Renders the options menu screen.
///
/// The first entry shows the active source of move directions and flips it when selected; the
/// second returns to the main menu.
pub(crate) fn options_menu(frame: &mut Frame, item: OptionsMenuItem, input: InputMode) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::OptionsMenu(2));

    render_entries(
        frame,
        &inner_layout,
        &[
            (
                format!("Input: {}", input.label()),
                item == OptionsMenuItem::Input,
            ),
            ("Return".to_owned(), item == OptionsMenuItem::Back),
        ],
    );
}

/// Builds one line per grid row, each cell right-aligned and colored by its value.
pub(crate) fn board_lines(grid: &Grid) -> Vec<Line<'static>> {
    (0..grid.rows())
        .map(|row| {
            let cells: Vec<Span<'static>> = (0..grid.cols())
                .map(|col| match grid.get(row, col) {
                    Some(value) => Span::styled(
                        format!("{value:>CELL_WIDTH$}"),
                        Style::default().fg(palette::tile_color(value)),
                    ),
                    None => Span::raw(" ".repeat(CELL_WIDTH)),
                })
                .collect();
            Line::from(cells)
        })
        .collect()
}

/// Builds the status line shown under the board.
pub(crate) fn status_line(app: &App) -> String {
    let last_move = app.driver.last_move.map_or("-", |direction| direction.name());
    let mut status = format!(
        "turn {} | last move: {last_move} | input: {} | tiles: {}/{}",
        app.driver.turns,
        app.input.label(),
        app.grid.len(),
        app.grid.capacity()
    );
    if app.driver.is_stalled() {
        status.push_str(" | board full");
    }

    status
}

/// Renders the in-game screen with the board and the status footer.
///
/// The board is drawn centered in a bordered block sized to the grid, so every settling pass of
/// the driver shows up as its own frame.
///
/// # Errors
///
/// This function may return errors if the grid does not fit the terminal's coordinate range or a
/// layout area cannot be retrieved.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(frame.area());
    let content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get board content area from layout")?;
    let footer_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get footer area from layout")?;

    let board_width = u16::try_from(app.grid.cols() * CELL_WIDTH + 2)?;
    let board_height = u16::try_from(app.grid.rows() + 2)?;

    let board_area = Layout::vertical([Constraint::Length(board_height)])
        .flex(Flex::Center)
        .split(content_area)
        .first()
        .copied()
        .ok_or_eyre("failed to get board row from layout")?;
    let board_area = Layout::horizontal([Constraint::Length(board_width)])
        .flex(Flex::Center)
        .split(board_area)
        .first()
        .copied()
        .ok_or_eyre("failed to get board area from layout")?;

    let board_block = Block::bordered()
        .title(format!("{}x{}", app.grid.rows(), app.grid.cols()))
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    frame.render_widget(
        Paragraph::new(board_lines(&app.grid)).block(board_block),
        board_area,
    );

    let hints = match app.input {
        InputMode::Keys => "(hjkl) move / (m) random / (r) restart / (esc) menu / (q) quit",
        InputMode::Random => "(m) keys / (r) restart / (esc) menu / (q) quit",
    };
    let footer_block = Block::bordered()
        .title(hints)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);

    frame.render_widget(
        Paragraph::new(Line::raw(status_line(app)).centered()).block(footer_block),
        footer_area,
    );

    Ok(())
}
