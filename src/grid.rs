//! Grid engine module.
//!
//! This module contains the [`Grid`] struct holding the sparse tile mapping, the [`Direction`]
//! enumeration with its sweep plans, and the push, sweep and shift operations that slide and merge
//! tiles.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
};

use color_eyre::eyre::{ensure, Result};
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

/// Cell coordinate as a `(row, col)` pair.
pub type Coord = (usize, usize);

/// Width in terminal columns of a single rendered cell.
pub const CELL_WIDTH: usize = 5;

/// Axis-aligned push direction.
///
/// Each variant maps to a single sweep plan describing the order in which cells are scanned and
/// the unit step a tile takes, so one routine serves all four directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column zero.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Returns the unit step `(drow, dcol)` a tile takes when pushed in this direction.
    #[must_use]
    pub const fn step(self) -> (isize, isize) {
        self.plan().step
    }

    /// Returns the lowercase name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Sweep plan table.
    ///
    /// The outer loop runs from the wall the tiles travel towards, so cells nearest that wall are
    /// pushed before the cells behind them within a single scan.
    const fn plan(self) -> SweepPlan {
        match self {
            Self::Down => SweepPlan {
                outer: Axis::Rows,
                reversed: true,
                step: (1, 0),
            },
            Self::Up => SweepPlan {
                outer: Axis::Rows,
                reversed: false,
                step: (-1, 0),
            },
            Self::Left => SweepPlan {
                outer: Axis::Cols,
                reversed: false,
                step: (0, -1),
            },
            Self::Right => SweepPlan {
                outer: Axis::Cols,
                reversed: true,
                step: (0, 1),
            },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match rng.gen_range(0..=3_u8) {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

/// Axis iterated by the outer loop of a sweep.
#[derive(Clone, Copy, Debug)]
enum Axis {
    /// Outer loop over rows, inner loop over columns left to right.
    Rows,
    /// Outer loop over columns, inner loop over rows top to bottom.
    Cols,
}

/// Scan order and step vector used by a sweep in one direction.
#[derive(Clone, Copy, Debug)]
struct SweepPlan {
    /// Axis of the outer loop.
    outer: Axis,
    /// Whether the outer loop runs from the highest index down to zero.
    reversed: bool,
    /// Unit step applied to every pushed tile.
    step: (isize, isize),
}

impl SweepPlan {
    /// Yields every cell of a `rows` by `cols` grid in this plan's scan order.
    fn cells(self, rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
        let (outer_len, inner_len) = match self.outer {
            Axis::Rows => (rows, cols),
            Axis::Cols => (cols, rows),
        };

        (0..outer_len).flat_map(move |idx| {
            let outer = if self.reversed {
                outer_len - 1 - idx
            } else {
                idx
            };
            (0..inner_len).map(move |inner| match self.outer {
                Axis::Rows => (outer, inner),
                Axis::Cols => (inner, outer),
            })
        })
    }
}

/// Outcome of pushing a single tile one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Push {
    /// The source cell was empty.
    Idle,
    /// The tile sits against the wall or against a tile with a different value.
    Blocked,
    /// The tile slid into the empty neighbouring cell.
    Moved,
    /// The tile merged into an equal neighbour, which doubled.
    Merged,
}

impl Push {
    /// Whether the push altered the grid.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Moved | Self::Merged)
    }
}

/// Summary of a full move resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shift {
    /// Whether any cell changed during the move.
    pub changed: bool,
    /// Number of full scans performed, including the final scan that changed nothing.
    pub passes: usize,
}

/// Tile placed by [`Grid::spawn_random_tile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Row of the new tile.
    pub row: usize,
    /// Column of the new tile.
    pub col: usize,
    /// Value of the new tile, either 2 or 4.
    pub value: u32,
}

/// Sparse grid of numbered tiles.
///
/// This structure holds the fixed dimensions of the board and an ordered mapping from occupied
/// coordinates to tile values. An absent key is an empty cell. Every stored value is a power of
/// two of at least 2 and every key lies within the grid bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows, fixed at construction.
    rows: usize,
    /// Number of columns, fixed at construction.
    cols: usize,
    /// Occupied cells and their values.
    tiles: BTreeMap<Coord, u32>,
}

impl Grid {
    /// Creates an empty grid with the given dimensions.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        ensure!(
            rows > 0 && cols > 0,
            "grid dimensions must be positive, got {rows}x{cols}"
        );

        Ok(Self {
            rows,
            cols,
            tiles: BTreeMap::new(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether every cell is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tiles.len() >= self.capacity()
    }

    /// Returns the value at `(row, col)`, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.tiles.get(&(row, col)).copied()
    }

    /// Enumerates occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, u32)> + '_ {
        self.tiles.iter().map(|(&coord, &value)| (coord, value))
    }

    /// Enumerates empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
            .filter(move |coord| !self.tiles.contains_key(coord))
    }

    /// Sum of all tile values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.tiles.values().map(|&value| u64::from(value)).sum()
    }

    /// Highest tile value on the grid, if any tile exists.
    #[must_use]
    pub fn highest(&self) -> Option<u32> {
        self.tiles.values().copied().max()
    }

    /// Removes every tile, keeping the dimensions.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Places `value` at `(row, col)` if that cell is empty.
    ///
    /// Returns `true` when the tile was placed and `false` when the cell was already occupied,
    /// in which case the grid is left untouched.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - The coordinate lies outside the grid
    /// - The value is not a power of two of at least 2
    pub fn add_tile(&mut self, row: usize, col: usize, value: u32) -> Result<bool> {
        ensure!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.rows,
            self.cols
        );
        ensure!(
            value >= 2 && value.is_power_of_two(),
            "tile value {value} is not a power of two of at least 2"
        );

        match self.tiles.entry((row, col)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let _ = slot.insert(value);
                Ok(true)
            }
        }
    }

    /// Places a 2 or a 4, with equal odds, on a uniformly chosen empty cell.
    ///
    /// Returns [`None`] without touching the grid when no empty cell is left.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Spawn> {
        let empty: Vec<Coord> = self.empty_cells().collect();
        if empty.is_empty() {
            return None;
        }

        let (row, col) = *empty.get(rng.gen_range(0..empty.len()))?;
        let value = rng.gen_range(1..=2_u32) * 2;
        let _ = self.tiles.insert((row, col), value);

        Some(Spawn { row, col, value })
    }

    /// Pushes the tile at `(row, col)` a single cell in `direction`.
    ///
    /// A tile moves into an empty neighbour or merges into a neighbour of equal value, leaving its
    /// source cell empty. A wall, an unequal neighbour or an empty source leave the grid as it was.
    pub fn push_tile(&mut self, row: usize, col: usize, direction: Direction) -> Push {
        let Some(value) = self.get(row, col) else {
            return Push::Idle;
        };
        let Some(target) = self.neighbor((row, col), direction) else {
            return Push::Blocked;
        };

        match self.tiles.get(&target).copied() {
            Some(other) if other == value => {
                let Some(doubled) = value.checked_mul(2) else {
                    return Push::Blocked;
                };
                let _ = self.tiles.remove(&(row, col));
                let _ = self.tiles.insert(target, doubled);
                Push::Merged
            }
            Some(_) => Push::Blocked,
            None => {
                let _ = self.tiles.remove(&(row, col));
                let _ = self.tiles.insert(target, value);
                Push::Moved
            }
        }
    }

    /// Runs one full scan in `direction`, pushing every cell once in sweep order.
    ///
    /// Returns whether any cell changed.
    pub fn sweep(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        for (row, col) in direction.plan().cells(self.rows, self.cols) {
            changed |= self.push_tile(row, col, direction).changed();
        }

        changed
    }

    /// Resolves a full move by sweeping until a scan changes nothing.
    pub fn shift(&mut self, direction: Direction) -> Shift {
        let mut shift = Shift::default();
        loop {
            shift.passes += 1;
            if !self.sweep(direction) {
                break;
            }
            shift.changed = true;
        }

        shift
    }

    /// Returns the in-bounds neighbour of `coord` one step in `direction`.
    fn neighbor(&self, (row, col): Coord, direction: Direction) -> Option<Coord> {
        let (drow, dcol) = direction.step();
        let row = row.checked_add_signed(drow)?;
        let col = col.checked_add_signed(dcol)?;

        (row < self.rows && col < self.cols).then_some((row, col))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                match self.get(row, col) {
                    Some(value) => write!(f, "{value:>CELL_WIDTH$}")?,
                    None => write!(f, "{:CELL_WIDTH$}", "")?,
                }
            }
        }

        Ok(())
    }
}
