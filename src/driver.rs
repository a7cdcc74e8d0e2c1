//! Turn driver and frame pacing module.
//!
//! This module contains the [`Driver`] that walks the game through its turns: spawning a tile,
//! picking a direction and settling the move one sweep per animation frame, so the renderer shows
//! every settling pass.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::{
    config::InputMode,
    grid::{Direction, Grid},
};

/// Frames spent choosing before a random direction is drawn.
pub(crate) const RANDOM_MOVE_IDLE_FRAMES: u32 = 3;

/// Stage of the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// A new tile is placed on the next frame.
    Spawning,
    /// Waiting for a direction, either drawn at random or pressed by the player.
    Choosing,
    /// The move is being resolved one sweep per frame.
    Settling {
        /// Direction being resolved.
        direction: Direction,
        /// Sweeps run so far in this move.
        passes: usize,
        /// Whether any sweep of this move changed the grid.
        changed: bool,
    },
    /// The last spawn found no empty cell; nothing happens until the game is restarted.
    Stalled,
}

/// Turn state manager for the running game.
///
/// This structure tracks the current phase of the turn, the timing between animation frames and a
/// few counters shown in the status line.
#[derive(Debug)]
pub(crate) struct Driver {
    /// Current phase of the turn.
    pub(crate) phase: Phase,
    /// Timestamp of the last processed frame.
    pub(crate) last_update_time: Instant,
    /// Minimum time between two processed frames.
    pub(crate) frame_delay: Duration,
    /// Number of completed turns since the game started.
    pub(crate) turns: u64,
    /// Direction of the most recently started move.
    pub(crate) last_move: Option<Direction>,
    /// Frames spent in the choosing phase of the current turn.
    pub(crate) idle_frames: u32,
}

impl Driver {
    /// Creates a driver at the start of a game.
    pub(crate) fn new(frame_delay: Duration) -> Self {
        Self {
            phase: Phase::Spawning,
            last_update_time: Instant::now(),
            frame_delay,
            turns: 0,
            last_move: None,
            idle_frames: 0,
        }
    }

    /// Resets the driver to the start of a game.
    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Spawning;
        self.last_update_time = Instant::now();
        self.turns = 0;
        self.last_move = None;
        self.idle_frames = 0;
    }

    /// Whether the driver is waiting for a direction.
    pub(crate) const fn is_choosing(&self) -> bool {
        matches!(self.phase, Phase::Choosing)
    }

    /// Whether the game is stuck on a full grid.
    pub(crate) const fn is_stalled(&self) -> bool {
        matches!(self.phase, Phase::Stalled)
    }

    /// Starts settling a move in `direction` if the driver is waiting for one.
    ///
    /// Returns whether the direction was accepted. Directions arriving during any other phase are
    /// dropped.
    pub(crate) fn queue(&mut self, direction: Direction) -> bool {
        if !self.is_choosing() {
            return false;
        }

        self.begin(direction);
        true
    }

    /// Advances the turn by one frame once the frame delay has elapsed.
    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        input: InputMode,
    ) {
        if self.last_update_time.elapsed() >= self.frame_delay {
            self.last_update_time = Instant::now();
            self.advance(grid, rng, input);
        }
    }

    /// Performs one frame worth of work regardless of timing.
    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        input: InputMode,
    ) {
        match self.phase {
            Phase::Spawning => match grid.spawn_random_tile(rng) {
                Some(spawn) => {
                    debug!("spawned {} at ({}, {})", spawn.value, spawn.row, spawn.col);
                    self.phase = Phase::Choosing;
                }
                None => {
                    warn!("board full after {} turns", self.turns);
                    self.phase = Phase::Stalled;
                }
            },
            Phase::Choosing => {
                if input == InputMode::Random {
                    self.idle_frames += 1;
                    if self.idle_frames >= RANDOM_MOVE_IDLE_FRAMES {
                        self.begin(rng.gen());
                    }
                }
            }
            Phase::Settling {
                direction,
                passes,
                changed,
            } => {
                if grid.sweep(direction) {
                    debug!("{direction} pass {} changed the grid", passes + 1);
                    self.phase = Phase::Settling {
                        direction,
                        passes: passes + 1,
                        changed: true,
                    };
                } else {
                    self.turns += 1;
                    info!(
                        "turn {}: {direction} settled after {} passes (changed: {changed}, tiles: {}, highest: {})",
                        self.turns,
                        passes + 1,
                        grid.len(),
                        grid.highest().unwrap_or(0)
                    );
                    debug!("grid after turn {}:\n{grid}", self.turns);
                    self.phase = Phase::Spawning;
                }
            }
            Phase::Stalled => {}
        }
    }

    /// Enters the settling phase for `direction`.
    fn begin(&mut self, direction: Direction) {
        self.idle_frames = 0;
        self.last_move = Some(direction);
        self.phase = Phase::Settling {
            direction,
            passes: 0,
            changed: false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Creates a driver that processes every frame immediately.
    fn create_test_driver() -> Driver {
        Driver::new(Duration::ZERO)
    }

    #[test]
    fn test_random_turn_cycle() {
        let mut driver = create_test_driver();
        let mut grid = Grid::new(4, 4).expect("valid dimensions");
        let mut rng = StdRng::seed_from_u64(5);

        driver.advance(&mut grid, &mut rng, InputMode::Random);
        assert_eq!(grid.len(), 1);
        assert!(driver.is_choosing());

        for _ in 1..RANDOM_MOVE_IDLE_FRAMES {
            driver.advance(&mut grid, &mut rng, InputMode::Random);
            assert!(driver.is_choosing());
        }
        driver.advance(&mut grid, &mut rng, InputMode::Random);
        assert!(matches!(driver.phase, Phase::Settling { passes: 0, .. }));
        assert!(driver.last_move.is_some());
        assert_eq!(driver.idle_frames, 0);

        for _ in 0..16 {
            if driver.phase == Phase::Spawning {
                break;
            }
            driver.advance(&mut grid, &mut rng, InputMode::Random);
        }
        assert_eq!(driver.phase, Phase::Spawning);
        assert_eq!(driver.turns, 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_keys_mode_waits_for_queued_direction() {
        let mut driver = create_test_driver();
        let mut grid = Grid::new(1, 3).expect("valid dimensions");
        let mut rng = StdRng::seed_from_u64(9);

        assert!(!driver.queue(Direction::Left));

        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        assert!(driver.is_choosing());

        assert!(driver.queue(Direction::Left));
        assert!(!driver.queue(Direction::Right));
        assert_eq!(driver.last_move, Some(Direction::Left));
    }

    #[test]
    fn test_settling_renders_one_pass_per_frame() {
        let mut driver = create_test_driver();
        let mut grid = Grid::new(1, 3).expect("valid dimensions");
        let placed = grid.add_tile(0, 2, 2).expect("valid tile");
        assert!(placed);
        let mut rng = StdRng::seed_from_u64(1);
        driver.phase = Phase::Choosing;

        assert!(driver.queue(Direction::Left));
        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        assert_eq!(grid.get(0, 1), Some(2));
        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        assert_eq!(grid.get(0, 0), Some(2));
        assert_eq!(
            driver.phase,
            Phase::Settling {
                direction: Direction::Left,
                passes: 2,
                changed: true,
            }
        );

        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        assert_eq!(driver.phase, Phase::Spawning);
        assert_eq!(driver.turns, 1);
    }

    #[test]
    fn test_full_grid_stalls() {
        let mut driver = create_test_driver();
        let mut grid = Grid::new(1, 1).expect("valid dimensions");
        let placed = grid.add_tile(0, 0, 2).expect("valid tile");
        assert!(placed);
        let mut rng = StdRng::seed_from_u64(2);

        driver.advance(&mut grid, &mut rng, InputMode::Random);
        assert!(driver.is_stalled());

        driver.advance(&mut grid, &mut rng, InputMode::Random);
        assert!(driver.is_stalled());
        assert_eq!(grid.len(), 1);

        driver.reset();
        assert_eq!(driver.phase, Phase::Spawning);
        assert_eq!(driver.turns, 0);
    }

    #[test]
    fn test_idle_frames_only_count_in_random_mode() {
        let mut driver = create_test_driver();
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        let mut rng = StdRng::seed_from_u64(8);
        driver.phase = Phase::Choosing;

        driver.advance(&mut grid, &mut rng, InputMode::Keys);
        assert_eq!(driver.idle_frames, 0);

        driver.advance(&mut grid, &mut rng, InputMode::Random);
        assert_eq!(driver.idle_frames, 1);
        assert!(driver.queue(Direction::Up));
        assert_eq!(driver.idle_frames, 0);
    }

    #[test]
    fn test_update_respects_frame_delay() {
        let mut driver = Driver::new(Duration::from_secs(3600));
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        let mut rng = StdRng::seed_from_u64(4);

        driver.update(&mut grid, &mut rng, InputMode::Random);

        assert_eq!(driver.phase, Phase::Spawning);
        assert!(grid.is_empty());
    }
}
