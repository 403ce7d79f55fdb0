//! Rule engine: a finite state machine over the grid.
//!
//! The engine validates and applies swaps, scans rows and columns for streaks,
//! destroys them, lets the remaining tokens fall and refills the holes, until
//! the board is stable again. Nothing advances unless the driver calls
//! [`Engine::step`], so a presentation layer can wait for its animations
//! between steps. Every change is reported through the [`Listener`].

use crate::error::{Axis, ConfigError, GridError};
use crate::event::{ChangeEvent, EventKind, Target};
use crate::grid::Grid;
use crate::line::Line;
use crate::listener::Listener;
use crate::token::Color;
use log::{debug, trace, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Streak length used when nothing else is configured.
pub const DEFAULT_STREAK_MIN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No matches pending; waiting for a swap.
    AwaitingInput,
    /// A swap has been performed.
    Swapped,
    /// Matches were found and set to `Color::None`.
    Destroyed,
    /// New tokens were introduced; the board needs a scan.
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub row_streak_min: usize,
    pub col_streak_min: usize,
    /// Fixed RNG seed for reproducible boards; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            row_streak_min: DEFAULT_STREAK_MIN,
            col_streak_min: DEFAULT_STREAK_MIN,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// A minimum below 2 would turn every lone token into a match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_streak_min < 2 {
            return Err(ConfigError::StreakTooShort { axis: Axis::Row, min: self.row_streak_min });
        }
        if self.col_streak_min < 2 {
            return Err(ConfigError::StreakTooShort { axis: Axis::Column, min: self.col_streak_min });
        }
        Ok(())
    }
}

/// Coordinates of the last swap, kept to report it and to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SwapMemo {
    col1: usize,
    row1: usize,
    col2: usize,
    row2: usize,
}

#[derive(Debug)]
pub struct Engine<L: Listener> {
    grid: Grid,
    deletions: VecDeque<ChangeEvent>,
    listener: L,
    row_streak_min: usize,
    col_streak_min: usize,
    state: State,
    last_swap: SwapMemo,
    rng: SmallRng,
}

impl<L: Listener> Engine<L> {
    /// Engine with default streak minimums (3 and 3). Populates the grid.
    pub fn new(grid: Grid, listener: L) -> Self {
        Self::build(grid, listener, EngineConfig::default())
    }

    pub fn with_config(grid: Grid, listener: L, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(grid, listener, config))
    }

    fn build(grid: Grid, listener: L, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut engine = Self {
            grid,
            deletions: VecDeque::new(),
            listener,
            row_streak_min: config.row_streak_min,
            col_streak_min: config.col_streak_min,
            state: State::Dirty,
            last_swap: SwapMemo::default(),
            rng,
        };
        engine.populate();
        engine
    }

    /// Fill every cell with a random colour (new game). The board may hold
    /// matches afterwards; the engine is left `Dirty` so the next steps clear them.
    pub fn populate(&mut self) {
        let columns = self.grid.columns();
        let (mut col, mut row) = (0, 0);
        for token in self.grid.iter_mut() {
            token.set_random_color(&mut self.rng);
            token.set_coordinates(col, row);
            col += 1;
            if col >= columns {
                col = 0;
                row += 1;
            }
        }
        self.deletions.clear();
        self.state = State::Dirty;
        debug!("populated {}x{} grid", self.grid.columns(), self.grid.rows());
    }

    /// Orthogonal neighbours only: one delta is exactly 1, the other 0.
    pub fn can_swap(&self, col1: usize, row1: usize, col2: usize, row2: usize) -> bool {
        if col1 == col2 {
            row1.abs_diff(row2) == 1
        } else if row1 == row2 {
            col1.abs_diff(col2) == 1
        } else {
            false
        }
    }

    /// Swap two neighbours. `Ok(false)` if they are not adjacent or the engine
    /// is not [`ready`](Engine::ready); nothing changes then.
    pub fn swap(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) -> Result<bool, GridError> {
        if !self.can_swap(col1, row1, col2, row2) {
            return Ok(false);
        }
        if !self.ready() {
            warn!("swap ({col1},{row1})<->({col2},{row2}) rejected in state {:?}", self.state);
            return Ok(false);
        }
        self.grid.get(col1, row1)?;
        self.grid.get(col2, row2)?;
        self.exchange(col1, row1, col2, row2);
        self.state = State::Swapped;
        self.listener.swapped(col1, row1, col2, row2);
        self.last_swap = SwapMemo { col1, row1, col2, row2 };
        debug!("swapped ({col1},{row1})<->({col2},{row2})");
        Ok(true)
    }

    /// True when the board is stable and a swap may be performed.
    pub fn ready(&self) -> bool {
        self.state == State::AwaitingInput
    }

    /// Advance the state machine by one transition. Returns the number of
    /// matches found by this call.
    pub fn step(&mut self) -> usize {
        match self.state {
            State::Swapped | State::Dirty => self.step_dirty(),
            State::Destroyed => {
                self.compact();
                self.transition(State::Dirty);
                0
            }
            State::AwaitingInput => 0,
        }
    }

    /// Step until the engine is ready again. Returns the total matches found.
    pub fn settle(&mut self) -> usize {
        let mut total = 0;
        while !self.ready() {
            total += self.step();
        }
        total
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for loading fixed positions. Do not use mid-cascade:
    /// queued deletions refer to the board as it was scanned.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Read the grid while updating the listener.
    pub fn split(&mut self) -> (&Grid, &mut L) {
        (&self.grid, &mut self.listener)
    }

    pub fn into_parts(self) -> (Grid, L) {
        (self.grid, self.listener)
    }

    fn transition(&mut self, next: State) {
        debug!("state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Exchange two in-bounds cells and keep their coordinate fields in place.
    fn exchange(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        let first = self.grid[(col1, row1)];
        self.grid[(col1, row1)] = self.grid[(col2, row2)];
        self.grid[(col2, row2)] = first;
        self.grid[(col1, row1)].set_coordinates(col1, row1);
        self.grid[(col2, row2)].set_coordinates(col2, row2);
    }

    fn step_dirty(&mut self) -> usize {
        let matches = self.scan_grid();
        let swap = self.last_swap;

        if matches > 0 {
            self.destroy_matches();
            if self.state == State::Swapped {
                self.listener.swap_ok(swap.col1, swap.row1, swap.col2, swap.row2);
            }
            self.transition(State::Destroyed);
        } else {
            if self.state == State::Swapped {
                self.swap_failed();
            }
            self.transition(State::AwaitingInput);
            self.listener.ready();
        }
        matches
    }

    /// Undo the remembered swap; it produced no match.
    fn swap_failed(&mut self) {
        let SwapMemo { col1, row1, col2, row2 } = self.last_swap;
        // bounds were checked by `swap`
        self.exchange(col1, row1, col2, row2);
        self.listener.swap_failed(col1, row1, col2, row2);
    }

    /// Blank every run recorded by the scan, then report how many there were.
    fn destroy_matches(&mut self) {
        for deletion in &self.deletions {
            for cell in deletion.cells() {
                self.grid[cell].set_color(Color::None);
            }
        }
        self.listener.destroyed(self.deletions.len());
        self.deletions.clear();
    }

    /// Rows first, then columns. Queues a deletion per streak; returns their number.
    fn scan_grid(&mut self) -> usize {
        let rows: Vec<Line> = (0..self.grid.rows()).map(|r| self.grid.row_line(r)).collect();
        let columns: Vec<Line> = (0..self.grid.columns()).map(|c| self.grid.column_line(c)).collect();
        let row_matches = self.scan_lines(Target::Row, &rows);
        let col_matches = self.scan_lines(Target::Column, &columns);
        row_matches + col_matches
    }

    fn scan_lines(&mut self, target: Target, lines: &[Line]) -> usize {
        let min_streak = match target {
            Target::Row => self.row_streak_min,
            Target::Column => self.col_streak_min,
        };
        let mut matches = 0;

        for line in lines {
            let mut i = 0;
            let mut streak = 1;
            let mut last = Color::None;

            for token in line {
                if token.color() == last {
                    if token.is_colored() {
                        streak += 1;
                    }
                } else {
                    if streak >= min_streak {
                        matches += 1;
                        self.add_event(EventKind::Deletion, target, line, i - streak, streak);
                    }
                    streak = 1;
                    last = token.color();
                }
                i += 1;
            }

            // streak running into the edge of the line
            if streak >= min_streak {
                matches += 1;
                self.add_event(EventKind::Deletion, target, line, i - streak, streak);
            }
        }
        matches
    }

    /// Record a change over `line[start..start + len]` and notify the listener.
    /// Only deletions are queued; insertions have already been applied.
    fn add_event(&mut self, kind: EventKind, target: Target, line: &Line, start: usize, len: usize) {
        let event = ChangeEvent::new(kind, target, line.num(), start, &line[start..start + len]);
        trace!("{:?} {:?} {} [{}..{})", kind, target, event.line(), event.start(), event.end());

        match kind {
            EventKind::Deletion => {
                self.listener.deletion(&event);
                for pos in start..start + len {
                    self.listener.delete(target, line.num(), pos);
                }
                self.deletions.push_back(event);
            }
            EventKind::Insertion => self.listener.insertion(&event),
        }
    }

    /// Gravity and refill, column by column.
    fn compact(&mut self) {
        for c in 0..self.grid.columns() {
            let mut column = self.grid.column_line(c);
            let num = column.num();

            // bubble the gaps up...
            let mut gaps = 0;
            for pos in (0..column.len()).rev() {
                if column[pos].is_none() {
                    gaps += 1;
                } else if gaps > 0 {
                    let color = column[pos].color();
                    column[pos + gaps].set_color(color);
                    column[pos + gaps].set_coordinates(num, pos + gaps);
                    column[pos].set_color(Color::None);
                    self.listener.fall(num, pos, gaps);
                }
            }

            // ...and fill them in from the top
            for row in 0..gaps {
                let token = &mut column[row];
                token.set_coordinates(num, row);
                token.set_random_color(&mut self.rng);
                self.listener.new(num, row, token.color(), gaps);
            }

            if gaps > 0 {
                self.grid.write_column_line(&column);
                self.add_event(EventKind::Insertion, Target::Column, &column, 0, gaps);
            }
        }
        self.listener.cycle_finished();
    }
}
