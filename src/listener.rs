//! Observer interface the engine reports every transition through.
//!
//! Callbacks run synchronously inside [`Engine::step`](crate::Engine::step) and
//! [`Engine::swap`](crate::Engine::swap). During `fall` and `new` the committed
//! grid may still lag behind the notification: the column is written back after.

use crate::event::{ChangeEvent, Target};
use crate::token::Color;

/// Presentation-side observer. Every method defaults to doing nothing.
///
/// Order within one engine cycle: `swapped`, then on the next step either
/// `deletion`/`delete` for each run, `destroyed` and `swap_ok`, or `swap_failed`
/// and `ready`. The step after a destruction reports `fall`, `new`, `insertion`
/// per column and a final `cycle_finished`.
pub trait Listener {
    fn swapped(&mut self, _col1: usize, _row1: usize, _col2: usize, _row2: usize) {}
    fn swap_ok(&mut self, _col1: usize, _row1: usize, _col2: usize, _row2: usize) {}
    fn swap_failed(&mut self, _col1: usize, _row1: usize, _col2: usize, _row2: usize) {}
    /// The board is stable and accepts a new swap.
    fn ready(&mut self) {}
    /// Number of deletion events applied.
    fn destroyed(&mut self, _matches: usize) {}
    fn deletion(&mut self, _event: &ChangeEvent) {}
    fn insertion(&mut self, _event: &ChangeEvent) {}
    fn cycle_finished(&mut self) {}
    /// Token at `(column, row)` drops by `gaps` rows.
    fn fall(&mut self, _column: usize, _row: usize, _gaps: usize) {}
    /// Fresh token at `(column, row)`; `total_gaps` new tokens enter this column.
    fn new(&mut self, _column: usize, _row: usize, _color: Color, _total_gaps: usize) {}
    /// One cell of a deletion run: `pos` is its index within line `line`.
    fn delete(&mut self, _target: Target, _line: usize, _pos: usize) {}
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn swapped(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        (**self).swapped(col1, row1, col2, row2);
    }
    fn swap_ok(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        (**self).swap_ok(col1, row1, col2, row2);
    }
    fn swap_failed(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        (**self).swap_failed(col1, row1, col2, row2);
    }
    fn ready(&mut self) {
        (**self).ready();
    }
    fn destroyed(&mut self, matches: usize) {
        (**self).destroyed(matches);
    }
    fn deletion(&mut self, event: &ChangeEvent) {
        (**self).deletion(event);
    }
    fn insertion(&mut self, event: &ChangeEvent) {
        (**self).insertion(event);
    }
    fn cycle_finished(&mut self) {
        (**self).cycle_finished();
    }
    fn fall(&mut self, column: usize, row: usize, gaps: usize) {
        (**self).fall(column, row, gaps);
    }
    fn new(&mut self, column: usize, row: usize, color: Color, total_gaps: usize) {
        (**self).new(column, row, color, total_gaps);
    }
    fn delete(&mut self, target: Target, line: usize, pos: usize) {
        (**self).delete(target, line, pos);
    }
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Listener for Silent {}

/// One listener call as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Swapped { col1: usize, row1: usize, col2: usize, row2: usize },
    SwapOk { col1: usize, row1: usize, col2: usize, row2: usize },
    SwapFailed { col1: usize, row1: usize, col2: usize, row2: usize },
    Ready,
    Destroyed(usize),
    Deletion(ChangeEvent),
    Insertion(ChangeEvent),
    CycleFinished,
    Fall { column: usize, row: usize, gaps: usize },
    New { column: usize, row: usize, color: Color, total_gaps: usize },
    Delete { target: Target, line: usize, pos: usize },
}

/// Listener that records every call in order, for replay and assertions.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Vec<Notification>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.log
    }

    /// Hand over everything recorded so far and start afresh.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.log)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Deletion events recorded so far, in order.
    pub fn deletions(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.log.iter().filter_map(|n| match n {
            Notification::Deletion(ev) => Some(ev),
            _ => None,
        })
    }

    pub fn insertions(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.log.iter().filter_map(|n| match n {
            Notification::Insertion(ev) => Some(ev),
            _ => None,
        })
    }
}

impl Listener for Recorder {
    fn swapped(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.log.push(Notification::Swapped { col1, row1, col2, row2 });
    }
    fn swap_ok(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.log.push(Notification::SwapOk { col1, row1, col2, row2 });
    }
    fn swap_failed(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.log.push(Notification::SwapFailed { col1, row1, col2, row2 });
    }
    fn ready(&mut self) {
        self.log.push(Notification::Ready);
    }
    fn destroyed(&mut self, matches: usize) {
        self.log.push(Notification::Destroyed(matches));
    }
    fn deletion(&mut self, event: &ChangeEvent) {
        self.log.push(Notification::Deletion(event.clone()));
    }
    fn insertion(&mut self, event: &ChangeEvent) {
        self.log.push(Notification::Insertion(event.clone()));
    }
    fn cycle_finished(&mut self) {
        self.log.push(Notification::CycleFinished);
    }
    fn fall(&mut self, column: usize, row: usize, gaps: usize) {
        self.log.push(Notification::Fall { column, row, gaps });
    }
    fn new(&mut self, column: usize, row: usize, color: Color, total_gaps: usize) {
        self.log.push(Notification::New { column, row, color, total_gaps });
    }
    fn delete(&mut self, target: Target, line: usize, pos: usize) {
        self.log.push(Notification::Delete { target, line, pos });
    }
}
