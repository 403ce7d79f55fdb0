//! Property tests for addressing, adjacency and cascade invariants.
//!
//! Run more cases with: PROPTEST_CASES=10000 cargo test --release grid_props

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use minertui::{Color, Engine, EngineConfig, Grid, GridError, Notification, Recorder};

/// Longest run of one colour per line, over rows or over columns.
fn longest_run(lines: &[minertui::Line]) -> usize {
    let mut best = 0;
    for line in lines {
        let mut run = 0;
        let mut last = Color::None;
        for token in line {
            if token.is_colored() && token.color() == last {
                run += 1;
            } else {
                run = 1;
                last = token.color();
            }
            best = best.max(run);
        }
    }
    best
}

/// Step until ready, bounded so a broken cascade fails instead of hanging.
fn settle_bounded(engine: &mut Engine<Recorder>) -> bool {
    for _ in 0..100_000 {
        if engine.ready() {
            return true;
        }
        engine.step();
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Adjacency is symmetric and means Manhattan distance one.
    #[test]
    fn can_swap_is_orthogonal_adjacency(c1 in 0usize..12, r1 in 0usize..12, c2 in 0usize..12, r2 in 0usize..12) {
        let engine = Engine::with_config(Grid::square(2).unwrap(), Recorder::new(), EngineConfig::with_seed(0)).unwrap();
        let expected = c1.abs_diff(c2) + r1.abs_diff(r2) == 1;
        prop_assert_eq!(engine.can_swap(c1, r1, c2, r2), expected);
        prop_assert_eq!(engine.can_swap(c2, r2, c1, r1), expected);
    }

    /// Cells inside the board resolve; outside ones report the offending axis, row first.
    #[test]
    fn addressing_matches_bounds(columns in 1usize..10, rows in 1usize..10, c in 0usize..12, r in 0usize..12) {
        let grid = Grid::new(columns, rows).unwrap();
        match grid.get(c, r) {
            Ok(token) => {
                prop_assert!(c < columns && r < rows);
                prop_assert_eq!((token.column(), token.row()), (c, r));
            }
            Err(GridError::InvalidRow { row, rows: n }) => {
                prop_assert!(r >= rows);
                prop_assert_eq!((row, n), (r, rows));
            }
            Err(GridError::InvalidColumn { column, columns: n }) => {
                prop_assert!(r < rows && c >= columns);
                prop_assert_eq!((column, n), (c, columns));
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Any seeded board settles into a full board without streaks, with every
    /// refilled cell announced once.
    #[test]
    fn settle_leaves_no_streaks(
        seed in any::<u64>(),
        columns in 2usize..=9,
        rows in 2usize..=9,
        row_min in 3usize..=4,
        col_min in 3usize..=4,
    ) {
        let config = EngineConfig { row_streak_min: row_min, col_streak_min: col_min, seed: Some(seed) };
        let mut engine = Engine::with_config(Grid::new(columns, rows).unwrap(), Recorder::new(), config).unwrap();
        prop_assert!(settle_bounded(&mut engine));

        let grid = engine.grid();
        prop_assert!(grid.iter().all(|t| t.is_colored()));
        prop_assert!(longest_run(&grid.extract_rows(0, 0).unwrap()) < row_min);
        prop_assert!(longest_run(&grid.extract_columns(0, 0).unwrap()) < col_min);

        let log = engine.listener().notifications();
        let refilled: usize = engine.listener().insertions().map(|e| e.size()).sum();
        let announced = log.iter().filter(|n| matches!(n, Notification::New { .. })).count();
        prop_assert_eq!(refilled, announced);
        prop_assert_eq!(log.last(), Some(&Notification::Ready));
    }

    /// A random adjacent swap either sticks with a cascade or is undone;
    /// the engine comes back ready with consistent coordinates either way.
    #[test]
    fn swap_then_settle_keeps_board_consistent(
        seed in any::<u64>(),
        size in 3usize..=8,
        c in 0usize..8,
        r in 0usize..8,
        vertical in any::<bool>(),
    ) {
        let mut engine =
            Engine::with_config(Grid::square(size).unwrap(), Recorder::new(), EngineConfig::with_seed(seed)).unwrap();
        prop_assert!(settle_bounded(&mut engine));
        engine.listener_mut().clear();

        let (c1, r1) = (c % (size - 1), r % (size - 1));
        let (c2, r2) = if vertical { (c1, r1 + 1) } else { (c1 + 1, r1) };
        let before = engine.grid().colors();
        prop_assert_eq!(engine.swap(c1, r1, c2, r2), Ok(true));
        prop_assert!(settle_bounded(&mut engine));

        let failed = engine
            .listener()
            .notifications()
            .iter()
            .any(|n| matches!(n, Notification::SwapFailed { .. }));
        if failed {
            prop_assert_eq!(engine.grid().colors(), before);
        } else {
            prop_assert!(engine.listener().deletions().count() > 0);
        }
        let grid = engine.grid();
        for row in 0..size {
            for col in 0..size {
                let t = grid.get(col, row).unwrap();
                prop_assert_eq!((t.column(), t.row()), (col, row));
            }
        }
    }
}
