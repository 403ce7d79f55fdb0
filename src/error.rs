//! Error types for the grid and the rule engine.

use thiserror::Error;

/// Which kind of line a streak minimum applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Grid construction and addressing failures. Always a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// A range is empty, reversed, runs past the edge, or a view is too short for it.
    #[error("invalid addressing")]
    InvalidAddressing,
    #[error("invalid row {row} (grid has {rows} rows)")]
    InvalidRow { row: usize, rows: usize },
    #[error("invalid column {column} (grid has {columns} columns)")]
    InvalidColumn { column: usize, columns: usize },
    #[error("invalid grid size {columns}x{rows}")]
    InvalidSize { columns: usize, rows: usize },
}

impl GridError {
    /// True for every addressing failure, including the row/column specializations.
    pub fn is_addressing(&self) -> bool {
        !matches!(self, Self::InvalidSize { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{axis} streak minimum must be at least 2, got {min}")]
    StreakTooShort { axis: Axis, min: usize },
}
