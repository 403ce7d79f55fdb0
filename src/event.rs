//! Change events: one deletion or insertion over a run of a row or column.

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Deletion,
    Insertion,
}

/// Kind of line an event applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Row,
    Column,
}

/// Immutable record of a change. `tokens` is a copy taken when the event was
/// created; the grid keeps changing afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    kind: EventKind,
    target: Target,
    line: usize,
    start: usize,
    tokens: Box<[Token]>,
}

impl ChangeEvent {
    pub fn new(kind: EventKind, target: Target, line: usize, start: usize, tokens: &[Token]) -> Self {
        Self {
            kind,
            target,
            line,
            start,
            tokens: tokens.into(),
        }
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Row or column number.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// One past the last affected index within the line.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Grid `(column, row)` of every affected cell, in line order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.start..self.end()).map(move |pos| match self.target {
            Target::Row => (pos, self.line),
            Target::Column => (self.line, pos),
        })
    }
}
