//! Line: a copied column or row of the grid that remembers which one it is.

use crate::token::Token;
use std::ops::{Deref, DerefMut};

/// Random-access copy of (part of) a column or row, tagged with its number.
/// Indexing is relative to the extracted range, not to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    num: usize,
    tokens: Vec<Token>,
}

impl Line {
    pub fn new(num: usize, tokens: Vec<Token>) -> Self {
        Self { num, tokens }
    }

    /// Column or row number this line was extracted from.
    #[inline]
    pub fn num(&self) -> usize {
        self.num
    }
}

impl Deref for Line {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl DerefMut for Line {
    fn deref_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }
}

impl<'a> IntoIterator for &'a Line {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Color;

    #[test]
    fn test_line_indexes_relative_to_range() {
        let mut line = Line::new(4, vec![Color::Red.into(), Color::Blue.into()]);
        assert_eq!(line.num(), 4);
        assert_eq!(line.len(), 2);
        line[1].set_color(Color::Green);
        assert_eq!(line[1].color(), Color::Green);
        let colors: Vec<Color> = (&line).into_iter().map(Token::color).collect();
        assert_eq!(colors, vec![Color::Red, Color::Green]);
    }
}
