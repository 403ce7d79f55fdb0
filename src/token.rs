//! Token: the per-cell value of the grid (colour + cached coordinates).

use rand::Rng;

/// Jewel colour. `None` marks an empty cell and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    None,
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
}

impl Color {
    /// Every matchable colour, in declaration order.
    pub const PLAYABLE: [Self; 5] = [Self::Blue, Self::Green, Self::Yellow, Self::Purple, Self::Red];

    /// Uniformly random non-`None` colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::PLAYABLE[rng.random_range(0..Self::PLAYABLE.len())]
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Index into [`Color::PLAYABLE`], `None` for the empty sentinel.
    pub fn index(self) -> Option<usize> {
        Self::PLAYABLE.iter().position(|&c| c == self)
    }
}

/// One grid cell. The coordinates are a cache kept current by the engine;
/// the grid itself never rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    color: Color,
    column: usize,
    row: usize,
}

impl Token {
    pub fn new(color: Color, column: usize, row: usize) -> Self {
        Self { color, column, row }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_random_color<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.color = Color::random(rng);
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn set_coordinates(&mut self, column: usize, row: usize) {
        self.column = column;
        self.row = row;
    }

    /// Empty cell.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.color.is_none()
    }

    #[inline]
    pub fn is_colored(&self) -> bool {
        !self.color.is_none()
    }
}

impl From<Color> for Token {
    fn from(color: Color) -> Self {
        Self::new(color, 0, 0)
    }
}
