//! Grid: dense columns x rows container of tokens, addressed by (column, row).
//! Storage is row-major; row 0 is the top of the board.

use crate::error::GridError;
use crate::line::Line;
use crate::token::{Color, Token};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Token>,
}

impl Grid {
    /// Empty (`Color::None`) grid. Refuses to build a useless 0-sized board.
    pub fn new(columns: usize, rows: usize) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidSize { columns, rows });
        }
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Token::new(Color::None, column, row));
            }
        }
        Ok(Self { columns, rows, cells })
    }

    pub fn square(size: usize) -> Result<Self, GridError> {
        Self::new(size, size)
    }

    /// Grid from colour rows (`rows[y][x]`), coordinates filled in. Rows must be equally long.
    pub fn from_rows(rows: &[Vec<Color>]) -> Result<Self, GridError> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(columns, rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(GridError::InvalidAddressing);
            }
            for (x, &color) in row.iter().enumerate() {
                grid.get_mut(x, y)?.set_color(color);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells (columns * rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Token> {
        self.cells.iter_mut()
    }

    /// Row-major colour snapshot.
    pub fn colors(&self) -> Vec<Color> {
        self.cells.iter().map(Token::color).collect()
    }

    fn offset(&self, column: usize, row: usize) -> Result<usize, GridError> {
        if row >= self.rows {
            return Err(GridError::InvalidRow { row, rows: self.rows });
        }
        if column >= self.columns {
            return Err(GridError::InvalidColumn { column, columns: self.columns });
        }
        Ok(self.columns * row + column)
    }

    pub fn get(&self, column: usize, row: usize) -> Result<&Token, GridError> {
        let i = self.offset(column, row)?;
        Ok(&self.cells[i])
    }

    pub fn get_mut(&mut self, column: usize, row: usize) -> Result<&mut Token, GridError> {
        let i = self.offset(column, row)?;
        Ok(&mut self.cells[i])
    }

    pub fn set(&mut self, column: usize, row: usize, token: Token) -> Result<(), GridError> {
        *self.get_mut(column, row)? = token;
        Ok(())
    }

    /// Exchange two cells by value. Coordinate fields travel with the tokens;
    /// callers that care must reset them.
    pub fn swap(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) -> Result<(), GridError> {
        let a = self.offset(col1, row1)?;
        let b = self.offset(col2, row2)?;
        self.cells.swap(a, b);
        Ok(())
    }

    /// Resolve `end == 0` to `bounds` and validate `[start, end)`.
    fn check_range(start: usize, end: usize, bounds: usize) -> Result<(usize, usize), GridError> {
        let end = if end == 0 { bounds } else { end };
        if end > bounds || end <= start {
            return Err(GridError::InvalidAddressing);
        }
        Ok((start, end))
    }

    fn check_column(&self, column: usize) -> Result<(), GridError> {
        if column >= self.columns {
            return Err(GridError::InvalidColumn { column, columns: self.columns });
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<(), GridError> {
        if row >= self.rows {
            return Err(GridError::InvalidRow { row, rows: self.rows });
        }
        Ok(())
    }

    /// Copy rows `[start, end)` of a column. `end == 0` means to the bottom edge.
    pub fn extract_column(&self, column: usize, start: usize, end: usize) -> Result<Line, GridError> {
        self.check_column(column)?;
        let (start, end) = Self::check_range(start, end, self.rows)?;
        let tokens = (start..end).map(|row| self.cells[self.columns * row + column]).collect();
        Ok(Line::new(column, tokens))
    }

    /// Copy columns `[start, end)` of a row. `end == 0` means to the right edge.
    pub fn extract_row(&self, row: usize, start: usize, end: usize) -> Result<Line, GridError> {
        self.check_row(row)?;
        let (start, end) = Self::check_range(start, end, self.columns)?;
        let base = self.columns * row;
        Ok(Line::new(row, self.cells[base + start..base + end].to_vec()))
    }

    /// Whole column `column`; the index must be in bounds.
    pub(crate) fn column_line(&self, column: usize) -> Line {
        let tokens = (0..self.rows).map(|row| self[(column, row)]).collect();
        Line::new(column, tokens)
    }

    /// Whole row `row`; the index must be in bounds.
    pub(crate) fn row_line(&self, row: usize) -> Line {
        let base = self.columns * row;
        Line::new(row, self.cells[base..base + self.columns].to_vec())
    }

    /// Write back a whole column taken with `column_line`.
    pub(crate) fn write_column_line(&mut self, line: &Line) {
        for (row, token) in line.iter().enumerate() {
            self[(line.num(), row)] = *token;
        }
    }

    /// Columns `[start, end)`, each extracted whole.
    pub fn extract_columns(&self, start: usize, end: usize) -> Result<Vec<Line>, GridError> {
        let (start, end) = Self::check_range(start, end, self.columns)?;
        (start..end).map(|c| self.extract_column(c, 0, 0)).collect()
    }

    /// Rows `[start, end)`, each extracted whole.
    pub fn extract_rows(&self, start: usize, end: usize) -> Result<Vec<Line>, GridError> {
        let (start, end) = Self::check_range(start, end, self.rows)?;
        (start..end).map(|r| self.extract_row(r, 0, 0)).collect()
    }

    /// Write `line[0..end-start]` into rows `[start, end)` of column `line.num()`.
    pub fn replace_column(&mut self, line: &Line, start: usize, end: usize) -> Result<(), GridError> {
        let column = line.num();
        self.check_column(column)?;
        let (start, end) = Self::check_range(start, end, self.rows)?;
        if line.len() < end - start {
            return Err(GridError::InvalidAddressing);
        }
        for (n, row) in (start..end).enumerate() {
            self.cells[self.columns * row + column] = line[n];
        }
        Ok(())
    }

    /// Write `line[0..end-start]` into columns `[start, end)` of row `line.num()`.
    pub fn replace_row(&mut self, line: &Line, start: usize, end: usize) -> Result<(), GridError> {
        let row = line.num();
        self.check_row(row)?;
        let (start, end) = Self::check_range(start, end, self.columns)?;
        if line.len() < end - start {
            return Err(GridError::InvalidAddressing);
        }
        let base = self.columns * row;
        self.cells[base + start..base + end].copy_from_slice(&line[..end - start]);
        Ok(())
    }

    /// Visit rows `[start, end)` of a column with `(column, row, token)`.
    pub fn each_in_column<F>(&mut self, column: usize, start: usize, end: usize, mut f: F) -> Result<(), GridError>
    where
        F: FnMut(usize, usize, &mut Token),
    {
        self.check_column(column)?;
        let (start, end) = Self::check_range(start, end, self.rows)?;
        for row in start..end {
            let i = self.columns * row + column;
            f(column, row, &mut self.cells[i]);
        }
        Ok(())
    }

    /// Visit columns `[start, end)` of a row with `(column, row, token)`.
    pub fn each_in_row<F>(&mut self, row: usize, start: usize, end: usize, mut f: F) -> Result<(), GridError>
    where
        F: FnMut(usize, usize, &mut Token),
    {
        self.check_row(row)?;
        let (start, end) = Self::check_range(start, end, self.columns)?;
        for column in start..end {
            let i = self.columns * row + column;
            f(column, row, &mut self.cells[i]);
        }
        Ok(())
    }

    pub fn fill_column(&mut self, column: usize, value: Token, start: usize, end: usize) -> Result<(), GridError> {
        self.each_in_column(column, start, end, |_, _, t| *t = value)
    }

    pub fn fill_row(&mut self, row: usize, value: Token, start: usize, end: usize) -> Result<(), GridError> {
        self.each_in_row(row, start, end, |_, _, t| *t = value)
    }
}

/// Unchecked `(column, row)` access. Panics outside the board.
impl Index<(usize, usize)> for Grid {
    type Output = Token;

    fn index(&self, (column, row): (usize, usize)) -> &Token {
        assert!(column < self.columns && row < self.rows, "cell ({column},{row}) outside the board");
        &self.cells[self.columns * row + column]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (column, row): (usize, usize)) -> &mut Token {
        assert!(column < self.columns && row < self.rows, "cell ({column},{row}) outside the board");
        &mut self.cells[self.columns * row + column]
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::{Blue, Green, Red, Yellow};

    #[test]
    fn test_zero_sized_grid_is_rejected() {
        assert_eq!(Grid::new(0, 4), Err(GridError::InvalidSize { columns: 0, rows: 4 }));
        assert_eq!(Grid::new(4, 0), Err(GridError::InvalidSize { columns: 4, rows: 0 }));
        assert!(Grid::square(1).is_ok());
    }

    #[test]
    fn test_out_of_range_distinguishes_row_and_column() {
        let g = Grid::new(3, 2).unwrap();
        assert_eq!(g.get(0, 2), Err(GridError::InvalidRow { row: 2, rows: 2 }));
        assert_eq!(g.get(3, 0), Err(GridError::InvalidColumn { column: 3, columns: 3 }));
        // row is checked first
        assert!(matches!(g.get(9, 9), Err(GridError::InvalidRow { .. })));
        assert!(g.get(9, 9).unwrap_err().is_addressing());
        assert!(!GridError::InvalidSize { columns: 0, rows: 0 }.is_addressing());
    }

    #[test]
    fn test_set_writes_one_cell_and_checks_bounds() {
        let mut g = Grid::new(3, 2).unwrap();
        g.set(2, 1, Token::new(Yellow, 2, 1)).unwrap();
        assert_eq!(g.get(2, 1).unwrap().color(), Yellow);
        assert_eq!(g.colors().iter().filter(|c| c.is_none()).count(), 5);
        assert_eq!(g.set(3, 0, Red.into()), Err(GridError::InvalidColumn { column: 3, columns: 3 }));
        assert_eq!(g.set(0, 2, Red.into()), Err(GridError::InvalidRow { row: 2, rows: 2 }));
        assert_eq!(g.colors().iter().filter(|c| c.is_none()).count(), 5);
    }

    #[test]
    fn test_whole_column_write_back() {
        let mut g = Grid::from_rows(&[vec![Red, Blue], vec![Green, Yellow]]).unwrap();
        let mut column = g.column_line(1);
        assert_eq!(column.num(), 1);
        column[0].set_color(Green);
        g.write_column_line(&column);
        assert_eq!(g.colors(), vec![Red, Green, Green, Yellow]);
        assert_eq!(g.row_line(1).iter().map(|t| t.color()).collect::<Vec<_>>(), vec![Green, Yellow]);
        assert_eq!(g[(1, 0)].color(), Green);
    }

    #[test]
    #[should_panic(expected = "outside the board")]
    fn test_index_outside_board_panics() {
        let g = Grid::new(3, 2).unwrap();
        let _ = g[(3, 0)];
    }

    #[test]
    fn test_new_grid_has_consistent_coordinates() {
        let g = Grid::new(4, 3).unwrap();
        assert_eq!(g.len(), 12);
        for row in 0..3 {
            for col in 0..4 {
                let t = g.get(col, row).unwrap();
                assert_eq!((t.column(), t.row()), (col, row));
                assert!(t.is_none());
            }
        }
    }

    #[test]
    fn test_swap_exchanges_values_only() {
        let mut g = Grid::from_rows(&[vec![Red, Blue]]).unwrap();
        g.swap(0, 0, 1, 0).unwrap();
        let a = g.get(0, 0).unwrap();
        assert_eq!(a.color(), Blue);
        // coordinates moved with the token
        assert_eq!(a.column(), 1);
        assert!(g.swap(0, 0, 2, 0).is_err());
        assert_eq!(g.get(0, 0).unwrap().color(), Blue);
    }

    #[test]
    fn test_extract_column_and_row_ranges() {
        let g = Grid::from_rows(&[
            vec![Red, Blue, Green],
            vec![Yellow, Red, Blue],
            vec![Green, Green, Red],
        ])
        .unwrap();
        let col = g.extract_column(1, 0, 0).unwrap();
        assert_eq!(col.num(), 1);
        assert_eq!(col.iter().map(Token::color).collect::<Vec<_>>(), vec![Blue, Red, Green]);

        let row = g.extract_row(2, 1, 3).unwrap();
        assert_eq!(row.num(), 2);
        assert_eq!(row.iter().map(Token::color).collect::<Vec<_>>(), vec![Green, Red]);

        assert_eq!(g.extract_row(0, 2, 2), Err(GridError::InvalidAddressing));
        assert_eq!(g.extract_row(0, 0, 4), Err(GridError::InvalidAddressing));
        assert!(matches!(g.extract_column(3, 0, 0), Err(GridError::InvalidColumn { .. })));
        assert_eq!(g.extract_columns(0, 0).unwrap().len(), 3);
        assert_eq!(g.extract_rows(1, 0).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_column_round_trip_after_edit() {
        let mut g = Grid::from_rows(&[vec![Red], vec![Blue], vec![Green]]).unwrap();
        let mut col = g.extract_column(0, 0, 0).unwrap();
        col[0].set_color(Yellow);
        g.replace_column(&col, 0, 0).unwrap();
        assert_eq!(g.colors(), vec![Yellow, Blue, Green]);

        let short = Line::new(0, vec![Red.into()]);
        assert_eq!(g.replace_column(&short, 0, 0), Err(GridError::InvalidAddressing));
        g.replace_column(&short, 2, 3).unwrap();
        assert_eq!(g.colors(), vec![Yellow, Blue, Red]);
    }

    #[test]
    fn test_replace_row_partial() {
        let mut g = Grid::new(4, 1).unwrap();
        let line = Line::new(0, vec![Red.into(), Blue.into()]);
        g.replace_row(&line, 1, 3).unwrap();
        assert_eq!(g.colors(), vec![Color::None, Red, Blue, Color::None]);
    }

    #[test]
    fn test_each_and_fill_helpers() {
        let mut g = Grid::new(3, 3).unwrap();
        g.fill_row(1, Token::from(Red), 0, 0).unwrap();
        g.fill_column(2, Token::from(Blue), 0, 2).unwrap();
        let mut visited = Vec::new();
        g.each_in_column(2, 0, 0, |c, r, t| visited.push((c, r, t.color()))).unwrap();
        assert_eq!(visited, vec![(2, 0, Blue), (2, 1, Blue), (2, 2, Color::None)]);
        let mut count = 0;
        g.each_in_row(1, 0, 0, |_, _, t| {
            if t.color() == Red {
                count += 1;
            }
        })
        .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let res = Grid::from_rows(&[vec![Red, Blue], vec![Red]]);
        assert_eq!(res, Err(GridError::InvalidAddressing));
        assert!(matches!(Grid::from_rows(&[]), Err(GridError::InvalidSize { .. })));
    }
}
