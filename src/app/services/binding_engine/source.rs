//! Row source and row filter collaborators

use crate::Result;

/// Single-pass producer of rows
pub trait RowSource {
    /// Next row of cells, or `None` at end of input
    fn next_row(&mut self) -> Result<Option<Vec<String>>>;
}

/// Predicate deciding whether a row is converted
pub trait RowFilter {
    /// `true` converts the row, `false` skips it silently
    fn allow_row(&self, row: &[String]) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&[String]) -> bool,
{
    fn allow_row(&self, row: &[String]) -> bool {
        self(row)
    }
}

/// Row source over any iterator of rows
#[derive(Debug, Clone)]
pub struct IterRowSource<I> {
    rows: I,
}

impl<I> RowSource for IterRowSource<I>
where
    I: Iterator<Item = Vec<String>>,
{
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        Ok(self.rows.next())
    }
}

/// Wrap in-memory rows as a row source
pub fn rows_from<T>(rows: T) -> IterRowSource<T::IntoIter>
where
    T: IntoIterator<Item = Vec<String>>,
{
    IterRowSource {
        rows: rows.into_iter(),
    }
}
