//! Statistics for a binding session

/// Counters for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BindStats {
    /// Data rows pulled from the source (header excluded)
    pub rows_read: usize,

    /// Rows vetoed by the row filter
    pub rows_filtered: usize,

    /// Records successfully bound
    pub records_bound: usize,
}

impl BindStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows that reached conversion
    pub fn rows_attempted(&self) -> usize {
        self.rows_read - self.rows_filtered
    }
}
