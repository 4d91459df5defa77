//! Column tables for reading and writing

use crate::app::models::normalize_header;

/// Column-to-descriptor table built once per session at header capture
#[derive(Debug, Clone, Default)]
pub struct ColumnBindings {
    /// Captured header, when the source has one
    header: Option<Vec<String>>,

    /// Descriptor index for each column, `None` when unmapped
    columns: Vec<Option<usize>>,
}

impl ColumnBindings {
    pub fn new(header: Option<Vec<String>>, columns: Vec<Option<usize>>) -> Self {
        Self { header, columns }
    }

    /// Descriptor index responsible for a column
    pub fn descriptor_index(&self, column: usize) -> Option<usize> {
        self.columns.get(column).copied().flatten()
    }

    /// Header text of a column as it appeared in the input
    pub fn header_name(&self, column: usize) -> Option<&str> {
        self.header
            .as_ref()
            .and_then(|header| header.get(column))
            .map(String::as_str)
    }

    /// 0-based column of a header name, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.header
            .as_ref()?
            .iter()
            .position(|header| normalize_header(header) == wanted)
    }

    /// Number of columns in the captured header
    pub fn header_len(&self) -> Option<usize> {
        self.header.as_ref().map(Vec::len)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Number of columns in the table, mapped or not
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of columns bound to a descriptor
    pub fn bound_columns(&self) -> usize {
        self.columns.iter().filter(|column| column.is_some()).count()
    }
}

/// Where an output column takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    /// Descriptor index, `None` for a padding column
    pub descriptor: Option<usize>,

    /// Header key selecting the value of a multi-valued field
    pub key: Option<String>,
}

impl OutputColumn {
    pub fn padding() -> Self {
        Self {
            descriptor: None,
            key: None,
        }
    }
}

/// Header plus column sources for writing one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLayout {
    /// Header row; empty when the mode writes none
    pub header: Vec<String>,

    pub columns: Vec<OutputColumn>,
}
