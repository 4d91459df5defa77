//! Field maps: resolving columns to field descriptors
//!
//! A field map owns the descriptors of one mapping declaration and answers
//! two questions: which descriptor is responsible for an incoming column, and
//! which columns (and header) a record should be written out as.
//!
//! ## Architecture
//!
//! - [`bindings`] - The column-to-descriptor table captured from a header
//! - [`by_position`] - [`PositionFieldMap`], addressing by column index
//! - [`by_name`] - [`NameFieldMap`], addressing by exact header or header pattern
//!
//! Field maps are immutable once built and are shared between sessions
//! behind an `Arc<dyn FieldMap>`.

pub mod bindings;
pub mod by_name;
pub mod by_position;

#[cfg(test)]
pub mod tests;

use std::fmt;

use crate::Result;
use crate::app::models::{AddressingMode, FieldDescriptor, RecordView};

// Re-export main types for easy access
pub use bindings::{ColumnBindings, OutputColumn, OutputLayout};
pub use by_name::NameFieldMap;
pub use by_position::PositionFieldMap;

/// Resolves columns to descriptors for one addressing mode
pub trait FieldMap: Send + Sync + fmt::Debug {
    fn mode(&self) -> AddressingMode;

    /// All registered descriptors; indexes into this slice identify fields
    fn descriptors(&self) -> &[FieldDescriptor];

    /// Validate the header (if any) and build the column table for a session
    fn capture_header(&self, header: Option<&[String]>) -> Result<ColumnBindings>;

    /// Header and column sources for writing a record
    fn layout(&self, record: &dyn RecordView) -> Result<OutputLayout>;

    /// Header to write for a record; empty when the mode writes none
    fn generate_header(&self, record: &dyn RecordView) -> Result<Vec<String>> {
        Ok(self.layout(record)?.header)
    }
}
