//! Binding engine: rows to records and records to rows
//!
//! This module orchestrates complete conversions using a [`FieldMap`] and a
//! [`ConverterRegistry`]. Reading captures the header once, then walks each
//! row's columns in order, converting and assigning every mapped cell.
//! Writing asks the field map for a layout and formats each column.
//!
//! ## Architecture
//!
//! - [`engine`] - [`BindingEngine`], built once per mapping declaration
//! - [`session`] - [`BindingSession`], the per-sequence state machine
//! - [`source`] - Row source and row filter collaborators
//! - [`stats`] - Session statistics
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rowbind::app::services::binding_engine::source::rows_from;
//! use rowbind::{
//!     AddressingKey, BindConfig, BindingEngine, ConverterRegistry, DynamicRecord,
//!     FieldDescriptor, FieldKind, NameFieldMap, Value,
//! };
//!
//! # fn example() -> rowbind::Result<()> {
//! let map = NameFieldMap::from_descriptors([
//!     FieldDescriptor::new("name", AddressingKey::name("NAME"), FieldKind::Text).required(),
//!     FieldDescriptor::new("age", AddressingKey::name("AGE"), FieldKind::I32),
//! ])?;
//! let engine = BindingEngine::new(Arc::new(map), ConverterRegistry::shared(), BindConfig::default())?;
//!
//! let mut rows = rows_from(vec![
//!     vec!["NAME".to_string(), "AGE".to_string()],
//!     vec!["Alice".to_string(), "30".to_string()],
//! ]);
//! let people: Vec<DynamicRecord> = engine.convert_all(&mut rows, None)?;
//! assert_eq!(people[0].get("age"), Some(&Value::I32(30)));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! [`FieldMap`]: crate::app::services::field_map::FieldMap
//! [`ConverterRegistry`]: crate::app::services::converter_registry::ConverterRegistry

pub mod engine;
pub mod session;
pub mod source;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use engine::BindingEngine;
pub use session::{BindingSession, SessionState};
pub use source::{IterRowSource, RowFilter, RowSource};
pub use stats::BindStats;
