//! Type conversion registry for cell values
//!
//! This module turns cell text into typed [`Value`]s and back. Converters are
//! resolved per [`FieldKind`] and memoized for the lifetime of the registry,
//! so sessions sharing one registry only pay for resolution once.
//!
//! ## Architecture
//!
//! - [`converters`] - The [`Converter`] trait and the built-in converters
//! - [`registry`] - The memoizing [`ConverterRegistry`]
//!
//! ## Usage
//!
//! ```rust
//! use rowbind::{ConverterRegistry, FieldKind, Value};
//!
//! let registry = ConverterRegistry::new();
//! let value = registry.convert("42", &FieldKind::I32).unwrap();
//! assert_eq!(value, Value::I32(42));
//! assert_eq!(registry.format(&value, &FieldKind::I32).unwrap(), "42");
//! ```
//!
//! [`Value`]: crate::app::models::Value
//! [`FieldKind`]: crate::app::models::FieldKind

pub mod converters;
pub mod registry;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use converters::{Converter, DateTimeConverter, PrimitiveConverter};
pub use registry::ConverterRegistry;
