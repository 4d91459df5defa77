//! Core data models for record binding
//!
//! This module defines the closed set of field kinds, the tagged values they
//! convert to, the descriptors that say how a column is addressed, and the
//! record traits the binding engine reads from and writes into.

pub mod declaration;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::app::services::converter_registry::Converter;
use crate::constants::{BOOL_FALSE, BOOL_TRUE, DATETIME_KIND, DEFAULT_DATETIME_FORMAT};
use crate::{Error, Result};

/// How a field map resolves incoming columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Columns are matched by their 0-based index
    ByPosition,
    /// Columns are matched by header name or header pattern
    ByName,
}

/// Declared target type of a field
///
/// The primitive kinds and `Text` are served by the registry's built-in
/// converters. `Custom` kinds need a converter registered under their tag or
/// attached to the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    Text,
    Custom(String),
}

impl FieldKind {
    /// Parse a kind from its tag; unknown tags become custom kinds
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => FieldKind::Bool,
            "i8" | "byte" => FieldKind::I8,
            "i16" | "short" => FieldKind::I16,
            "i32" | "int" | "integer" => FieldKind::I32,
            "i64" | "long" => FieldKind::I64,
            "f32" | "float" => FieldKind::F32,
            "f64" | "double" => FieldKind::F64,
            "char" => FieldKind::Char,
            "text" | "string" => FieldKind::Text,
            _ => FieldKind::Custom(tag.trim().to_string()),
        }
    }

    /// Stable tag used to key converters
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Char => "char",
            FieldKind::Text => "text",
            FieldKind::Custom(tag) => tag,
        }
    }

    /// Plain text fields keep their surrounding whitespace
    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Text)
    }

    /// Whether the registry can build a converter for this kind on its own
    pub fn is_builtin(&self) -> bool {
        !matches!(self, FieldKind::Custom(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Kind this value belongs to
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::I8(_) => FieldKind::I8,
            Value::I16(_) => FieldKind::I16,
            Value::I32(_) => FieldKind::I32,
            Value::I64(_) => FieldKind::I64,
            Value::F32(_) => FieldKind::F32,
            Value::F64(_) => FieldKind::F64,
            Value::Char(_) => FieldKind::Char,
            Value::Text(_) => FieldKind::Text,
            Value::DateTime(_) => FieldKind::Custom(DATETIME_KIND.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Widen any integer variant to i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::I64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str(BOOL_TRUE),
            Value::Bool(false) => f.write_str(BOOL_FALSE),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::Text(text) => f.write_str(text),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DEFAULT_DATETIME_FORMAT)),
        }
    }
}

/// A header pattern matched against the whole header string
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    source: String,
    regex: Regex,
}

impl HeaderPattern {
    /// Compile a pattern; it must match an entire header, not a substring
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn matches(&self, header: &str) -> bool {
        self.regex.is_match(header)
    }

    /// The pattern as declared
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// How a field is located among the incoming columns
#[derive(Debug, Clone)]
pub enum AddressingKey {
    /// 0-based column index
    Position(usize),
    /// Exact header name, stored upper-cased
    ExactName(String),
    /// Header pattern
    Pattern(HeaderPattern),
}

impl AddressingKey {
    pub fn position(index: usize) -> Self {
        AddressingKey::Position(index)
    }

    /// Exact header key; matching is case-insensitive so the key is upper-cased
    pub fn name(header: &str) -> Self {
        AddressingKey::ExactName(normalize_header(header))
    }

    pub fn pattern(source: &str) -> Result<Self> {
        Ok(AddressingKey::Pattern(HeaderPattern::new(source)?))
    }

    /// Identifier used in diagnostics and generated headers
    pub fn identifier(&self) -> String {
        match self {
            AddressingKey::Position(index) => index.to_string(),
            AddressingKey::ExactName(name) => name.clone(),
            AddressingKey::Pattern(pattern) => pattern.as_str().to_string(),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, AddressingKey::Pattern(_))
    }
}

/// Canonical form of a header for exact matching
pub fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// Immutable description of one record field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    field: String,
    key: AddressingKey,
    kind: FieldKind,
    required: bool,
    multivalued: bool,
    converter: Option<Arc<dyn Converter>>,
}

impl FieldDescriptor {
    /// Describe an optional, single-valued field
    pub fn new(field: impl Into<String>, key: AddressingKey, kind: FieldKind) -> Self {
        Self {
            field: field.into(),
            key,
            kind,
            required: false,
            multivalued: false,
            converter: None,
        }
    }

    /// Mark the field mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as collecting several values keyed by header
    pub fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }

    /// Attach a converter that takes precedence over the registry
    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn key(&self) -> &AddressingKey {
        &self.key
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multivalued(&self) -> bool {
        self.multivalued
    }

    pub fn converter(&self) -> Option<&Arc<dyn Converter>> {
        self.converter.as_ref()
    }
}

/// A mandatory header that the input did not provide
#[derive(Debug, Clone)]
pub struct MissingRequiredEntry {
    /// Exact header key or pattern source
    pub identifier: String,
    pub descriptor: FieldDescriptor,
    pub is_pattern: bool,
}

/// Read access to a record's field values
///
/// This is the half of [`Record`] the output path needs; it stays object safe
/// so field maps can inspect any record type.
pub trait RecordView {
    /// Current value of a single-valued field, `None` when unset
    fn value(&self, field: &str) -> Option<Value>;

    /// `(header key, value)` pairs of a multi-valued field in insertion order
    fn multi_values(&self, field: &str) -> Vec<(String, Value)> {
        let _ = field;
        Vec::new()
    }
}

/// A structured record the engine can create and populate
pub trait Record: RecordView + Default {
    /// Assign a converted value to a single-valued field
    fn set_value(&mut self, field: &str, value: Value) -> Result<()>;

    /// Append a value to a multi-valued field under the given header key
    fn push_multi_value(&mut self, field: &str, key: &str, value: Value) -> Result<()> {
        let _ = (key, value);
        Err(Error::field_assignment(
            field,
            "record does not hold multi-valued fields",
        ))
    }
}

/// Schema-less record keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    values: BTreeMap<String, Value>,
    multi: BTreeMap<String, Vec<(String, Value)>>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Builder-style setter used when assembling records for output
    pub fn with(mut self, field: &str, value: Value) -> Self {
        self.values.insert(field.to_string(), value);
        self
    }

    /// Builder-style multi-value setter
    pub fn with_multi(mut self, field: &str, key: &str, value: Value) -> Self {
        self.multi
            .entry(field.to_string())
            .or_default()
            .push((key.to_string(), value));
        self
    }

    /// Values of a multi-valued field
    pub fn get_multi(&self, field: &str) -> &[(String, Value)] {
        self.multi.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of populated single- and multi-valued fields
    pub fn len(&self) -> usize {
        self.values.len() + self.multi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordView for DynamicRecord {
    fn value(&self, field: &str) -> Option<Value> {
        self.values.get(field).cloned()
    }

    fn multi_values(&self, field: &str) -> Vec<(String, Value)> {
        self.get_multi(field).to_vec()
    }
}

impl Record for DynamicRecord {
    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn push_multi_value(&mut self, field: &str, key: &str, value: Value) -> Result<()> {
        self.multi
            .entry(field.to_string())
            .or_default()
            .push((key.to_string(), value));
        Ok(())
    }
}
