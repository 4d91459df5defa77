//! Built-in converters
//!
//! A converter parses trimmed (or, for text, untouched) cell content into a
//! [`Value`] and formats a value back into cell content.

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::app::models::{FieldKind, Value};
use crate::constants::{BOOL_FALSE, BOOL_TRUE};
use crate::{Error, Result};

/// Parses cell text into a typed value and formats it back
pub trait Converter: Send + Sync + fmt::Debug {
    /// Parse non-blank cell text
    fn convert(&self, text: &str) -> Result<Value>;

    /// Format a value for output
    fn format(&self, value: &Value) -> Result<String>;
}

/// Converter for the primitive kinds and plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveConverter {
    kind: FieldKind,
}

impl PrimitiveConverter {
    /// Create a converter for a built-in kind; `None` for custom kinds
    pub fn new(kind: FieldKind) -> Option<Self> {
        kind.is_builtin().then_some(Self { kind })
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

fn parse_number<T>(text: &str, kind: &FieldKind) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| Error::conversion(text, kind.clone(), e))
}

impl Converter for PrimitiveConverter {
    fn convert(&self, text: &str) -> Result<Value> {
        let kind = &self.kind;
        let value = match kind {
            FieldKind::Bool => {
                if text.eq_ignore_ascii_case(BOOL_TRUE) {
                    Value::Bool(true)
                } else if text.eq_ignore_ascii_case(BOOL_FALSE) {
                    Value::Bool(false)
                } else {
                    return Err(Error::conversion(
                        text,
                        kind.clone(),
                        "expected 'true' or 'false'",
                    ));
                }
            }
            FieldKind::I8 => Value::I8(parse_number(text, kind)?),
            FieldKind::I16 => Value::I16(parse_number(text, kind)?),
            FieldKind::I32 => Value::I32(parse_number(text, kind)?),
            FieldKind::I64 => Value::I64(parse_number(text, kind)?),
            FieldKind::F32 => Value::F32(parse_number(text, kind)?),
            FieldKind::F64 => Value::F64(parse_number(text, kind)?),
            // Only the first character is kept
            FieldKind::Char => match text.chars().next() {
                Some(c) => Value::Char(c),
                None => return Err(Error::conversion(text, kind.clone(), "empty text")),
            },
            FieldKind::Text => Value::Text(text.to_string()),
            FieldKind::Custom(_) => {
                return Err(Error::conversion(
                    text,
                    kind.clone(),
                    "no built-in conversion for custom kind",
                ));
            }
        };
        Ok(value)
    }

    fn format(&self, value: &Value) -> Result<String> {
        if value.kind() != self.kind {
            return Err(Error::conversion(
                value.to_string(),
                self.kind.clone(),
                format!("value is of kind {}", value.kind()),
            ));
        }
        Ok(value.to_string())
    }
}

/// chrono-backed converter for date/time cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeConverter {
    format: String,
}

impl DateTimeConverter {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Converter for DateTimeConverter {
    fn convert(&self, text: &str) -> Result<Value> {
        NaiveDateTime::parse_from_str(text, &self.format)
            .map(Value::DateTime)
            .map_err(|e| {
                Error::conversion(
                    text,
                    FieldKind::Custom(crate::constants::DATETIME_KIND.to_string()),
                    format!("{} (expected format '{}')", e, self.format),
                )
            })
    }

    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::DateTime(dt) => Ok(dt.format(&self.format).to_string()),
            other => Err(Error::conversion(
                other.to_string(),
                FieldKind::Custom(crate::constants::DATETIME_KIND.to_string()),
                format!("value is of kind {}", other.kind()),
            )),
        }
    }
}
