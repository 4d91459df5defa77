//! Tests for converter resolution and the built-in converters

use std::sync::Arc;

use super::converters::Converter;
use crate::Result;
use crate::app::models::{FieldKind, Value};


/// Converter for a made-up "cents" kind: decimal text stored as i64 cents
#[derive(Debug)]
pub struct CentsConverter;

impl Converter for CentsConverter {
    fn convert(&self, text: &str) -> Result<Value> {
        let amount: f64 = text
            .parse()
            .map_err(|e| crate::Error::conversion(text, cents_kind(), e))?;
        Ok(Value::I64((amount * 100.0).round() as i64))
    }

    fn format(&self, value: &Value) -> Result<String> {
        let cents = value
            .as_i64()
            .ok_or_else(|| crate::Error::conversion(value.to_string(), cents_kind(), "not cents"))?;
        Ok(format!("{}.{:02}", cents / 100, cents % 100))
    }
}

pub fn cents_kind() -> FieldKind {
    FieldKind::Custom("cents".to_string())
}

pub fn cents_converter() -> Arc<dyn Converter> {
    Arc::new(CentsConverter)
}
