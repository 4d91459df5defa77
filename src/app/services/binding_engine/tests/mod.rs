//! Test fixtures for binding engine testing

use std::sync::Arc;

use crate::app::models::{
    AddressingKey, FieldDescriptor, FieldKind, Record, RecordView, Value,
};
use crate::app::services::binding_engine::BindingEngine;
use crate::app::services::converter_registry::ConverterRegistry;
use crate::app::services::field_map::{FieldMap, NameFieldMap, PositionFieldMap};
use crate::config::BindConfig;
use crate::{Error, Result};


/// Typed record with one mandatory and one optional field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: Option<i32>,
}

impl Person {
    pub fn new(name: &str, age: Option<i32>) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl RecordView for Person {
    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "name" if !self.name.is_empty() => Some(Value::Text(self.name.clone())),
            "age" => self.age.map(Value::I32),
            _ => None,
        }
    }
}

impl Record for Person {
    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match (field, value) {
            ("name", Value::Text(name)) => self.name = name,
            ("age", Value::I32(age)) => self.age = Some(age),
            (field, value) => {
                return Err(Error::field_assignment(
                    field,
                    format!("unexpected value {:?}", value),
                ));
            }
        }
        Ok(())
    }
}

/// NAME (mandatory text) and AGE (optional i32)
pub fn person_map() -> NameFieldMap {
    NameFieldMap::from_descriptors([
        FieldDescriptor::new("name", AddressingKey::name("NAME"), FieldKind::Text).required(),
        FieldDescriptor::new("age", AddressingKey::name("AGE"), FieldKind::I32),
    ])
    .unwrap()
}

/// Person fields plus an optional phone pattern
pub fn contact_map() -> NameFieldMap {
    NameFieldMap::from_descriptors([
        FieldDescriptor::new("name", AddressingKey::name("NAME"), FieldKind::Text).required(),
        FieldDescriptor::new("age", AddressingKey::name("AGE"), FieldKind::I32),
        FieldDescriptor::new(
            "phones",
            AddressingKey::pattern("phone_.*").unwrap(),
            FieldKind::Text,
        )
        .multivalued(),
    ])
    .unwrap()
}

/// Column 0 mandatory i64 id, column 2 optional text label
pub fn position_map() -> PositionFieldMap {
    PositionFieldMap::from_descriptors([
        FieldDescriptor::new("id", AddressingKey::position(0), FieldKind::I64).required(),
        FieldDescriptor::new("label", AddressingKey::position(2), FieldKind::Text),
    ])
    .unwrap()
}

pub fn engine_for(map: impl FieldMap + 'static, config: BindConfig) -> BindingEngine {
    BindingEngine::new(Arc::new(map), ConverterRegistry::shared(), config).unwrap()
}

pub fn person_engine() -> BindingEngine {
    engine_for(person_map(), BindConfig::by_name())
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

pub fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells.iter().map(|r| row(r)).collect()
}
