//! Test fixtures for field map testing

use crate::app::models::{AddressingKey, DynamicRecord, FieldDescriptor, FieldKind, Value};
use crate::app::services::field_map::{NameFieldMap, PositionFieldMap};

mod by_position_tests;

/// Name map with a mandatory exact NAME, optional AGE, and an optional phone pattern
pub fn people_map() -> NameFieldMap {
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

/// Name map whose phone pattern is mandatory
pub fn required_phone_map() -> NameFieldMap {
    NameFieldMap::from_descriptors([
        FieldDescriptor::new("name", AddressingKey::name("NAME"), FieldKind::Text).required(),
        FieldDescriptor::new(
            "phones",
            AddressingKey::pattern("phone_.*").unwrap(),
            FieldKind::Text,
        )
        .required()
        .multivalued(),
    ])
    .unwrap()
}

/// Position map over columns 0 and 2
pub fn sparse_position_map() -> PositionFieldMap {
    PositionFieldMap::from_descriptors([
        FieldDescriptor::new("id", AddressingKey::position(0), FieldKind::I64).required(),
        FieldDescriptor::new("label", AddressingKey::position(2), FieldKind::Text),
    ])
    .unwrap()
}

pub fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub fn person_with_phones(phones: &[(&str, &str)]) -> DynamicRecord {
    phones.iter().fold(
        DynamicRecord::new().with("name", text("Alice")),
        |record, (key, number)| record.with_multi("phones", key, text(number)),
    )
}
