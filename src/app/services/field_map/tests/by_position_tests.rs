//! Tests for the position-addressed field map

use super::sparse_position_map;
use crate::Error;
use crate::app::models::{AddressingKey, AddressingMode, DynamicRecord, FieldDescriptor, FieldKind};
use crate::app::services::field_map::{FieldMap, OutputColumn, PositionFieldMap};

#[test]
fn test_find_by_position() {
    let map = sparse_position_map();

    assert_eq!(map.mode(), AddressingMode::ByPosition);
    assert_eq!(map.find(0).unwrap().field(), "id");
    assert!(map.find(1).is_none());
    assert_eq!(map.find(2).unwrap().field(), "label");
    assert_eq!(map.max_position(), Some(2));
}

#[test]
fn test_empty_map_has_no_max_position() {
    assert_eq!(PositionFieldMap::new().max_position(), None);
}

#[test]
fn test_duplicate_position_rejected() {
    let result = PositionFieldMap::from_descriptors([
        FieldDescriptor::new("a", AddressingKey::position(1), FieldKind::Text),
        FieldDescriptor::new("b", AddressingKey::position(1), FieldKind::Text),
    ]);
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_name_key_rejected() {
    let mut map = PositionFieldMap::new();
    let result = map.register(FieldDescriptor::new(
        "a",
        AddressingKey::name("A"),
        FieldKind::Text,
    ));
    assert!(result.is_err());
}

#[test]
fn test_multivalued_rejected() {
    let mut map = PositionFieldMap::new();
    let result = map.register(
        FieldDescriptor::new("a", AddressingKey::position(0), FieldKind::Text).multivalued(),
    );
    assert!(result.is_err());
}

#[test]
fn test_capture_header_binds_positions() {
    let map = sparse_position_map();
    let bindings = map.capture_header(None).unwrap();

    assert_eq!(bindings.descriptor_index(0), Some(0));
    assert_eq!(bindings.descriptor_index(1), None);
    assert_eq!(bindings.descriptor_index(2), Some(1));
    assert_eq!(bindings.descriptor_index(3), None);
}

#[test]
fn test_layout_pads_gaps_and_writes_no_header() {
    let map = sparse_position_map();
    let layout = map.layout(&DynamicRecord::new()).unwrap();

    assert!(layout.header.is_empty());
    assert_eq!(layout.columns.len(), 3);
    assert_eq!(layout.columns[1], OutputColumn::padding());
    assert_eq!(layout.columns[2].descriptor, Some(1));
    assert!(map.generate_header(&DynamicRecord::new()).unwrap().is_empty());
}
