//! Integration tests for declaration-driven binding of CSV files
//!
//! These tests go through the public API only: a JSON mapping declaration,
//! the CSV row source and the binding engine, plus the CLI command runners.

use chrono::NaiveDate;
use rowbind::cli::args::{CheckArgs, ConvertArgs};
use rowbind::cli::commands;
use rowbind::cli::csv_source::{CsvRowSource, write_rows};
use rowbind::{BindingEngine, ConverterRegistry, DynamicRecord, Error, MappingDeclaration, Value};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONTACTS_MAPPING: &str = r#"{
    "config": { "mode": "by_name", "has_header": true },
    "fields": [
        { "field": "name", "header": "Name", "required": true },
        { "field": "age", "header": "Age", "kind": "i32" },
        { "field": "active", "header": "Active", "kind": "bool" },
        { "field": "joined", "header": "Joined", "kind": "datetime", "format": "%Y-%m-%d %H:%M" },
        { "field": "phones", "pattern": "phone_.*", "multivalued": true }
    ]
}"#;

const CONTACTS_CSV: &str = "\
Name,Age,Active,Joined,phone_work,phone_home,Notes
Alice,30,TRUE,2021-03-04 09:15,555-2,555-1,first
Bob,,false,2020-01-01 00:00,,555-3,
";

fn engine_for(mapping: &str) -> BindingEngine {
    let declaration = MappingDeclaration::from_json(mapping).unwrap();
    BindingEngine::new(
        declaration.field_map().unwrap(),
        ConverterRegistry::shared(),
        declaration.config.clone(),
    )
    .unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    use rowbind::RowSource;

    let mut source = CsvRowSource::from_path(path).unwrap();
    let mut rows = Vec::new();
    while let Some(row) = source.next_row().unwrap() {
        rows.push(row);
    }
    rows
}

/// Test binding a CSV file through a JSON declaration
///
/// Purpose: Validate every declared kind, the unmapped Notes column and blank optional cells
#[test]
fn test_bind_contacts_from_declaration() {
    let engine = engine_for(CONTACTS_MAPPING);
    let mut source = CsvRowSource::from_reader(Cursor::new(CONTACTS_CSV));

    let records: Vec<DynamicRecord> = engine.convert_all(&mut source, None).unwrap();

    assert_eq!(records.len(), 2);
    let alice = &records[0];
    assert_eq!(alice.get("name"), Some(&Value::Text("Alice".to_string())));
    assert_eq!(alice.get("age"), Some(&Value::I32(30)));
    assert_eq!(alice.get("active"), Some(&Value::Bool(true)));
    assert_eq!(
        alice.get("joined"),
        Some(&Value::DateTime(
            NaiveDate::from_ymd_opt(2021, 3, 4)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap()
        ))
    );
    assert_eq!(alice.get_multi("phones").len(), 2);
    assert!(alice.get("notes").is_none());

    let bob = &records[1];
    assert!(bob.get("age").is_none());
    assert_eq!(
        bob.get_multi("phones"),
        &[("phone_home".to_string(), Value::Text("555-3".to_string()))]
    );
}

/// Test writing bound records and reading them back
///
/// Purpose: Validate that the regenerated, sorted header binds to the same values
#[test]
fn test_written_file_binds_again() {
    let dir = TempDir::new().unwrap();
    let engine = engine_for(CONTACTS_MAPPING);
    let mut source = CsvRowSource::from_reader(Cursor::new(CONTACTS_CSV));
    let records: Vec<DynamicRecord> = engine.convert_all(&mut source, None).unwrap();

    let rows = engine.format_all(&records).unwrap();
    assert_eq!(
        rows[0],
        vec!["ACTIVE", "AGE", "JOINED", "NAME", "phone_home", "phone_work"]
    );
    assert_eq!(
        rows[1],
        vec!["true", "30", "2021-03-04 09:15", "Alice", "555-1", "555-2"]
    );

    let output = dir.path().join("contacts.csv");
    write_rows(fs::File::create(&output).unwrap(), &rows).unwrap();

    let mut reread = CsvRowSource::from_path(&output).unwrap();
    let again: Vec<DynamicRecord> = engine.convert_all(&mut reread, None).unwrap();
    for (before, after) in records.iter().zip(&again) {
        for field in ["name", "age", "active", "joined"] {
            assert_eq!(before.get(field), after.get(field), "field {}", field);
        }
        assert_eq!(
            before.get_multi("phones").len(),
            after.get_multi("phones").len()
        );
    }
}

/// Test a header-less file addressed by position
#[test]
fn test_bind_by_position() {
    let mapping = r#"{
        "config": { "mode": "by_position", "has_header": false },
        "fields": [
            { "field": "id", "position": 0, "kind": "i64", "required": true },
            { "field": "grade", "position": 2, "kind": "char" }
        ]
    }"#;
    let engine = engine_for(mapping);
    let mut source = CsvRowSource::from_reader(Cursor::new("1,x,Alpha\n2,y,\n"));

    let records: Vec<DynamicRecord> = engine.convert_all(&mut source, None).unwrap();

    assert_eq!(records[0].get("id"), Some(&Value::I64(1)));
    assert_eq!(records[0].get("grade"), Some(&Value::Char('A')));
    assert!(records[1].get("grade").is_none());
    assert_eq!(
        engine.format_all(&records).unwrap(),
        vec![vec!["1", "", "A"], vec!["2", "", ""]]
    );
}

/// Test converting a positional file that carries a header row
///
/// Purpose: Validate that the captured header is written back, so the output
/// binds to every record again
#[test]
fn test_convert_by_position_keeps_header_row() {
    let dir = TempDir::new().unwrap();
    let mapping_json = r#"{
        "config": { "mode": "by_position", "has_header": true },
        "fields": [
            { "field": "id", "position": 0, "kind": "i64", "required": true },
            { "field": "label", "position": 2 }
        ]
    }"#;
    let mapping = write_file(&dir, "labels.json", mapping_json);
    let input = write_file(&dir, "labels.csv", "Id,Code,Label\n1,a,one\n2,b,two\n");
    let output = dir.path().join("out.csv");

    commands::run_convert(ConvertArgs {
        mapping,
        input,
        output: Some(output.clone()),
        skip_marker: None,
        verbose: 0,
        quiet: true,
    })
    .unwrap();

    assert_eq!(
        read_rows(&output),
        vec![
            vec!["Id", "Code", "Label"],
            vec!["1", "", "one"],
            vec!["2", "", "two"]
        ]
    );
    let engine = engine_for(mapping_json);
    let mut reread = CsvRowSource::from_path(&output).unwrap();
    let records: Vec<DynamicRecord> = engine.convert_all(&mut reread, None).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("id"), Some(&Value::I64(1)));
}

/// Test that a missing mandatory header stops binding before any row
#[test]
fn test_missing_required_header_reported() {
    let engine = engine_for(CONTACTS_MAPPING);
    let mut source = CsvRowSource::from_reader(Cursor::new("Age,phone_home\n30,555\n"));

    let error = engine
        .convert_all::<DynamicRecord>(&mut source, None)
        .unwrap_err();

    assert!(matches!(error, Error::HeaderCapture { .. }));
    assert!(error.to_string().contains("NAME"));
}

/// Test the convert command end to end with a skip marker
#[test]
fn test_convert_command_writes_output() {
    let dir = TempDir::new().unwrap();
    let mapping = write_file(&dir, "contacts.json", CONTACTS_MAPPING);
    let input = write_file(
        &dir,
        "contacts.csv",
        "Name,Age\n# exported 2024-01-01\nAlice,30\n",
    );
    let output = dir.path().join("out.csv");

    let stats = commands::run_convert(ConvertArgs {
        mapping,
        input,
        output: Some(output.clone()),
        skip_marker: Some("#".to_string()),
        verbose: 0,
        quiet: true,
    })
    .unwrap();

    assert_eq!(stats.rows_read, 2);
    assert_eq!(stats.rows_filtered, 1);
    assert_eq!(stats.records_bound, 1);
    assert_eq!(
        read_rows(&output),
        vec![
            vec!["ACTIVE", "AGE", "JOINED", "NAME"],
            vec!["", "30", "", "Alice"]
        ]
    );
}

/// Test the check command rejects a file with a bad cell
#[test]
fn test_check_command_reports_bad_row() {
    let dir = TempDir::new().unwrap();
    let mapping = write_file(&dir, "contacts.json", CONTACTS_MAPPING);
    let input = write_file(&dir, "contacts.csv", "Name,Age\nAlice,30\nBob,old\n");

    let error = commands::run_check(CheckArgs {
        mapping,
        input,
        skip_marker: None,
        verbose: 0,
        quiet: true,
    })
    .unwrap_err();

    let message = format!("{:#}", error);
    assert!(message.contains("row 2"), "{}", message);
    assert!(message.contains("old"), "{}", message);
}
