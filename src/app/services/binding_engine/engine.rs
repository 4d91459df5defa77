//! Binding engine implementation
//!
//! The engine is built once per mapping declaration. Construction resolves a
//! converter for every descriptor, so a field whose kind has no converter is
//! reported before any row is read.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

use super::session::BindingSession;
use super::source::{RowFilter, RowSource};
use crate::app::models::{
    AddressingKey, FieldDescriptor, Record, RecordView, Value, normalize_header,
};
use crate::app::services::converter_registry::{Converter, ConverterRegistry};
use crate::app::services::field_map::{ColumnBindings, FieldMap, OutputColumn, OutputLayout};
use crate::config::BindConfig;
use crate::{Error, Result};

/// Converts rows to records and records to rows for one mapping declaration
#[derive(Debug, Clone)]
pub struct BindingEngine {
    map: Arc<dyn FieldMap>,
    registry: Arc<ConverterRegistry>,
    config: BindConfig,

    /// Converter per descriptor, indexed like `map.descriptors()`
    converters: Vec<Arc<dyn Converter>>,
}

impl BindingEngine {
    /// Create an engine, validating the configuration and every field's kind
    pub fn new(
        map: Arc<dyn FieldMap>,
        registry: Arc<ConverterRegistry>,
        config: BindConfig,
    ) -> Result<Self> {
        config.validate()?;
        if map.mode() != config.mode {
            return Err(Error::configuration(format!(
                "field map addresses columns {:?} but the configuration expects {:?}",
                map.mode(),
                config.mode
            )));
        }

        let converters = map
            .descriptors()
            .iter()
            .map(|descriptor| registry.converter_for(descriptor))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Binding engine ready: {} fields, mode {:?}",
            converters.len(),
            config.mode
        );

        Ok(Self {
            map,
            registry,
            config,
            converters,
        })
    }

    pub fn map(&self) -> &dyn FieldMap {
        self.map.as_ref()
    }

    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Start a session over one row sequence
    pub fn session<R: Record>(&self) -> BindingSession<'_, R> {
        BindingSession::new(self)
    }

    /// Convert a whole row sequence; the first failure aborts it
    pub fn convert_all<R: Record>(
        &self,
        source: &mut dyn RowSource,
        filter: Option<&dyn RowFilter>,
    ) -> Result<Vec<R>> {
        self.session().convert_all(source, filter)
    }

    /// Header to write for a record
    pub fn generate_header(&self, record: &dyn RecordView) -> Result<Vec<String>> {
        self.map.generate_header(record)
    }

    /// Cells for a record, in the order of its generated header
    pub fn format_row(&self, record: &dyn RecordView) -> Result<Vec<String>> {
        self.check_required_values(record)?;
        let layout = self.map.layout(record)?;
        self.format_layout(record, &layout)
    }

    /// Header row (when the source has one) followed by one row per record
    ///
    /// All records share one header: the union of each record's columns.
    pub fn format_all<R: RecordView>(&self, records: &[R]) -> Result<Vec<Vec<String>>> {
        self.format_all_with_header(records, None)
    }

    /// Like [`format_all`](Self::format_all), reusing a captured header in
    /// position mode
    ///
    /// Position mode writes a header row only when `has_header` is set. Its
    /// cells come from `captured` where it reaches, otherwise from the field
    /// name at that position; padding columns are blank. Name mode always
    /// writes its generated header and ignores `captured`.
    pub fn format_all_with_header<R: RecordView>(
        &self,
        records: &[R],
        captured: Option<&[String]>,
    ) -> Result<Vec<Vec<String>>> {
        let mut layouts = Vec::with_capacity(records.len());
        for record in records {
            self.check_required_values(record)?;
            layouts.push(self.map.layout(record)?);
        }
        let Some(mut layout) = merge_layouts(layouts) else {
            return Ok(Vec::new());
        };
        if layout.header.is_empty() && self.config.has_header {
            self.name_positions(&mut layout, captured.unwrap_or_default());
        }

        let mut rows = Vec::with_capacity(records.len() + 1);
        if !layout.header.is_empty() {
            rows.push(layout.header.clone());
        }
        for record in records {
            rows.push(self.format_layout(record, &layout)?);
        }
        Ok(rows)
    }

    /// Bind one row into a new record using a captured column table
    pub(crate) fn bind_row<R: Record>(&self, bindings: &ColumnBindings, row: &[String]) -> Result<R> {
        if self.config.verify_line_length {
            if let Some(expected) = bindings.header_len() {
                if expected != row.len() {
                    return Err(Error::LineLength {
                        expected,
                        found: row.len(),
                    });
                }
            }
        }

        let mut record = R::default();
        for (column, cell) in row.iter().enumerate() {
            let Some(index) = bindings.descriptor_index(column) else {
                trace!("No field mapped for column {}, skipping", column);
                continue;
            };
            self.assign(&mut record, index, bindings.header_name(column), cell)?;
        }

        // A mapped column beyond the end of a short row is a blank cell
        for column in row.len()..bindings.width() {
            if let Some(index) = bindings.descriptor_index(column) {
                let descriptor = self.descriptor(index);
                if descriptor.is_required() {
                    return Err(Error::required_field_empty(descriptor.field()));
                }
            }
        }

        Ok(record)
    }

    /// Fill in a header for a header-less layout, widening it to `captured`
    fn name_positions(&self, layout: &mut OutputLayout, captured: &[String]) {
        if layout.columns.len() < captured.len() {
            layout
                .columns
                .resize_with(captured.len(), OutputColumn::padding);
        }
        layout.header = layout
            .columns
            .iter()
            .enumerate()
            .map(|(position, column)| match captured.get(position) {
                Some(name) => name.clone(),
                None => column
                    .descriptor
                    .map(|index| self.descriptor(index).field().to_string())
                    .unwrap_or_default(),
            })
            .collect();
        debug!("Writing position header with {} columns", layout.header.len());
    }

    fn descriptor(&self, index: usize) -> &FieldDescriptor {
        &self.map.descriptors()[index]
    }

    fn assign<R: Record>(
        &self,
        record: &mut R,
        index: usize,
        header: Option<&str>,
        cell: &str,
    ) -> Result<()> {
        let descriptor = self.descriptor(index);

        if cell.trim().is_empty() {
            if descriptor.is_required() {
                return Err(Error::required_field_empty(descriptor.field()));
            }
            return Ok(());
        }

        // Plain text keeps its whitespace; every other kind is trimmed
        let text = if descriptor.kind().is_text() {
            cell
        } else {
            cell.trim()
        };
        let value = self.converters[index].convert(text)?;

        if descriptor.is_multivalued() {
            let key = match descriptor.key() {
                AddressingKey::ExactName(name) => name.clone(),
                _ => header.map(str::trim).unwrap_or_default().to_string(),
            };
            record.push_multi_value(descriptor.field(), &key, value)
        } else {
            record.set_value(descriptor.field(), value)
        }
    }

    fn check_required_values(&self, record: &dyn RecordView) -> Result<()> {
        let empty: Vec<String> = self
            .map
            .descriptors()
            .iter()
            .filter(|descriptor| descriptor.is_required())
            .filter(|descriptor| {
                if descriptor.is_multivalued() {
                    record.multi_values(descriptor.field()).is_empty()
                } else {
                    record.value(descriptor.field()).is_none()
                }
            })
            .map(|descriptor| descriptor.field().to_string())
            .collect();

        if empty.is_empty() {
            Ok(())
        } else {
            Err(Error::RequiredFieldEmpty { fields: empty })
        }
    }

    fn format_layout(&self, record: &dyn RecordView, layout: &OutputLayout) -> Result<Vec<String>> {
        // Next unused value per (descriptor, key) for repeated multi-value columns
        let mut taken: HashMap<(usize, &str), usize> = HashMap::new();

        layout
            .columns
            .iter()
            .map(|column| {
                let Some(index) = column.descriptor else {
                    return Ok(String::new());
                };
                let descriptor = self.descriptor(index);

                let value: Option<Value> = if descriptor.is_multivalued() {
                    let key = column.key.as_deref().unwrap_or_default();
                    // Exact keys match case-insensitively, as they do on reading
                    let exact = matches!(descriptor.key(), AddressingKey::ExactName(_));
                    let nth = taken.entry((index, key)).or_insert(0);
                    let value = record
                        .multi_values(descriptor.field())
                        .into_iter()
                        .filter(|(value_key, _)| {
                            if exact {
                                normalize_header(value_key) == key
                            } else {
                                value_key == key
                            }
                        })
                        .nth(*nth)
                        .map(|(_, value)| value);
                    *nth += 1;
                    value
                } else {
                    record.value(descriptor.field())
                };

                match value {
                    Some(value) => self.converters[index].format(&value),
                    None => Ok(String::new()),
                }
            })
            .collect()
    }
}

/// Union of several layouts: each column appears as often as it does in the
/// record that repeats it most, ordered by header
fn merge_layouts(layouts: Vec<OutputLayout>) -> Option<OutputLayout> {
    let mut layouts = layouts.into_iter();
    let first = layouts.next()?;
    if first.header.is_empty() {
        // Header-less layouts do not depend on the record
        return Some(first);
    }

    type ColumnKey = (String, Option<usize>, Option<String>);
    let mut counts: BTreeMap<ColumnKey, usize> = BTreeMap::new();
    for layout in std::iter::once(first).chain(layouts) {
        let mut local: BTreeMap<ColumnKey, usize> = BTreeMap::new();
        for (header, column) in layout.header.into_iter().zip(layout.columns) {
            *local
                .entry((header, column.descriptor, column.key))
                .or_default() += 1;
        }
        for (key, count) in local {
            let merged = counts.entry(key).or_default();
            *merged = (*merged).max(count);
        }
    }

    let mut merged = OutputLayout::default();
    for ((header, descriptor, key), count) in counts {
        for _ in 0..count {
            merged.header.push(header.clone());
            merged.columns.push(OutputColumn {
                descriptor,
                key: key.clone(),
            });
        }
    }
    Some(merged)
}
