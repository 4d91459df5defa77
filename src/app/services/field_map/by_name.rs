//! Field map addressing columns by header name or header pattern
//!
//! Exact entries are keyed by the upper-cased header, so matching is
//! case-insensitive. Pattern entries are kept in registration order and the
//! first matching pattern wins. An exact match always takes precedence over
//! any pattern.

use std::collections::HashMap;
use tracing::debug;

use super::FieldMap;
use super::bindings::{ColumnBindings, OutputColumn, OutputLayout};
use crate::app::models::{
    AddressingKey, AddressingMode, FieldDescriptor, HeaderPattern, MissingRequiredEntry,
    RecordView, normalize_header,
};
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct PatternEntry {
    pattern: HeaderPattern,
    descriptor: usize,
}

/// Field map for header-bearing sources
#[derive(Debug, Clone, Default)]
pub struct NameFieldMap {
    descriptors: Vec<FieldDescriptor>,

    /// Exact keys in declaration order
    simple: Vec<(String, usize)>,

    /// Exact key to descriptor index
    simple_index: HashMap<String, usize>,

    /// Pattern entries in registration order
    complex: Vec<PatternEntry>,
}

impl NameFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from descriptors, rejecting any that are position-keyed
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Result<Self> {
        let mut map = Self::new();
        for descriptor in descriptors {
            map.register(descriptor)?;
        }
        Ok(map)
    }

    /// Register a descriptor as an exact or pattern entry
    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<()> {
        let index = self.descriptors.len();
        match descriptor.key() {
            AddressingKey::ExactName(key) => {
                if let Some(&existing) = self.simple_index.get(key) {
                    return Err(Error::configuration(format!(
                        "header '{}' is mapped to both '{}' and '{}'",
                        key,
                        self.descriptors[existing].field(),
                        descriptor.field()
                    )));
                }
                self.simple_index.insert(key.clone(), index);
                self.simple.push((key.clone(), index));
            }
            AddressingKey::Pattern(pattern) => {
                if !descriptor.is_multivalued() {
                    return Err(Error::configuration(format!(
                        "field '{}' is matched by pattern '{}' and must be multi-valued",
                        descriptor.field(),
                        pattern.as_str()
                    )));
                }
                self.complex.push(PatternEntry {
                    pattern: pattern.clone(),
                    descriptor: index,
                });
            }
            AddressingKey::Position(position) => {
                return Err(Error::configuration(format!(
                    "field '{}' is keyed by column {} but the map addresses columns by name",
                    descriptor.field(),
                    position
                )));
            }
        }

        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor index and descriptor responsible for a header
    pub fn find(&self, header: &str) -> Option<(usize, &FieldDescriptor)> {
        let index = match self.simple_index.get(&normalize_header(header)) {
            Some(&index) => index,
            None => {
                let header = header.trim();
                self.complex
                    .iter()
                    .find(|entry| entry.pattern.matches(header))?
                    .descriptor
            }
        };
        Some((index, &self.descriptors[index]))
    }

    /// Mandatory headers not matched by any of the headers present
    ///
    /// Exact misses come first in declaration order, followed by pattern
    /// misses in registration order. Each present header consumes at most
    /// one entry; a header equal to any exact key never consumes a pattern.
    pub fn find_missing_required_headers(
        &self,
        headers_present: &[String],
    ) -> Vec<MissingRequiredEntry> {
        let mut required_exact: Vec<&(String, usize)> = self
            .simple
            .iter()
            .filter(|(_, index)| self.descriptors[*index].is_required())
            .collect();
        let mut required_patterns: Vec<&PatternEntry> = self
            .complex
            .iter()
            .filter(|entry| self.descriptors[entry.descriptor].is_required())
            .collect();

        for header in headers_present {
            let key = normalize_header(header);
            if let Some(pos) = required_exact.iter().position(|(name, _)| *name == key) {
                required_exact.remove(pos);
            } else if !self.simple_index.contains_key(&key) {
                let header = header.trim();
                if let Some(pos) = required_patterns
                    .iter()
                    .position(|entry| entry.pattern.matches(header))
                {
                    required_patterns.remove(pos);
                }
            }
        }

        let exact = required_exact
            .into_iter()
            .map(|(name, index)| MissingRequiredEntry {
                identifier: name.clone(),
                descriptor: self.descriptors[*index].clone(),
                is_pattern: false,
            });
        let patterns = required_patterns
            .into_iter()
            .map(|entry| MissingRequiredEntry {
                identifier: entry.pattern.as_str().to_string(),
                descriptor: self.descriptors[entry.descriptor].clone(),
                is_pattern: true,
            });
        exact.chain(patterns).collect()
    }
}

impl FieldMap for NameFieldMap {
    fn mode(&self) -> AddressingMode {
        AddressingMode::ByName
    }

    fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    fn capture_header(&self, header: Option<&[String]>) -> Result<ColumnBindings> {
        let header = header.ok_or_else(|| {
            Error::configuration("source has no header row to match field names against")
        })?;

        let missing = self.find_missing_required_headers(header);
        if !missing.is_empty() {
            return Err(Error::MissingRequiredHeaders { missing });
        }

        let columns: Vec<Option<usize>> = header
            .iter()
            .map(|name| self.find(name).map(|(index, _)| index))
            .collect();

        let bindings = ColumnBindings::new(Some(header.to_vec()), columns);
        debug!(
            "Captured header with {} columns, {} bound to fields",
            header.len(),
            bindings.bound_columns()
        );
        Ok(bindings)
    }

    /// Header is every exact key plus each populated multi-value key its
    /// pattern would match on reading, sorted ascending
    fn layout(&self, record: &dyn RecordView) -> Result<OutputLayout> {
        let mut entries: Vec<(String, OutputColumn)> = Vec::new();

        for (key, index) in &self.simple {
            let descriptor = &self.descriptors[*index];
            let repeats = if descriptor.is_multivalued() {
                record
                    .multi_values(descriptor.field())
                    .iter()
                    .filter(|(value_key, _)| normalize_header(value_key) == *key)
                    .count()
                    .max(1)
            } else {
                1
            };
            for _ in 0..repeats {
                entries.push((
                    key.clone(),
                    OutputColumn {
                        descriptor: Some(*index),
                        key: Some(key.clone()),
                    },
                ));
            }
        }

        let mut unsatisfied = Vec::new();
        for entry in &self.complex {
            let descriptor = &self.descriptors[entry.descriptor];
            let before = entries.len();
            for (key, _) in record.multi_values(descriptor.field()) {
                // Keys the pattern would not match on reading are not written
                if entry.pattern.matches(&key) {
                    entries.push((
                        key.clone(),
                        OutputColumn {
                            descriptor: Some(entry.descriptor),
                            key: Some(key),
                        },
                    ));
                }
            }
            if entries.len() == before && descriptor.is_required() {
                debug!(
                    "Required field '{}' has no values matching '{}'",
                    descriptor.field(),
                    entry.pattern.as_str()
                );
                unsatisfied.push(descriptor.field().to_string());
            }
        }

        if !unsatisfied.is_empty() {
            return Err(Error::RequiredFieldEmpty {
                fields: unsatisfied,
            });
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (header, columns) = entries.into_iter().unzip();
        Ok(OutputLayout { header, columns })
    }
}
