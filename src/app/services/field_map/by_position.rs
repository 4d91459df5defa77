//! Field map addressing columns by index

use std::collections::HashMap;
use tracing::debug;

use super::FieldMap;
use super::bindings::{ColumnBindings, OutputColumn, OutputLayout};
use crate::app::models::{AddressingKey, AddressingMode, FieldDescriptor, RecordView};
use crate::{Error, Result};

/// Field map for sources without usable headers
#[derive(Debug, Clone, Default)]
pub struct PositionFieldMap {
    descriptors: Vec<FieldDescriptor>,
    by_position: HashMap<usize, usize>,
}

impl PositionFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from descriptors, rejecting any that are not position-keyed
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Result<Self> {
        let mut map = Self::new();
        for descriptor in descriptors {
            map.register(descriptor)?;
        }
        Ok(map)
    }

    /// Register a descriptor under its column index
    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<()> {
        let position = match descriptor.key() {
            AddressingKey::Position(position) => *position,
            other => {
                return Err(Error::configuration(format!(
                    "field '{}' is keyed by '{}' but the map addresses columns by position",
                    descriptor.field(),
                    other.identifier()
                )));
            }
        };
        if descriptor.is_multivalued() {
            return Err(Error::configuration(format!(
                "field '{}' cannot be multi-valued when addressed by position",
                descriptor.field()
            )));
        }
        if let Some(&existing) = self.by_position.get(&position) {
            return Err(Error::configuration(format!(
                "column {} is mapped to both '{}' and '{}'",
                position,
                self.descriptors[existing].field(),
                descriptor.field()
            )));
        }

        self.by_position.insert(position, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor responsible for a column
    pub fn find(&self, position: usize) -> Option<&FieldDescriptor> {
        self.by_position
            .get(&position)
            .map(|&index| &self.descriptors[index])
    }

    /// Highest mapped column index
    pub fn max_position(&self) -> Option<usize> {
        self.by_position.keys().copied().max()
    }
}

impl FieldMap for PositionFieldMap {
    fn mode(&self) -> AddressingMode {
        AddressingMode::ByPosition
    }

    fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    fn capture_header(&self, header: Option<&[String]>) -> Result<ColumnBindings> {
        let width = self.max_position().map_or(0, |max| max + 1);
        let columns = (0..width)
            .map(|position| self.by_position.get(&position).copied())
            .collect();

        debug!(
            "Position map bound {} of {} columns",
            self.descriptors.len(),
            width
        );
        Ok(ColumnBindings::new(header.map(<[String]>::to_vec), columns))
    }

    fn layout(&self, _record: &dyn RecordView) -> Result<OutputLayout> {
        let width = self.max_position().map_or(0, |max| max + 1);
        let columns = (0..width)
            .map(|position| match self.by_position.get(&position) {
                Some(&index) => OutputColumn {
                    descriptor: Some(index),
                    key: None,
                },
                None => OutputColumn::padding(),
            })
            .collect();

        Ok(OutputLayout {
            header: Vec::new(),
            columns,
        })
    }
}
