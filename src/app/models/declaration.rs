//! Serializable mapping declarations
//!
//! A mapping declaration lists every field a record exposes, how each one is
//! addressed, and the session configuration. It is the JSON form the CLI
//! loads; library users usually build descriptors directly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{AddressingKey, AddressingMode, FieldDescriptor, FieldKind};
use crate::app::services::converter_registry::DateTimeConverter;
use crate::app::services::field_map::{FieldMap, NameFieldMap, PositionFieldMap};
use crate::config::BindConfig;
use crate::constants::DATETIME_KIND;
use crate::{Error, Result};

/// Complete declaration of a record layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingDeclaration {
    #[serde(default)]
    pub config: BindConfig,

    pub fields: Vec<FieldDeclaration>,
}

/// One declared field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Field name on the record
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub multivalued: bool,

    /// chrono format string for `datetime` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn default_kind() -> String {
    "text".to_string()
}

impl MappingDeclaration {
    /// Parse a declaration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("Invalid mapping declaration: {}", e)))
    }

    /// Load a declaration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read mapping declaration {}", path.display()),
                e,
            )
        })?;
        let declaration = Self::from_json(&content)?;
        debug!(
            "Loaded {} field declarations from {}",
            declaration.fields.len(),
            path.display()
        );
        Ok(declaration)
    }

    /// Build the field descriptors, checking each key against the mode
    pub fn descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        self.fields
            .iter()
            .map(|field| field.to_descriptor(self.config.mode))
            .collect()
    }

    /// Build the field map for the declared addressing mode
    pub fn field_map(&self) -> Result<Arc<dyn FieldMap>> {
        self.config.validate()?;
        let descriptors = self.descriptors()?;

        let map: Arc<dyn FieldMap> = match self.config.mode {
            AddressingMode::ByPosition => Arc::new(PositionFieldMap::from_descriptors(descriptors)?),
            AddressingMode::ByName => Arc::new(NameFieldMap::from_descriptors(descriptors)?),
        };
        Ok(map)
    }
}

impl FieldDeclaration {
    fn to_descriptor(&self, mode: AddressingMode) -> Result<FieldDescriptor> {
        let key = match (mode, &self.position, &self.header, &self.pattern) {
            (AddressingMode::ByPosition, Some(position), None, None) => {
                AddressingKey::position(*position)
            }
            (AddressingMode::ByName, None, Some(header), None) => AddressingKey::name(header),
            (AddressingMode::ByName, None, None, Some(pattern)) => AddressingKey::pattern(pattern)?,
            _ => {
                return Err(Error::configuration(format!(
                    "field '{}' must declare exactly one {} key",
                    self.field,
                    match mode {
                        AddressingMode::ByPosition => "position",
                        AddressingMode::ByName => "header or pattern",
                    }
                )));
            }
        };

        let kind = FieldKind::from_tag(&self.kind);
        let mut descriptor = FieldDescriptor::new(self.field.clone(), key, kind.clone());
        if self.required {
            descriptor = descriptor.required();
        }
        if self.multivalued {
            descriptor = descriptor.multivalued();
        }

        if kind.tag() == DATETIME_KIND {
            let format = self.format.as_deref().ok_or_else(|| {
                Error::configuration(format!(
                    "datetime field '{}' must declare a format",
                    self.field
                ))
            })?;
            descriptor = descriptor.with_converter(Arc::new(DateTimeConverter::new(format)));
        } else if self.format.is_some() {
            return Err(Error::configuration(format!(
                "field '{}' declares a format but is not a datetime field",
                self.field
            )));
        }

        Ok(descriptor)
    }
}
