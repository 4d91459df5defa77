//! Session configuration and validation.
//!
//! Provides the configuration that accompanies a mapping declaration:
//! how columns are addressed, whether the source has a header row, and
//! how strictly row lengths are checked against that header.

use crate::app::models::AddressingMode;
use crate::constants::{DEFAULT_HAS_HEADER, DEFAULT_VERIFY_LINE_LENGTH};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for one binding session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// How incoming columns are matched to fields
    pub mode: AddressingMode,

    /// The first row of the source is a header row
    pub has_header: bool,

    /// Reject rows whose length differs from the captured header
    pub verify_line_length: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            mode: AddressingMode::ByName,
            has_header: DEFAULT_HAS_HEADER,
            verify_line_length: DEFAULT_VERIFY_LINE_LENGTH,
        }
    }
}

impl BindConfig {
    /// Configuration for header-less, position-addressed sources
    pub fn by_position() -> Self {
        Self {
            mode: AddressingMode::ByPosition,
            has_header: false,
            verify_line_length: false,
        }
    }

    /// Configuration for header-bearing, name-addressed sources
    pub fn by_name() -> Self {
        Self::default()
    }

    /// Builder-style toggle for the header row flag
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Builder-style toggle for line-length verification
    pub fn with_line_length_check(mut self, verify: bool) -> Self {
        self.verify_line_length = verify;
        self
    }

    /// Check that the settings are consistent with each other
    pub fn validate(&self) -> Result<()> {
        if self.mode == AddressingMode::ByName && !self.has_header {
            return Err(Error::configuration(
                "name-addressed mapping requires a source with a header row",
            ));
        }
        if self.verify_line_length && !self.has_header {
            return Err(Error::configuration(
                "line length verification requires a header row",
            ));
        }

        debug!("Validated bind configuration: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BindConfig::default();
        assert_eq!(config.mode, AddressingMode::ByName);
        assert!(config.has_header);
        assert!(!config.verify_line_length);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_by_name_without_header_is_rejected() {
        let config = BindConfig::by_name().with_header(false);
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_position_config_may_skip_header() {
        let config = BindConfig::by_position().with_header(true);
        assert!(config.validate().is_ok());
        assert!(BindConfig::by_position().validate().is_ok());
    }

    #[test]
    fn test_line_length_check_needs_header() {
        let config = BindConfig::by_position().with_line_length_check(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: BindConfig = serde_json::from_str(r#"{"mode":"by_position"}"#).unwrap();
        assert_eq!(config.mode, AddressingMode::ByPosition);
        assert!(config.has_header);
        assert!(!config.verify_line_length);
    }
}
