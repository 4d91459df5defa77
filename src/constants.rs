//! Application constants for rowbind
//!
//! This module contains the default values and literal spellings used
//! throughout the binding engine and the CLI.

// =============================================================================
// Value Literals
// =============================================================================

/// Literal written for `true` booleans and accepted (case-insensitively) on read
pub const BOOL_TRUE: &str = "true";

/// Literal written for `false` booleans and accepted (case-insensitively) on read
pub const BOOL_FALSE: &str = "false";

/// Type tag of the built-in date/time custom kind
pub const DATETIME_KIND: &str = "datetime";

/// Default chrono format for the `datetime` kind when none is declared
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Session Defaults
// =============================================================================

/// Whether a row source starts with a header row unless configured otherwise
pub const DEFAULT_HAS_HEADER: bool = true;

/// Whether row length is checked against the captured header by default
pub const DEFAULT_VERIFY_LINE_LENGTH: bool = false;

// =============================================================================
// Logging
// =============================================================================

/// Crate name used to scope the default log filter
pub const LOG_TARGET: &str = "rowbind";

/// Default log level when neither -v nor -q are given
pub const DEFAULT_LOG_LEVEL: &str = "warn";
