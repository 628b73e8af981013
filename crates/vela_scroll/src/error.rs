//! Error types for vela_scroll

use thiserror::Error;

/// Errors surfaced at bind time
///
/// Runtime conditions (element removed, double unbind) are deliberately not
/// errors; they degrade to silent no-ops. Only configuration mistakes the
/// caller can fix are reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The range's end would be reached at or before its start, for every
    /// possible element size; the binding could only animate backwards
    #[error("trigger range end resolves at or before its start: {0}")]
    InvalidRange(String),

    /// A trigger point shorthand like "top 80%" failed to parse
    #[error("unrecognized trigger point {0:?} (expected e.g. \"top 80%\")")]
    ParseTriggerPoint(String),
}

/// Result type for vela_scroll operations
pub type Result<T> = std::result::Result<T, BindError>;
