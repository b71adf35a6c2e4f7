//! Error types for step compilation and scroll binding.

use thiserror::Error;

/// Result type for relax operations.
pub type Result<T> = std::result::Result<T, RelaxError>;

/// Errors raised while registering animations or binding to a scroll source.
///
/// Every variant except `NoScrollSource` is a configuration error: it is
/// detected when steps are added, never during `render`.
#[derive(Error, Debug)]
pub enum RelaxError {
    /// Two steps resolve to the same position.
    #[error("duplicate step position {0}")]
    DuplicatePosition(i64),

    /// Two adjacent positions are too far apart to measure.
    #[error("distance between step positions {start} and {end} is out of range")]
    PositionRange { start: i64, end: i64 },

    /// A steps document key has no leading integer.
    #[error("invalid step position {0:?}")]
    InvalidPosition(String),

    /// A property value in a steps document is neither a string nor a number.
    #[error("invalid value for property {property:?} at position {position}")]
    InvalidValue { position: i64, property: String },

    /// Start and end values carry different numbers of numeric tokens.
    #[error(
        "property {property:?} between positions {start} and {end} has {start_tokens} numeric tokens at the start but {end_tokens} at the end"
    )]
    TokenCountMismatch {
        property: String,
        start: i64,
        end: i64,
        start_tokens: usize,
        end_tokens: usize,
    },

    /// The steps document is not valid JSON or not an object of objects.
    #[error("invalid steps document: {0}")]
    Json(#[from] serde_json::Error),

    /// None of the candidate scroll sources is available.
    #[error("no scroll source available")]
    NoScrollSource,
}
