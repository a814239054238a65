//! Filter compiler errors.

use thiserror::Error;

/// Errors raised while compiling or translating filter predicates.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A wildcard pattern could not be compiled for in-memory matching.
    #[error("invalid wildcard pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The raw pattern text.
        pattern: String,
        /// Why compilation failed.
        message: String,
    },

    /// A predicate cannot be rendered as SQL.
    #[error("filter on '{field}' cannot be translated to SQL: {reason}")]
    Untranslatable {
        /// The filtered field.
        field: String,
        /// Why translation failed.
        reason: String,
    },
}
