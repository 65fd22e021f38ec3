use thiserror::Error;

/// Configuration-time errors. Row queries never fail; see [`TreeRowFilter::accepts`].
///
/// [`TreeRowFilter::accepts`]: crate::TreeRowFilter::accepts
#[derive(Debug, Error)]
pub enum FilterError {
    /// The regular expression could not be compiled.
    #[error("invalid filter pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// Two rows reachable from the root report the same row key.
    #[error("row key {key} is shared by more than one row")]
    DuplicateRowKey { key: String },
}
