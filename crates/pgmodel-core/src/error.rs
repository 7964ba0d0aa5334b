use thiserror::Error;

/// Core error type shared across pgmodel crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or metadata provider failure.
    #[error("database error: {0}")]
    Db(String),
    /// A provider failure wrapped with the resolver phase that issued the call.
    #[error("{phase}: {source}")]
    Phase {
        phase: &'static str,
        #[source]
        source: Box<Error>,
    },
    /// The requested patterns matched no tables.
    #[error("no tables found")]
    NoTablesFound,
    /// An array column whose element type cannot be represented as a slice.
    #[error("unsupported array type: {0}")]
    UnsupportedArrayType(String),
    /// A table pattern that is not of the form `schema.table` or `schema.*`.
    #[error("invalid table pattern: {0}")]
    InvalidPattern(String),
    /// An assembled entity violates model invariants.
    #[error("invalid entity {entity}: {message}")]
    InvalidEntity { entity: String, message: String },
}

impl Error {
    /// Wrap an error with the name of the resolver phase it came from.
    pub fn in_phase(phase: &'static str, source: Error) -> Self {
        Error::Phase {
            phase,
            source: Box::new(source),
        }
    }
}

/// Convenience alias for results returned by pgmodel crates.
pub type Result<T> = std::result::Result<T, Error>;
