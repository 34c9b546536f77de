use polars::prelude::PolarsError;
use thiserror::Error;

/// Raised when an identifier cannot be built from the given fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identifier kind must not be empty")]
    EmptyKind,

    #[error("identifier value must not be empty")]
    EmptyValue,

    #[error("identifier kind {kind:?} contains reserved character {reserved:?}")]
    ReservedInKind { kind: String, reserved: char },

    #[error("identifier value {value:?} contains reserved character {reserved:?}")]
    ReservedInValue { value: String, reserved: char },
}

/// Raised when a canonical identifier or pair string is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing '::' delimiter in identifier {input:?}")]
    MissingDelimiter { input: String },

    #[error("expected exactly two identifiers separated by '$' in {input:?}, found {found}")]
    PairArity { input: String, found: usize },

    #[error("invalid identifier {input:?}: {source}")]
    InvalidIdentifier {
        input: String,
        #[source]
        source: ValidationError,
    },
}

#[derive(Error, Debug)]
pub enum NodeGroupError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unsupported cell in column {column} at row {row}: {kind}")]
    UnsupportedCell {
        column: String,
        row: usize,
        kind: String,
    },

    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, NodeGroupError>;
