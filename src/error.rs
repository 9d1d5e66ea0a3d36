use thiserror::Error;

/// Core error type for columnar sequence operations
#[derive(Error, Debug)]
pub enum ColseqError {
    /// The path could not be opened as a columnar file
    #[error("Open error: {0}")]
    Open(String),

    /// The named column is not declared by the file's schema
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Use of a cursor, reader, or writer after it was closed
    #[error("Closed resource: {0}")]
    Closed(String),

    /// Invalid or duplicate writer schema declarations
    #[error("Schema error: {0}")]
    Schema(String),

    /// A row's key set does not match the writer schema
    #[error("Row shape error: {0}")]
    RowShape(String),

    /// A value's runtime type is incompatible with its declared column type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Unclassified failure surfaced verbatim from the native engine
    #[error("Native engine error: {0}")]
    Engine(String),
}

/// Result type alias for columnar sequence operations
pub type Result<T> = std::result::Result<T, ColseqError>;

impl ColseqError {
    /// Create a new open error
    pub fn open<S: Into<String>>(msg: S) -> Self {
        ColseqError::Open(msg.into())
    }

    /// Create a new unknown-column error
    pub fn unknown_column<S: Into<String>>(msg: S) -> Self {
        ColseqError::UnknownColumn(msg.into())
    }

    /// Create a new closed-resource error
    pub fn closed<S: Into<String>>(msg: S) -> Self {
        ColseqError::Closed(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        ColseqError::Schema(msg.into())
    }

    /// Create a new row-shape error
    pub fn row_shape<S: Into<String>>(msg: S) -> Self {
        ColseqError::RowShape(msg.into())
    }

    /// Create a new type-mismatch error
    pub fn type_mismatch<S: Into<String>>(msg: S) -> Self {
        ColseqError::TypeMismatch(msg.into())
    }

    /// Create a new native engine error
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        ColseqError::Engine(msg.into())
    }
}
