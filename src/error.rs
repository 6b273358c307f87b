use thiserror::Error;

/// Convenient result alias for the starpaths library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A star name (or the reference origin) is absent from the catalog.
    #[error("no star named {name} in catalog")]
    NotFound { name: String },

    #[error("unknown star field: {field}")]
    UnknownField { field: String },

    #[error("missing required star field: {field}")]
    MissingField { field: &'static str },

    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("field {field} has out-of-range value {value}")]
    InvalidCoordinate { field: &'static str, value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<bincode::ErrorKind>),

    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
}
