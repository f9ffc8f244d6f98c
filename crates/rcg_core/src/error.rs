use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported log version: {0}")]
    UnsupportedVersion(u8),

    #[error("Bad log header: {0}")]
    BadHeader(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Missing required parameter '{key}' in ({message} ...)")]
    MissingParam { key: &'static str, message: &'static str },

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RcgError {
    /// Whether the failure is scoped to a single record.
    ///
    /// A caller seeing a recoverable error may skip the record and keep
    /// consuming the stream; unrecoverable errors poison the whole parse.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RcgError::Io(_) => false,
            RcgError::UnsupportedVersion(_) => false,
            RcgError::BadHeader(_) => false,
            RcgError::MalformedRecord(_) => true,
            RcgError::MissingParam { .. } => true,
            RcgError::InvalidValue { .. } => true,
            RcgError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RcgError>;
