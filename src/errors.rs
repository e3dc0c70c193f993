use thiserror::Error;

use crate::calculation::RowHandle;

pub type Result<T> = std::result::Result<T, CalcError>;

/// Error type shared by the calculation, storage, and sync layers.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Malformed calculation record: {0}")]
    MalformedRecord(String),
    #[error("Row not found: {0}")]
    RowNotFound(RowHandle),
    #[error("Invalid calculation name `{0}`")]
    InvalidName(String),
    #[error("Calculation `{0}` not found")]
    CalculationNotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Could not encode calculation: {0}")]
    Serialization(String),
    #[error("Remote sync error: {0}")]
    Remote(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Storage(err.to_string())
    }
}

impl CalcError {
    /// True for failures caused by the content of a calculation file.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CalcError::MalformedRecord(_))
    }
}
