use thiserror::Error;

/// Failures a correlator reports as plain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelatorError {
    #[error("no experience record with id {id}")]
    NotFound { id: String },
}

impl CorrelatorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CorrelatorError>;
