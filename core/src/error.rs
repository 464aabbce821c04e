use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreatError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ThreatResult<T> = Result<T, ThreatError>;
