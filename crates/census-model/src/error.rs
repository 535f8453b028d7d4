use thiserror::Error;

#[derive(Debug, Error)]
pub enum CensusError {
    #[error("unknown geography level: {0}")]
    UnknownGeogLevel(String),
    #[error("unknown lookup role: {0}")]
    UnknownLookupRole(String),
}

pub type Result<T> = std::result::Result<T, CensusError>;
