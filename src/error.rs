use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpineError {
    /// A handle the contact graph never issued.
    #[error("spine handle {0} is not registered in the contact graph")]
    UnknownSpine(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SpineError>;
