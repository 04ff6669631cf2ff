use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidCoordinate(String),
    InvalidRemoteUrl(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidCoordinate(msg) => {
                write!(f, "invalid coordinate: {msg}")
            }
            ModelError::InvalidRemoteUrl(msg) => {
                write!(f, "invalid remote url: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
