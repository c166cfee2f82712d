//! Error types for the font object model

use std::{io, result};

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The environment does not supply the requested operation.
    #[error("the {object}.{method} method has not been implemented by this environment")]
    NotImplemented {
        object: &'static str,
        method: &'static str,
    },

    /// A value was rejected by a normalizer.
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    /// The operation needs a parent object that has not been set.
    #[error("{0}")]
    Orphan(String),

    #[error("objects are not compatible:\n{0}")]
    Incompatible(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("UFO error: {0}")]
    Ufo(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn not_implemented(object: &'static str, method: &'static str) -> Self {
        Self::NotImplemented { object, method }
    }
}

/// Shorthand for the error returned by every hook an environment leaves unimplemented.
pub fn not_implemented<T>(object: &'static str, method: &'static str) -> Result<T> {
    Err(Error::not_implemented(object, method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_message() {
        let error = Error::not_implemented("Glyph", "removeOverlap");
        assert_eq!(
            error.to_string(),
            "the Glyph.removeOverlap method has not been implemented by this environment"
        );
    }

    #[test]
    fn test_io_conversion() {
        let error: Error = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(error, Error::Io(_)));
    }
}
