//! Storage-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use dummysensor_domain::error::DummySensorError;

/// Errors originating from the file storage layer.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Reading, writing or renaming a file failed.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record is not valid JSON and parse errors are not forgiven.
    #[error("corrupted record {path}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode record")]
    Encode(#[source] serde_json::Error),
}

impl From<FileStoreError> for DummySensorError {
    fn from(err: FileStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_storage_error() {
        let err = FileStoreError::Io {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::other("boom"),
        };
        let err: DummySensorError = err.into();
        assert!(matches!(err, DummySensorError::Storage(_)));
    }

    #[test]
    fn should_display_path() {
        let err = FileStoreError::Io {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(err.to_string(), "failed to access /tmp/x");
    }
}
