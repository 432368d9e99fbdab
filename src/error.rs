use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the upload library.
///
/// `Configuration` is raised before any file is enumerated. `Read`, `Encoding`
/// and `Put` belong to a single candidate; the pipeline records them and keeps
/// draining the queue, and the first one observed becomes the batch error.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to enumerate files under {}: {source}", root.display())]
    Enumeration {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to gzip {key}: {source}")]
    Encoding {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to put s3://{bucket}/{key}: {reason}")]
    Put {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("upload worker failed: {0}")]
    Worker(String),
}

impl UploadError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        UploadError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_error_message_names_object() {
        let err = UploadError::Put {
            bucket: "site".to_string(),
            key: "index.html".to_string(),
            reason: "AccessDenied".to_string(),
        };
        assert_eq!(err.to_string(), "failed to put s3://site/index.html: AccessDenied");
    }

    #[test]
    fn test_configuration_error_message() {
        let err = UploadError::config("\"bucket\" is a required parameter");
        assert!(err.to_string().contains("bucket"));
    }
}
