//! Error types for marketplace search and install operations.

use std::path::PathBuf;

/// Errors raised by the catalog client and the package installer.
///
/// The tool layer never lets these escape; it converts them into failure
/// payloads carrying [`VsxmError::kind`] and the display message.
#[derive(Debug, thiserror::Error)]
pub enum VsxmError {
    /// The marketplace answered with a failure status, no body, or a payload
    /// we could not parse. Also covers transport failures.
    #[error("{message}")]
    Remote { message: String },

    /// Filesystem failure while writing, decompressing, or removing files.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The artifact was produced but is too small to be a real package.
    #[error("Invalid VSIX file generated: {} is {size} bytes", .path.display())]
    Validation { path: PathBuf, size: u64 },

    /// Caller-supplied identifiers or arguments were rejected before any
    /// network or disk work.
    #[error("{message}")]
    InvalidArgument { message: String },
}

impl VsxmError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Stable identifier for the error category, used in tool payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Io { .. } => "io",
            Self::Validation { .. } => "validation",
            Self::InvalidArgument { .. } => "invalid_argument",
        }
    }
}

/// Result type for marketplace operations.
pub type Result<T> = std::result::Result<T, VsxmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_includes_context() {
        let err = VsxmError::io(
            "Failed to write /tmp/x.vsix",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write /tmp/x.vsix: denied");
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn validation_error_mentions_size() {
        let err = VsxmError::Validation {
            path: PathBuf::from("/tmp/a.b-1.0.0.vsix"),
            size: 12,
        };
        assert_eq!(
            err.to_string(),
            "Invalid VSIX file generated: /tmp/a.b-1.0.0.vsix is 12 bytes"
        );
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn remote_error_passes_message_through() {
        let err = VsxmError::remote("Marketplace search failed: HTTP 503");
        assert_eq!(err.to_string(), "Marketplace search failed: HTTP 503");
        assert_eq!(err.kind(), "remote");
    }
}
