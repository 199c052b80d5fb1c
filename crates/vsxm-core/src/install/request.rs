//! The (publisher, extension, version) triple identifying a package.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VsxmError};

/// Caller-supplied identifiers for one package version.
///
/// The version is never inferred: callers pick it, usually from a search
/// result's `installCommand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub publisher_id: String,
    pub extension_id: String,
    pub version: String,
}

impl InstallRequest {
    pub fn new(
        publisher_id: impl Into<String>,
        extension_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher_id: publisher_id.into(),
            extension_id: extension_id.into(),
            version: version.into(),
        }
    }

    /// Reject identifiers that are empty or could escape the extensions
    /// directory once embedded in a file name.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("publisher", &self.publisher_id),
            ("extension", &self.extension_id),
            ("version", &self.version),
        ] {
            if value.trim().is_empty() {
                return Err(VsxmError::invalid_argument(format!(
                    "Missing required argument: {field}"
                )));
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(VsxmError::invalid_argument(format!(
                    "Invalid {field} '{value}': must not contain path separators"
                )));
            }
        }
        Ok(())
    }

    /// `<publisher>.<extension>-<version>`, the stem shared by the
    /// temporary and final file names.
    pub fn artifact_stem(&self) -> String {
        format!(
            "{}.{}-{}",
            self.publisher_id, self.extension_id, self.version
        )
    }

    /// File name of the installed package.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.vsix", self.artifact_stem())
    }

    /// `publisher.extension@version`, used in user-facing messages.
    pub fn display_id(&self) -> String {
        format!(
            "{}.{}@{}",
            self.publisher_id, self.extension_id, self.version
        )
    }
}
