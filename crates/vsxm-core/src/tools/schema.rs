//! Tool descriptors and result payloads exchanged with the host.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::VsxmError;
use crate::gallery::ExtensionSummary;
use crate::install::InstallRequest;

pub const SEARCH_EXTENSIONS: &str = "search_extensions";
pub const INSTALL_EXTENSION: &str = "install_extension";

/// Kind reported when the host sends arguments we cannot use.
pub const INVALID_ARGUMENT: &str = "invalid_argument";

/// Name, description and JSON schema of one callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Descriptors for every tool [`super::ExtensionTools`] can dispatch.
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: SEARCH_EXTENSIONS.to_string(),
            description: "Search the VS Code marketplace and return the five most popular matches"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search terms"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDescriptor {
            name: INSTALL_EXTENSION.to_string(),
            description: "Install a VS Code extension in Cursor".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "publisher": {
                        "type": "string",
                        "description": "The publisher of the extension"
                    },
                    "extension": {
                        "type": "string",
                        "description": "The name of the extension"
                    },
                    "version": {
                        "type": "string",
                        "description": "The version of the extension"
                    }
                },
                "required": ["publisher", "extension", "version"]
            }),
        },
    ]
}

/// Arguments for `install_extension`, echoed back with every search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallCommand {
    pub publisher_id: String,
    pub extension_id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionEntry {
    pub publisher_id: String,
    pub extension_id: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
    pub install_count: u64,
    pub average_rating: f64,
    pub install_command: InstallCommand,
}

impl From<InstallRequest> for InstallCommand {
    fn from(request: InstallRequest) -> Self {
        Self {
            publisher_id: request.publisher_id,
            extension_id: request.extension_id,
            version: request.version,
        }
    }
}

impl From<ExtensionSummary> for ExtensionEntry {
    fn from(summary: ExtensionSummary) -> Self {
        let install_command = InstallCommand::from(summary.install_request());
        Self {
            publisher_id: summary.publisher_id,
            extension_id: summary.extension_id,
            display_name: summary.display_name,
            version: summary.latest_version,
            description: summary.description,
            install_count: summary.install_count,
            average_rating: summary.average_rating,
            install_command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub success: bool,
    pub extensions: Vec<ExtensionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl SearchPayload {
    pub fn found(query: &str, summaries: Vec<ExtensionSummary>) -> Self {
        let message = format!(
            "Found {} extension(s) matching '{}'",
            summaries.len(),
            query
        );
        Self {
            success: true,
            extensions: summaries.into_iter().map(ExtensionEntry::from).collect(),
            message: Some(message),
            error_kind: None,
        }
    }

    pub fn failed(kind: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            extensions: Vec::new(),
            message: Some(message.into()),
            error_kind: Some(kind.to_string()),
        }
    }

    pub fn from_error(err: &VsxmError) -> Self {
        Self::failed(
            err.kind(),
            format!("Error searching extensions: {}", err),
        )
    }
}

/// `path` is always serialized; `null` signals failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPayload {
    pub success: bool,
    pub message: String,
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl InstallPayload {
    pub fn installed(display_id: &str, path: String) -> Self {
        Self {
            success: true,
            message: format!(
                "Extension {} installed successfully at {}",
                display_id, path
            ),
            path: Some(path),
            error_kind: None,
        }
    }

    pub fn failed(kind: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            path: None,
            error_kind: Some(kind.to_string()),
        }
    }

    /// Validation failures keep their own message; download and I/O
    /// failures get the install prefix.
    pub fn from_error(err: &VsxmError) -> Self {
        let message = match err {
            VsxmError::Validation { .. } | VsxmError::InvalidArgument { .. } => err.to_string(),
            _ => format!("Error installing extension: {}", err),
        };
        Self::failed(err.kind(), message)
    }
}
