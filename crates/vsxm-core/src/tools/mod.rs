//! Host-facing tool surface
//!
//! Exposes `search_extensions` and `install_extension` as callable tools.
//! Every call resolves to a JSON payload with a `success` flag; errors from
//! the catalog client or installer are folded into that payload and never
//! returned to the host.

pub mod schema;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::VsxmError;
use crate::gallery::CatalogClient;
use crate::install::{InstallRequest, PackageInstaller, check_artifact};

pub use schema::{
    ExtensionEntry, INSTALL_EXTENSION, INVALID_ARGUMENT, InstallCommand, InstallPayload,
    SEARCH_EXTENSIONS, SearchPayload, ToolDescriptor, descriptors,
};

/// The two marketplace tools, wired to their backing components.
#[derive(Debug, Clone)]
pub struct ExtensionTools {
    catalog: CatalogClient,
    installer: PackageInstaller,
}

impl ExtensionTools {
    pub fn new(catalog: CatalogClient, installer: PackageInstaller) -> Self {
        Self { catalog, installer }
    }

    /// `search_extensions(query)`
    pub async fn search_extensions(&self, query: &str) -> SearchPayload {
        let query = query.trim();
        if query.is_empty() {
            return SearchPayload::failed(INVALID_ARGUMENT, "Missing required argument: query");
        }

        match self.catalog.search(query).await {
            Ok(summaries) => SearchPayload::found(query, summaries),
            Err(err) => {
                tracing::warn!(query, error = %err, "search_extensions failed");
                SearchPayload::from_error(&err)
            }
        }
    }

    /// `install_extension(publisher, extension, version)`
    ///
    /// Installs, then applies the size check. A too-small artifact is
    /// reported as a validation failure with no path.
    pub async fn install_extension(
        &self,
        publisher: &str,
        extension: &str,
        version: &str,
    ) -> InstallPayload {
        let request = InstallRequest::new(publisher.trim(), extension.trim(), version.trim());

        match self.install_and_check(&request).await {
            Ok(path) => InstallPayload::installed(&request.display_id(), path),
            Err(err) => {
                tracing::warn!(
                    package = %request.display_id(),
                    error = %err,
                    "install_extension failed"
                );
                InstallPayload::from_error(&err)
            }
        }
    }

    async fn install_and_check(&self, request: &InstallRequest) -> Result<String, VsxmError> {
        let path = self.installer.install(request).await?;
        check_artifact(&path).await?;
        Ok(path.display().to_string())
    }

    /// Dispatch a tool call by name with JSON arguments.
    ///
    /// Unknown tools and missing or non-string arguments produce a failure
    /// payload rather than an error.
    pub async fn call(&self, name: &str, arguments: &Value) -> Value {
        match name {
            SEARCH_EXTENSIONS => match string_args(arguments, &["query"]) {
                Ok(args) => to_payload(self.search_extensions(&args[0]).await),
                Err(message) => to_payload(SearchPayload::failed(INVALID_ARGUMENT, message)),
            },
            INSTALL_EXTENSION => {
                match string_args(arguments, &["publisher", "extension", "version"]) {
                    Ok(args) => {
                        to_payload(self.install_extension(&args[0], &args[1], &args[2]).await)
                    }
                    Err(message) => to_payload(InstallPayload::failed(INVALID_ARGUMENT, message)),
                }
            }
            other => json!({
                "success": false,
                "message": format!("Unknown tool: {}", other),
                "errorKind": INVALID_ARGUMENT,
            }),
        }
    }
}

/// Pull the named string fields out of a JSON object, in order.
fn string_args(arguments: &Value, names: &[&str]) -> Result<Vec<String>, String> {
    let object = arguments
        .as_object()
        .ok_or_else(|| "Tool arguments must be a JSON object".to_string())?;

    names
        .iter()
        .map(|name| match object.get(*name) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(format!("Argument '{}' must be a string", name)),
            None => Err(format!("Missing required argument: {}", name)),
        })
        .collect()
}

fn to_payload<T: Serialize>(payload: T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|e| {
        json!({
            "success": false,
            "message": format!("Failed to serialize tool result: {}", e),
        })
    })
}
