//! Wire types for the marketplace `extensionquery` endpoint
//!
//! Only the fields vsxm reads are modelled; everything else in the response
//! is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VsxmError};

/// `Accept` header value the gallery API expects
pub const ACCEPT_HEADER: &str = "application/json;api-version=3.0-preview.1";

/// Restrict results to VS Code extensions
pub const FILTER_TARGET: u32 = 8;
/// Free-text search
pub const FILTER_SEARCH_TEXT: u32 = 10;
/// Exclude extensions carrying the given flags
pub const FILTER_EXCLUDE_WITH_FLAGS: u32 = 12;

const TARGET_VSCODE: &str = "Microsoft.VisualStudio.Code";
/// `Unpublished` extension flag
const EXCLUDE_UNPUBLISHED: &str = "4096";

/// Bit flags controlling which extension fields the gallery returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryFlags(pub u32);

impl QueryFlags {
    pub const INCLUDE_FILES: Self = Self(0x2);
    pub const INCLUDE_VERSION_PROPERTIES: Self = Self(0x10);
    pub const INCLUDE_ASSET_URI: Self = Self(0x80);
    pub const INCLUDE_STATISTICS: Self = Self(0x100);
    pub const INCLUDE_LATEST_VERSION_ONLY: Self = Self(0x200);

    /// Flags used for searches: latest version plus install/rating statistics.
    pub const SEARCH: Self = Self(
        Self::INCLUDE_FILES.0
            | Self::INCLUDE_VERSION_PROPERTIES.0
            | Self::INCLUDE_ASSET_URI.0
            | Self::INCLUDE_STATISTICS.0
            | Self::INCLUDE_LATEST_VERSION_ONLY.0,
    );
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub filters: Vec<QueryFilter>,
    pub asset_types: Vec<String>,
    pub flags: QueryFlags,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    pub criteria: Vec<Criterion>,
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: u32,
    pub sort_order: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub filter_type: u32,
    pub value: String,
}

impl QueryRequest {
    /// Free-text search over VS Code extensions, first page only.
    pub fn text_search(query: &str, page_size: u32) -> Self {
        Self {
            filters: vec![QueryFilter {
                criteria: vec![
                    Criterion {
                        filter_type: FILTER_TARGET,
                        value: TARGET_VSCODE.to_string(),
                    },
                    Criterion {
                        filter_type: FILTER_SEARCH_TEXT,
                        value: query.to_string(),
                    },
                    Criterion {
                        filter_type: FILTER_EXCLUDE_WITH_FLAGS,
                        value: EXCLUDE_UNPUBLISHED.to_string(),
                    },
                ],
                page_number: 1,
                page_size,
                sort_by: 0,
                sort_order: 0,
            }],
            asset_types: Vec::new(),
            flags: QueryFlags::SEARCH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub extensions: Vec<GalleryExtension>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryExtension {
    pub publisher: GalleryPublisher,
    pub extension_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub versions: Vec<GalleryVersion>,
    #[serde(default)]
    pub statistics: Vec<GalleryStatistic>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPublisher {
    pub publisher_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryVersion {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStatistic {
    pub statistic_name: String,
    pub value: f64,
}

impl GalleryExtension {
    pub fn statistic(&self, name: &str) -> Option<f64> {
        self.statistics
            .iter()
            .find(|stat| stat.statistic_name == name)
            .map(|stat| stat.value)
    }

    /// First listed version. The gallery lists newest first; no version
    /// comparison is done here.
    pub fn latest_version(&self) -> Option<&str> {
        self.versions.first().map(|v| v.version.as_str())
    }
}

impl QueryResponse {
    /// Extensions of the first result group.
    pub fn into_extensions(self) -> Result<Vec<GalleryExtension>> {
        self.results
            .into_iter()
            .next()
            .map(|group| group.extensions)
            .ok_or_else(|| VsxmError::remote("Marketplace response contained no result groups"))
    }
}
