//! Flattened view of one marketplace extension.

use serde::{Deserialize, Serialize};

use super::schema::GalleryExtension;
use crate::error::{Result, VsxmError};
use crate::install::InstallRequest;

pub const STAT_INSTALL: &str = "install";
pub const STAT_AVERAGE_RATING: &str = "averagerating";

/// Highest rating the marketplace hands out
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSummary {
    pub publisher_id: String,
    pub extension_id: String,
    pub display_name: String,
    pub latest_version: String,
    pub description: String,
    pub install_count: u64,
    /// In `[0, 5]`; 0 when the marketplace reports no rating
    pub average_rating: f64,
}

impl ExtensionSummary {
    /// The identifiers needed to install this extension's latest version.
    pub fn install_request(&self) -> InstallRequest {
        InstallRequest::new(
            self.publisher_id.clone(),
            self.extension_id.clone(),
            self.latest_version.clone(),
        )
    }
}

impl TryFrom<GalleryExtension> for ExtensionSummary {
    type Error = VsxmError;

    fn try_from(ext: GalleryExtension) -> Result<Self> {
        let latest_version = ext
            .latest_version()
            .ok_or_else(|| {
                VsxmError::remote(format!(
                    "Marketplace entry {}.{} lists no versions",
                    ext.publisher.publisher_name, ext.extension_name
                ))
            })?
            .to_string();

        let install_count = ext
            .statistic(STAT_INSTALL)
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);
        let average_rating = ext
            .statistic(STAT_AVERAGE_RATING)
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, MAX_RATING))
            .unwrap_or(0.0);

        let display_name = ext
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ext.extension_name.clone());

        Ok(Self {
            publisher_id: ext.publisher.publisher_name,
            extension_id: ext.extension_name,
            display_name,
            latest_version,
            description: ext.short_description.unwrap_or_default(),
            install_count,
            average_rating,
        })
    }
}
