//! Marketplace gallery URL construction.

use url::Url;

use crate::error::{Result, VsxmError};
use crate::install::InstallRequest;

const GALLERY_PREFIX: [&str; 3] = ["_apis", "public", "gallery"];

/// `{base}/_apis/public/gallery/extensionquery`
pub fn search_url(base: &Url) -> Result<Url> {
    gallery_url(base, &["extensionquery"])
}

/// `{base}/_apis/public/gallery/publishers/{publisher}/vsextensions/{extension}/{version}/vspackage`
///
/// Each identifier becomes one escaped path segment.
pub fn download_url(base: &Url, request: &InstallRequest) -> Result<Url> {
    gallery_url(
        base,
        &[
            "publishers",
            &request.publisher_id,
            "vsextensions",
            &request.extension_id,
            &request.version,
            "vspackage",
        ],
    )
}

fn gallery_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| VsxmError::remote(format!("Marketplace URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(GALLERY_PREFIX)
        .extend(segments);
    Ok(url)
}
