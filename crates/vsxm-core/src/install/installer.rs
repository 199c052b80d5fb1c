//! Package download, decompression, and placement.
//!
//! An install is a linear pipeline with no retries:
//! fetch → write temp → decompress to final → delete temp → return path.
//! Both transfers stream, so memory use does not depend on package size.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::request::InstallRequest;
use crate::error::{Result, VsxmError};
use crate::gallery::endpoints;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

/// Downloads marketplace packages into a single extensions directory.
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    http: reqwest::Client,
    base_url: Url,
    extensions_dir: PathBuf,
}

impl PackageInstaller {
    pub fn new(http: reqwest::Client, base_url: Url, extensions_dir: PathBuf) -> Self {
        Self {
            http,
            base_url,
            extensions_dir,
        }
    }

    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    /// Where `request` ends up once installed.
    pub fn artifact_path(&self, request: &InstallRequest) -> PathBuf {
        self.extensions_dir.join(request.artifact_file_name())
    }

    /// Create the extensions directory and its parents if missing.
    pub async fn ensure_extensions_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.extensions_dir)
            .await
            .map_err(|e| {
                VsxmError::io(
                    format!(
                        "Failed to create extensions directory {}",
                        self.extensions_dir.display()
                    ),
                    e,
                )
            })
    }

    /// Download, decompress and place one package version.
    ///
    /// Returns the path of the decompressed `.vsix`. The compressed download
    /// lives in a uniquely named temporary file next to the artifact and is
    /// removed before returning; concurrent installs of the same triple never
    /// share a temporary file. The artifact is moved into place with a rename,
    /// so a failed install never leaves a partial `.vsix` behind.
    ///
    /// # Errors
    ///
    /// - [`VsxmError::InvalidArgument`] for unusable identifiers
    /// - [`VsxmError::Remote`] for transport failures, non-success status or an
    ///   empty body
    /// - [`VsxmError::Io`] for any filesystem failure
    pub async fn install(&self, request: &InstallRequest) -> Result<PathBuf> {
        request.validate()?;
        self.ensure_extensions_dir().await?;

        let url = endpoints::download_url(&self.base_url, request)?;
        let final_path = self.artifact_path(request);

        tracing::debug!(%url, package = %request.display_id(), "downloading package");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            VsxmError::remote(format!("Failed to download extension from {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VsxmError::remote(format!(
                "Failed to download extension: HTTP {}",
                status
            )));
        }

        let temp = tempfile::Builder::new()
            .prefix(&format!("{}.vsix.", request.artifact_stem()))
            .suffix(".gz")
            .tempfile_in(&self.extensions_dir)
            .map_err(|e| {
                VsxmError::io(
                    format!(
                        "Failed to create temporary file in {}",
                        self.extensions_dir.display()
                    ),
                    e,
                )
            })?;
        let (file, temp_path) = temp.into_parts();

        let downloaded = write_body(response, tokio::fs::File::from_std(file), &temp_path).await?;
        if downloaded == 0 {
            return Err(VsxmError::remote("No response body received"));
        }

        tracing::debug!(
            bytes = downloaded,
            temp = %temp_path.display(),
            "download complete, decompressing"
        );

        let source = temp_path.to_path_buf();
        let dest = final_path.clone();
        let written = tokio::task::spawn_blocking(move || decompress_into_place(&source, &dest))
            .await
            .map_err(|e| {
                VsxmError::io("Decompression task failed", std::io::Error::other(e))
            })??;

        let temp_display = temp_path.display().to_string();
        temp_path.close().map_err(|e| {
            VsxmError::io(format!("Failed to remove temporary file {}", temp_display), e)
        })?;

        tracing::info!(
            package = %request.display_id(),
            path = %final_path.display(),
            compressed = downloaded,
            bytes = written,
            "package installed"
        );

        Ok(final_path)
    }
}

/// Stream the response body into `file`, returning the number of bytes written.
async fn write_body(
    response: reqwest::Response,
    mut file: tokio::fs::File,
    path: &Path,
) -> Result<u64> {
    let write_err = |e| VsxmError::io(format!("Failed to write {}", path.display()), e);

    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            if e.is_timeout() {
                VsxmError::remote(format!("Download stalled: no data received in time ({})", e))
            } else {
                VsxmError::remote(format!("Failed to read download body: {}", e))
            }
        })?;
        file.write_all(&chunk).await.map_err(write_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(write_err)?;

    Ok(written)
}

/// Decompress `source` into a sibling temporary file and rename it to `dest`.
///
/// Payloads that do not start with the gzip magic bytes are copied through
/// unchanged, since the gallery does not always compress packages.
fn decompress_into_place(source: &Path, dest: &Path) -> Result<u64> {
    let read_err = |e| VsxmError::io(format!("Failed to read {}", source.display()), e);

    let input = std::fs::File::open(source).map_err(read_err)?;
    let mut reader = BufReader::new(input);
    let is_gzip = reader.fill_buf().map_err(read_err)?.starts_with(&GZIP_MAGIC);

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = tempfile::Builder::new();
    builder.prefix(".vsxm-").suffix(".partial");
    // The staged file becomes the artifact; give it regular file permissions
    // (subject to umask) instead of the private temp-file mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE));
    }
    let mut staged = builder
        .tempfile_in(dir)
        .map_err(|e| {
            VsxmError::io(
                format!("Failed to create staging file in {}", dir.display()),
                e,
            )
        })?;

    let copied = if is_gzip {
        let mut decoder = flate2::bufread::MultiGzDecoder::new(reader);
        std::io::copy(&mut decoder, staged.as_file_mut())
    } else {
        std::io::copy(&mut reader, staged.as_file_mut())
    }
    .map_err(|e| {
        VsxmError::io(
            format!("Failed to decompress {}", source.display()),
            e,
        )
    })?;

    staged.persist(dest).map_err(|e| {
        VsxmError::io(format!("Failed to write {}", dest.display()), e.error)
    })?;

    Ok(copied)
}
