//! Package installation
//!
//! Downloads a package version from the marketplace, decompresses it into
//! the extensions directory and checks the result.

pub mod installer;
pub mod request;
pub mod validate;

pub use installer::PackageInstaller;
pub use request::InstallRequest;
pub use validate::{MIN_ARTIFACT_BYTES, check_artifact, validate};
