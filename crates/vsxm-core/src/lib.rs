//! vsxm Core Library
//!
//! Searches the VS Code marketplace and installs extension packages into a
//! local extensions directory, exposed to a host process as two callable
//! tools.

pub mod config;
pub mod context;
pub mod error;
pub mod gallery;
pub mod install;
pub mod tools;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, MarketplaceConfig, VsxmConfig};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{Result, VsxmError};

    // Catalog
    pub use crate::gallery::{CatalogClient, ExtensionSummary};

    // Install
    pub use crate::install::{InstallRequest, PackageInstaller};

    // Tools
    pub use crate::tools::{ExtensionTools, InstallPayload, SearchPayload, ToolDescriptor};
}
