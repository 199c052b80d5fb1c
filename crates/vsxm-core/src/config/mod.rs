//! Configuration management
//!
//! vsxm reads a single optional `vsxm.toml` from the user config directory.
//! Values can be overridden by `VSXM_*` environment variables and, in the
//! CLI, by command-line flags.

pub mod parser;
pub mod schema;
pub mod store;

pub use schema::{MarketplaceConfig, VsxmConfig, default_extensions_dir};
pub use store::ConfigStore;
