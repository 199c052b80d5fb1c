//! Marketplace catalog access
//!
//! Queries the gallery `extensionquery` endpoint, flattens the response into
//! [`ExtensionSummary`] values and ranks them by popularity.

pub mod client;
pub mod endpoints;
pub mod rank;
pub mod schema;
pub mod summary;

pub use client::CatalogClient;
pub use rank::{MAX_RESULTS, score, top_ranked};
pub use summary::ExtensionSummary;
