//! Catalog client for the marketplace search endpoint.

use std::time::Duration;

use url::Url;

use super::endpoints;
use super::rank;
use super::schema::{ACCEPT_HEADER, QueryRequest, QueryResponse};
use super::summary::ExtensionSummary;
use crate::error::{Result, VsxmError};

/// Searches the marketplace and ranks the hits by popularity.
///
/// Stateless apart from its configuration; clones share the underlying
/// connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    search_url: Url,
    page_size: u32,
    timeout: Option<Duration>,
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, base_url: &Url, page_size: u32) -> Result<Self> {
        Ok(Self {
            http,
            search_url: endpoints::search_url(base_url)?,
            page_size: page_size.max(1),
            timeout: None,
        })
    }

    /// Cap the total duration of each search request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Run one free-text query and return at most [`rank::MAX_RESULTS`]
    /// extensions, best first.
    ///
    /// # Errors
    ///
    /// Returns [`VsxmError::Remote`] if the request fails, the marketplace
    /// answers with a non-success status, or the body does not have the
    /// expected shape. Nothing is retried.
    pub async fn search(&self, query: &str) -> Result<Vec<ExtensionSummary>> {
        let body = QueryRequest::text_search(query, self.page_size);

        tracing::debug!(url = %self.search_url, query, "querying marketplace");

        let mut request = self
            .http
            .post(self.search_url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .json(&body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                VsxmError::remote(format!(
                    "Failed to query marketplace at {}: {}",
                    self.search_url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VsxmError::remote(format!(
                "Marketplace search failed: HTTP {}",
                status
            )));
        }

        let payload: QueryResponse = response.json().await.map_err(|e| {
            VsxmError::remote(format!("Failed to parse marketplace response: {}", e))
        })?;

        let summaries = payload
            .into_extensions()?
            .into_iter()
            .map(ExtensionSummary::try_from)
            .collect::<Result<Vec<_>>>()?;
        let candidates = summaries.len();

        let ranked = rank::top_ranked(summaries);

        tracing::info!(query, candidates, returned = ranked.len(), "marketplace search complete");

        Ok(ranked)
    }
}
