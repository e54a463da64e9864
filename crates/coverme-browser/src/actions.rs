use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rendered state of a page after navigation settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// URL the page ended on, after any redirects
    pub final_url: String,
    /// Serialized DOM of the page
    pub html: String,
}

/// Starts browser sessions.
#[async_trait::async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Session type produced by this launcher
    type Session: BrowserSession;

    /// Launch a fresh browser with an isolated context and a blank page
    async fn launch(&self) -> Result<Self::Session>;
}

/// Browser actions for one scrape
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Navigate to a URL, waiting for DOM content to load but no longer than `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Capture the current URL and rendered DOM
    async fn snapshot(&mut self) -> Result<PageSnapshot>;

    /// Shut the browser down. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
