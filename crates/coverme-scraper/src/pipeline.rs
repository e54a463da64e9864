//! Scrape pipeline for a single job posting.
//!
//! This module provides the `ScrapePipeline` which pre-screens the URL,
//! drives one browser session through navigation and auth detection,
//! extracts the posting text, and always shuts the browser down.

use crate::detect::detect_auth;
use crate::error::{Result, ScrapeError};
use crate::extract::extract_content;
use crate::heuristics::Heuristics;
use crate::prescreen::check_url_for_auth_issues;
use coverme_browser::{BrowserLauncher, BrowserSession, PageSnapshot};
use coverme_core::{JobLink, ScrapeResult, ScraperConfig};
use scraper::Html;
use tracing::{debug, info, warn};

/// Reported when the URL pattern alone shows the posting needs a login.
pub const URL_PATTERN_AUTH_MESSAGE: &str =
    "Authentication required to access job content (detected via URL pattern)";

/// Reported when the rendered page shows an auth wall.
pub const PAGE_AUTH_MESSAGE: &str = "Authentication required to access job content";

/// Reported when the page loaded but held no text.
pub const NO_CONTENT_MESSAGE: &str = "No readable content found on page";

/// Fetches job postings, one browser per call.
pub struct ScrapePipeline<L> {
    /// Starts a fresh browser for every scrape
    launcher: L,
    /// Compiled detection and extraction tables
    heuristics: Heuristics,
    /// Timeouts and length bounds
    config: ScraperConfig,
}

impl<L: BrowserLauncher> ScrapePipeline<L> {
    /// Create a pipeline with the built-in heuristic tables.
    #[must_use]
    pub fn new(launcher: L, config: ScraperConfig) -> Self {
        Self {
            launcher,
            heuristics: Heuristics::default(),
            config,
        }
    }

    /// Replace the heuristic tables.
    #[must_use]
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Scrape the posting behind a job link.
    ///
    /// Returns `None` for a general cover letter, which has nothing to fetch.
    pub async fn scrape_job_link(&self, link: &JobLink) -> Option<ScrapeResult> {
        match link {
            JobLink::General => {
                debug!("General cover letter requested, skipping scrape");
                None
            }
            JobLink::Posting(url) => Some(self.scrape_job_content(url.as_str()).await),
        }
    }

    /// Fetch a job posting and return its text or an auth verdict.
    ///
    /// Never fails: launch, navigation and protocol errors are folded into
    /// the returned [`ScrapeResult`]. The browser is closed before returning.
    pub async fn scrape_job_content(&self, url: &str) -> ScrapeResult {
        if check_url_for_auth_issues(url) {
            info!("Skipping browser for {}: known auth-walled URL pattern", url);
            return ScrapeResult::auth_required(URL_PATTERN_AUTH_MESSAGE);
        }

        info!("Scraping job posting {}", url);

        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => return Self::recover(url, &ScrapeError::from(e)),
        };

        let outcome = self.visit(&mut session, url).await;

        if let Err(e) = session.close().await {
            warn!("Error closing browser: {}", e);
        }

        match outcome {
            Ok(snapshot) => self.analyze(url, &snapshot),
            Err(e) => Self::recover(url, &e),
        }
    }

    /// Navigate, let client-side rendering settle, and capture the page.
    async fn visit(&self, session: &mut L::Session, url: &str) -> Result<PageSnapshot> {
        session
            .navigate(url, self.config.navigation_timeout())
            .await?;
        tokio::time::sleep(self.config.settle_delay()).await;
        Ok(session.snapshot().await?)
    }

    /// Run auth detection and extraction on a captured page.
    fn analyze(&self, url: &str, snapshot: &PageSnapshot) -> ScrapeResult {
        let document = Html::parse_document(&snapshot.html);

        let signal = detect_auth(url, &snapshot.final_url, &document, &self.heuristics);
        if signal.is_gated() {
            info!(
                "Auth wall detected for {} ({})",
                url,
                signal.reasons().join(", ")
            );
            return ScrapeResult::auth_required(PAGE_AUTH_MESSAGE);
        }

        let content = extract_content(&document, &self.heuristics, &self.config);
        info!(
            "Extracted {} characters from {}",
            content.chars().count(),
            url
        );

        if content.is_empty() {
            ScrapeResult::extracted(content).with_error(NO_CONTENT_MESSAGE)
        } else {
            ScrapeResult::extracted(content)
        }
    }

    /// Turn a pipeline error into a result, guessing whether it was an auth wall.
    fn recover(url: &str, error: &ScrapeError) -> ScrapeResult {
        warn!("Job scraping error for {}: {}", url, error);

        let has_auth_issue = check_url_for_auth_issues(url) || error.is_likely_auth_failure();
        ScrapeResult::failed(error.to_string(), has_auth_issue)
    }
}
