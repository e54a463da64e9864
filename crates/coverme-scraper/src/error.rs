//! Errors raised inside the scrape pipeline.
//!
//! These never reach pipeline callers; they are folded into a
//! [`coverme_core::ScrapeResult`] before the pipeline returns.

use crate::heuristics::AUTH_FAILURE_KEYWORDS;
use coverme_browser::BrowserError;
use thiserror::Error;

/// Pipeline error.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Browser launch, navigation, snapshot or protocol failure
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A heuristic table entry is not a valid CSS selector
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The offending selector text
        selector: String,
        /// Parser message
        reason: String,
    },
}

impl ScrapeError {
    /// Guess whether the failure was caused by the site refusing access.
    ///
    /// Matches the error text against [`AUTH_FAILURE_KEYWORDS`]. A browser
    /// that never launched never reached the site, so it is not auth-related.
    #[must_use]
    pub fn is_likely_auth_failure(&self) -> bool {
        if let Self::Browser(err) = self {
            if err.is_launch_failure() {
                return false;
            }
        }

        let message = self.to_string().to_lowercase();
        AUTH_FAILURE_KEYWORDS
            .iter()
            .any(|keyword| message.contains(keyword))
    }
}

/// Result type alias using `ScrapeError`.
pub type Result<T> = std::result::Result<T, ScrapeError>;
