//! Shared types used across CoverMe.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Outcome of scraping one job posting.
///
/// Serializes as `{ "content": ..., "hasAuthIssue": ..., "error"?: ... }`.
/// Fields are private so that non-empty content can never be paired with an
/// auth issue; build values through the named constructors. Deserializing
/// rejects JSON that pairs the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawScrapeResult")]
pub struct ScrapeResult {
    content: String,
    has_auth_issue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Unchecked wire form of [`ScrapeResult`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScrapeResult {
    content: String,
    has_auth_issue: bool,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawScrapeResult> for ScrapeResult {
    type Error = CoreError;

    fn try_from(raw: RawScrapeResult) -> Result<Self, Self::Error> {
        if raw.has_auth_issue && !raw.content.is_empty() {
            return Err(CoreError::ConflictingScrapeResult);
        }
        Ok(Self {
            content: raw.content,
            has_auth_issue: raw.has_auth_issue,
            error: raw.error,
        })
    }
}

impl ScrapeResult {
    /// Posting text was extracted and no auth wall was seen.
    #[must_use]
    pub fn extracted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            has_auth_issue: false,
            error: None,
        }
    }

    /// The posting sits behind an authentication wall.
    #[must_use]
    pub fn auth_required(reason: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            has_auth_issue: true,
            error: Some(reason.into()),
        }
    }

    /// The scrape failed; `has_auth_issue` records whether the failure looks auth-related.
    #[must_use]
    pub fn failed(error: impl Into<String>, has_auth_issue: bool) -> Self {
        Self {
            content: String::new(),
            has_auth_issue,
            error: Some(error.into()),
        }
    }

    /// Attach a diagnostic message without changing the outcome.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Extracted posting text; empty unless the scrape succeeded.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the posting is gated behind a login.
    #[must_use]
    pub fn has_auth_issue(&self) -> bool {
        self.has_auth_issue
    }

    /// Diagnostic message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when there is posting text to hand to the prompt builder.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// The job-link field of a cover letter request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobLink {
    /// Write a general-purpose letter; nothing to scrape.
    General,
    /// A posting to scrape.
    Posting(Url),
}

impl JobLink {
    /// Classify user input as "general" (any case) or an absolute URL.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidJobLink`] when the trimmed input is neither.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("general") {
            return Ok(Self::General);
        }

        Url::parse(trimmed)
            .map(Self::Posting)
            .map_err(|_| CoreError::InvalidJobLink {
                input: trimmed.to_string(),
            })
    }

    /// Whether this is the "general" sentinel.
    #[must_use]
    pub fn is_general(&self) -> bool {
        matches!(self, Self::General)
    }

    /// The posting URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::General => None,
            Self::Posting(url) => Some(url),
        }
    }
}

impl fmt::Display for JobLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Posting(url) => write!(f, "{url}"),
        }
    }
}
