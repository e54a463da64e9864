//! Heuristic tables for auth detection and content extraction.
//!
//! The tables are plain data so they can be swapped or extended without
//! touching pipeline control flow. [`Heuristics`] is the compiled form the
//! pipeline owns.

use crate::error::{Result, ScrapeError};
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// LinkedIn's registrable domain.
pub const LINKEDIN_DOMAIN: &str = "linkedin.com";

/// LinkedIn paths that always show a single job detail.
pub const LINKEDIN_JOB_PATHS: &[&str] = &["/jobs/view/", "/jobs/collections/"];

/// Query key LinkedIn uses for the selected job in list views.
pub const LINKEDIN_JOB_QUERY_KEY: &str = "currentJobId";

/// Job boards whose detail pages are gated in automated contexts.
pub const GATED_JOB_BOARDS: &[&str] = &["indeed.com", "glassdoor.com", "ziprecruiter.com"];

/// Detail-page path fragments on [`GATED_JOB_BOARDS`].
pub const GATED_JOB_PATHS: &[&str] = &["/viewjob", "/job/"];

/// Query key Indeed uses for a job id.
pub const GATED_JOB_QUERY_KEY: &str = "jk";

/// Elements that only appear on login forms.
pub const AUTH_SELECTORS: &[&str] = &[
    r#"input[type="password"]"#,
    r#"a[href*="login"]"#,
    r#"a[href*="signin"]"#,
    r#"form[action*="login"]"#,
    r#"form[action*="signin"]"#,
    ".login-form",
    ".signin-form",
    r#"[data-testid*="login"]"#,
    r#"[data-testid*="signin"]"#,
];

/// Submit buttons matching this selector are checked against [`AUTH_SUBMIT_LABELS`].
pub const AUTH_SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;

/// Submit-button captions that mark a login form.
pub const AUTH_SUBMIT_LABELS: &[&str] = &["Sign in", "Log in", "Login"];

/// Page phrases that mark an auth wall.
pub const AUTH_TEXT_INDICATORS: &[&str] = &[
    "sign in to continue",
    "log in to view",
    "please sign in",
    "authentication required",
    "login required",
    "you must be signed in",
    "access restricted",
    "please log in",
    "join linkedin",
    "sign in to linkedin",
    "welcome back",
];

/// Final-URL fragments that mark a redirect to a login page.
pub const REDIRECT_URL_MARKERS: &[&str] = &["login", "signin", "auth"];

/// Final-URL fragments of LinkedIn's interstitials.
pub const LINKEDIN_URL_MARKERS: &[&str] = &["authwall", "login"];

/// Page phrases of LinkedIn's interstitials.
pub const LINKEDIN_TEXT_MARKERS: &[&str] = &["join linkedin", "sign in to linkedin"];

/// Error-message keywords that suggest the site refused access.
pub const AUTH_FAILURE_KEYWORDS: &[&str] = &["timeout", "blocked", "forbidden", "unauthorized"];

/// Posting containers, most specific first.
pub const CONTENT_SELECTORS: &[&str] = &[
    r#"[data-testid="job-description"]"#,
    ".job-description",
    ".job-details",
    ".job-content",
    ".posting-content",
    ".description",
    r#"[class*="description"]"#,
    r#"[class*="job-detail"]"#,
    "main",
    ".main-content",
    ".content",
    "article",
];

/// Page chrome excluded from extracted text.
pub const NOISE_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    ".nav",
    ".header",
    ".footer",
    ".advertisement",
    ".ads",
];

/// Elements whose text is never rendered.
pub const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Editable heuristic tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTables {
    /// CSS selectors of login-form elements
    pub auth_selectors: Vec<String>,
    /// Submit-button captions of login forms
    pub auth_submit_labels: Vec<String>,
    /// Phrases that mark an auth wall
    pub auth_phrases: Vec<String>,
    /// Posting containers in priority order
    pub content_selectors: Vec<String>,
    /// Page chrome dropped from extracted text
    pub noise_selectors: Vec<String>,
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            auth_selectors: owned(AUTH_SELECTORS),
            auth_submit_labels: owned(AUTH_SUBMIT_LABELS),
            auth_phrases: owned(AUTH_TEXT_INDICATORS),
            content_selectors: owned(CONTENT_SELECTORS),
            noise_selectors: owned(NOISE_SELECTORS),
        }
    }
}

/// Compiled heuristic tables.
#[derive(Debug, Clone)]
pub struct Heuristics {
    auth_selectors: Vec<Selector>,
    submit_button: Selector,
    submit_labels: Vec<String>,
    auth_phrases: Vec<String>,
    content_selectors: Vec<Selector>,
    noise_selectors: Vec<Selector>,
    body: Selector,
}

impl Heuristics {
    /// Compile the tables. Phrases and labels are lower-cased for matching.
    pub fn new(tables: &HeuristicTables) -> Result<Self> {
        Ok(Self {
            auth_selectors: compile_all(&tables.auth_selectors)?,
            submit_button: compile(AUTH_SUBMIT_BUTTON)?,
            submit_labels: lowercase_all(&tables.auth_submit_labels),
            auth_phrases: lowercase_all(&tables.auth_phrases),
            content_selectors: compile_all(&tables.content_selectors)?,
            noise_selectors: compile_all(&tables.noise_selectors)?,
            body: compile("body")?,
        })
    }

    pub(crate) fn auth_selectors(&self) -> &[Selector] {
        &self.auth_selectors
    }

    pub(crate) fn submit_button(&self) -> &Selector {
        &self.submit_button
    }

    pub(crate) fn submit_labels(&self) -> &[String] {
        &self.submit_labels
    }

    pub(crate) fn auth_phrases(&self) -> &[String] {
        &self.auth_phrases
    }

    pub(crate) fn content_selectors(&self) -> &[Selector] {
        &self.content_selectors
    }

    pub(crate) fn noise_selectors(&self) -> &[Selector] {
        &self.noise_selectors
    }

    pub(crate) fn body(&self) -> &Selector {
        &self.body
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new(&HeuristicTables::default()).expect("built-in selectors are hardcoded and valid")
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn compile_all(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors.iter().map(String::as_str).map(compile).collect()
}

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| (*s).to_string()).collect()
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
