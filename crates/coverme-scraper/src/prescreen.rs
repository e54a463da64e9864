//! Network-free URL pre-screening.
//!
//! Some job boards are known to put detail pages behind a login when they are
//! visited by an automated browser. Recognizing those URLs up front saves a
//! browser launch that would only end at an auth wall.

use crate::heuristics::{
    GATED_JOB_BOARDS, GATED_JOB_PATHS, GATED_JOB_QUERY_KEY, LINKEDIN_DOMAIN, LINKEDIN_JOB_PATHS,
    LINKEDIN_JOB_QUERY_KEY,
};
use tracing::debug;
use url::Url;

/// Which pre-screen rule a URL matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescreenVerdict {
    /// A LinkedIn job detail or job collection page
    LinkedInJob,
    /// A detail page on one of the gated job boards
    GatedJobBoard {
        /// Board domain that matched
        domain: &'static str,
    },
    /// No known auth pattern
    Clear,
    /// Not an absolute URL; treated as no known issue
    Unparseable,
}

impl PrescreenVerdict {
    /// Whether the URL is known to require a login.
    #[must_use]
    pub fn is_gated(self) -> bool {
        matches!(self, Self::LinkedInJob | Self::GatedJobBoard { .. })
    }
}

/// Classify a URL against the known auth-walled patterns.
///
/// Rules are checked in order and the first match wins.
#[must_use]
pub fn prescreen_url(raw: &str) -> PrescreenVerdict {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            debug!("Pre-screen: '{}' is not an absolute URL ({})", raw, e);
            return PrescreenVerdict::Unparseable;
        }
    };

    let Some(host) = url.host_str() else {
        debug!("Pre-screen: {} has no host", url);
        return PrescreenVerdict::Clear;
    };
    let path = url.path();
    let has_query_key = |key: &str| url.query_pairs().any(|(k, _)| k == key);

    if host.contains(LINKEDIN_DOMAIN) {
        let job_path = LINKEDIN_JOB_PATHS.iter().any(|p| path.contains(p));
        if job_path || has_query_key(LINKEDIN_JOB_QUERY_KEY) {
            debug!("Pre-screen: LinkedIn job URL {}", url);
            return PrescreenVerdict::LinkedInJob;
        }
        debug!("Pre-screen: LinkedIn URL without a job pattern: {}", url);
    }

    if let Some(domain) = GATED_JOB_BOARDS.iter().copied().find(|d| host.contains(d)) {
        let detail_path = GATED_JOB_PATHS.iter().any(|p| path.contains(p));
        if detail_path || has_query_key(GATED_JOB_QUERY_KEY) {
            debug!("Pre-screen: {} job detail URL {}", domain, url);
            return PrescreenVerdict::GatedJobBoard { domain };
        }
        debug!("Pre-screen: {} URL without a detail pattern: {}", domain, url);
    }

    PrescreenVerdict::Clear
}

/// Whether a URL is known, by pattern alone, to sit behind a login.
///
/// Invalid URLs yield `false`. Pure: no network access.
#[must_use]
pub fn check_url_for_auth_issues(url: &str) -> bool {
    prescreen_url(url).is_gated()
}
