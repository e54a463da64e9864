//! In-page authentication-wall detection.

use crate::extract::page_text;
use crate::heuristics::{
    Heuristics, LINKEDIN_DOMAIN, LINKEDIN_TEXT_MARKERS, LINKEDIN_URL_MARKERS, REDIRECT_URL_MARKERS,
};
use crate::prescreen::check_url_for_auth_issues;
use coverme_browser::extract_domain;
use scraper::Html;
use tracing::debug;

/// Independent auth-wall signals for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AuthSignal {
    /// The requested URL matches a known gated pattern
    pub url_pattern: bool,
    /// A login-form element is present
    pub selector: bool,
    /// The page text contains an auth-wall phrase
    pub text: bool,
    /// Navigation ended on a login page of another host
    pub redirect: bool,
    /// LinkedIn authwall or login interstitial
    pub platform: bool,
}

impl AuthSignal {
    /// Whether any signal fired.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.url_pattern || self.selector || self.text || self.redirect || self.platform
    }

    /// Names of the signals that fired, for logging.
    #[must_use]
    pub fn reasons(&self) -> Vec<&'static str> {
        [
            (self.url_pattern, "url_pattern"),
            (self.selector, "selector"),
            (self.text, "text"),
            (self.redirect, "redirect"),
            (self.platform, "platform"),
        ]
        .into_iter()
        .filter_map(|(fired, name)| fired.then_some(name))
        .collect()
    }
}

/// Evaluate every auth signal for a rendered page.
///
/// `requested_url` is what the caller asked for, `final_url` where the
/// browser ended up.
#[must_use]
pub fn detect_auth(
    requested_url: &str,
    final_url: &str,
    document: &Html,
    heuristics: &Heuristics,
) -> AuthSignal {
    let body_text = page_text(document, heuristics).to_lowercase();

    let signal = AuthSignal {
        url_pattern: check_url_for_auth_issues(requested_url),
        selector: has_auth_element(document, heuristics),
        text: heuristics
            .auth_phrases()
            .iter()
            .any(|phrase| body_text.contains(phrase.as_str())),
        redirect: is_auth_redirect(requested_url, final_url),
        platform: is_linkedin_interstitial(final_url, &body_text),
    };

    debug!(
        "Auth detection for {} (final URL {}): {:?}",
        requested_url,
        final_url,
        signal.reasons()
    );
    signal
}

fn has_auth_element(document: &Html, heuristics: &Heuristics) -> bool {
    if heuristics
        .auth_selectors()
        .iter()
        .any(|selector| document.select(selector).next().is_some())
    {
        return true;
    }

    document.select(heuristics.submit_button()).any(|button| {
        let caption = button.text().collect::<String>().to_lowercase();
        heuristics
            .submit_labels()
            .iter()
            .any(|label| caption.contains(label.as_str()))
    })
}

/// Navigation left the requested host and landed on a login-looking URL.
///
/// Same-host moves (canonical paths, tracking redirects) never count.
fn is_auth_redirect(requested_url: &str, final_url: &str) -> bool {
    let (Ok(original), Ok(current)) = (extract_domain(requested_url), extract_domain(final_url))
    else {
        return false;
    };
    if original == current {
        return false;
    }

    let final_url = final_url.to_lowercase();
    REDIRECT_URL_MARKERS
        .iter()
        .any(|marker| final_url.contains(marker))
}

fn is_linkedin_interstitial(final_url: &str, body_text: &str) -> bool {
    let on_linkedin = extract_domain(final_url)
        .map(|host| host.contains(LINKEDIN_DOMAIN))
        .unwrap_or(false);
    if !on_linkedin {
        return false;
    }

    let final_url = final_url.to_lowercase();
    LINKEDIN_URL_MARKERS
        .iter()
        .any(|marker| final_url.contains(marker))
        || LINKEDIN_TEXT_MARKERS
            .iter()
            .any(|marker| body_text.contains(marker))
}
