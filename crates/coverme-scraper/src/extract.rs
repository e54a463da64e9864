//! Job-posting text extraction.

use crate::heuristics::{Heuristics, INVISIBLE_TAGS};
use coverme_core::ScraperConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is hardcoded and valid"));

/// Pull the posting text out of a rendered page.
///
/// The first content selector whose first match holds more than
/// `min_content_length` characters of trimmed text wins; otherwise the whole
/// body is used. The winner is whitespace-normalized and capped at
/// `max_content_length`.
#[must_use]
pub fn extract_content(document: &Html, heuristics: &Heuristics, config: &ScraperConfig) -> String {
    let noise = heuristics.noise_selectors();

    for (idx, selector) in heuristics.content_selectors().iter().enumerate() {
        let Some(element) = document.select(selector).next() else {
            continue;
        };

        let candidate = element_text(element, noise);
        let length = candidate.trim().chars().count();
        if length > config.min_content_length {
            debug!(
                "Content selector #{} matched with {} characters",
                idx, length
            );
            return normalize_text(&candidate, config.max_content_length);
        }
        debug!(
            "Content selector #{} matched but only {} characters",
            idx, length
        );
    }

    debug!("No content selector qualified, using page body");
    let body = document
        .select(heuristics.body())
        .next()
        .map(|body| element_text(body, noise))
        .unwrap_or_default();
    normalize_text(&body, config.max_content_length)
}

/// Rendered text of the page body, without page-chrome filtering.
#[must_use]
pub fn page_text(document: &Html, heuristics: &Heuristics) -> String {
    document
        .select(heuristics.body())
        .next()
        .map(|body| element_text(body, &[]))
        .unwrap_or_default()
}

/// Collapse whitespace runs to single spaces, trim, and cap at `max_chars` characters.
#[must_use]
pub fn normalize_text(raw: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    truncate_chars(collapsed.trim().to_string(), max_chars)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
        text.truncate(text.trim_end().len());
    }
    text
}

/// Text under `element`, skipping invisible tags and elements matching `skip`.
///
/// Element boundaries become spaces so adjacent blocks don't run together.
fn element_text(element: ElementRef<'_>, skip: &[Selector]) -> String {
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, skip: &[Selector], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if INVISIBLE_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    if skip.iter().any(|s| s.matches(&child_el)) {
                        continue;
                    }
                    collect_text(child_el, skip, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
