//! Headless browser sessions for job-posting pages.
//!
//! A session owns one Chromium process, one isolated browsing context and
//! one page. It is created per scrape and closed before the scrape returns.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::{extract_domain, BrowserLauncher, BrowserSession, PageSnapshot};
pub use engine::{ChromiumLauncher, ChromiumSession};
pub use error::{BrowserError, Result};
