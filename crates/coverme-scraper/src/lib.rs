//! CoverMe Scraper - job-posting retrieval with authentication-wall detection.
//!
//! The pipeline fetches a single job posting with a headless browser and
//! returns its normalized text, or reports that the posting sits behind a
//! login. Known gated URLs are rejected up front without launching a browser.
//!
//! # Features
//!
//! - Network-free URL pre-screening for LinkedIn and gated job boards
//! - In-page auth detection from selectors, page text, redirects and LinkedIn interstitials
//! - Ordered content-selector extraction with whitespace normalization and a length cap
//! - Guaranteed browser teardown on every exit path
//!
//! # Example
//!
//! ```rust,ignore
//! use coverme_browser::ChromiumLauncher;
//! use coverme_core::AppConfig;
//! use coverme_scraper::ScrapePipeline;
//!
//! let config = AppConfig::load()?;
//! let pipeline = ScrapePipeline::new(ChromiumLauncher::new(config.browser), config.scraper);
//!
//! let result = pipeline
//!     .scrape_job_content("https://acme.example/careers/staff-engineer")
//!     .await;
//! if result.has_auth_issue() {
//!     eprintln!("posting requires login");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod detect;
pub mod error;
pub mod extract;
pub mod heuristics;
pub mod pipeline;
pub mod prescreen;

// Re-export commonly used types
pub use detect::{detect_auth, AuthSignal};
pub use error::{Result, ScrapeError};
pub use extract::{extract_content, normalize_text};
pub use heuristics::{HeuristicTables, Heuristics};
pub use pipeline::ScrapePipeline;
pub use prescreen::{check_url_for_auth_issues, prescreen_url, PrescreenVerdict};
