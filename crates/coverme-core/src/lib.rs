//! CoverMe Core - Foundation crate for the CoverMe job scraper.
//!
//! This crate provides the shared result types, error handling and
//! configuration management that the browser and scraper crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared types (`ScrapeResult`, `JobLink`)
//!
//! # Example
//!
//! ```rust
//! use coverme_core::{AppConfig, JobLink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scraper.min_content_length, 100);
//!
//! let link = JobLink::parse("general")?;
//! assert!(link.is_general());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, ScraperConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{JobLink, ScrapeResult};
