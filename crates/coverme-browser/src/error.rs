use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("unable to launch browser: {0}")]
    Launch(String),

    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("failed to close browser: {0}")]
    Close(String),
}

impl BrowserError {
    /// True when the browser process never came up.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::Launch(_))
    }
}
