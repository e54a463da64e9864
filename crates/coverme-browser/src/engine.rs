use crate::actions::{BrowserLauncher, BrowserSession, PageSnapshot};
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::Page;
use coverme_core::BrowserConfig;
use futures::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often `document.readyState` is polled while waiting for DOM content.
const READY_STATE_POLL: Duration = Duration::from_millis(50);

/// Launches one Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    config: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Extra command-line flags passed to Chromium.
    fn launch_args(&self) -> Vec<String> {
        let mut args = vec![format!("--user-agent={}", self.config.user_agent)];
        if self.config.no_sandbox {
            args.push("--disable-setuid-sandbox".to_string());
        }
        args
    }

    fn chromium_config(&self) -> Result<ChromiumConfig> {
        let mut builder = ChromiumConfig::builder().args(self.launch_args());

        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession> {
        let config = self.chromium_config()?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler error: {e}");
                }
            }
        });

        match open_isolated_page(&mut browser).await {
            Ok(page) => {
                tracing::debug!("Browser launched with isolated context");
                Ok(ChromiumSession {
                    browser,
                    page,
                    handler,
                    closed: false,
                })
            }
            Err(e) => {
                // Tear down the launched process before reporting the setup error
                if let Err(close_err) = shutdown(&mut browser, &handler).await {
                    tracing::warn!("Failed to close browser after setup error: {close_err}");
                }
                Err(e)
            }
        }
    }
}

async fn open_isolated_page(browser: &mut Browser) -> Result<Page> {
    let context_id = browser
        .create_browser_context(CreateBrowserContextParams::default())
        .await
        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

    let target = CreateTargetParams::builder()
        .url("about:blank")
        .browser_context_id(context_id)
        .build()
        .map_err(BrowserError::ChromiumError)?;

    browser
        .new_page(target)
        .await
        .map_err(|e| BrowserError::ChromiumError(e.to_string()))
}

/// A live Chromium process with a single page.
///
/// Call [`BrowserSession::close`] before dropping. If a session is dropped
/// unclosed, chromiumoxide kills the child process when `Browser` drops.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let page = &self.page;
        let navigation = async {
            let response = page
                .execute(NavigateParams::new(url))
                .await
                .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;

            if let Some(error_text) = &response.result.error_text {
                return Err(BrowserError::NavigationError(format!(
                    "{url}: {error_text}"
                )));
            }

            wait_for_dom_content(page).await;
            Ok(())
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| {
                BrowserError::Timeout(format!(
                    "navigation to {url} exceeded {}ms",
                    timeout.as_millis()
                ))
            })?
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot> {
        let final_url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?
            .unwrap_or_default();

        let html = self
            .page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        Ok(PageSnapshot { final_url, html })
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        shutdown(&mut self.browser, &self.handler).await
    }
}

/// Close the browser, reap its process and stop the CDP handler.
///
/// A failed reap is logged; only the close command's error is returned.
async fn shutdown(browser: &mut Browser, handler: &JoinHandle<()>) -> Result<()> {
    let result = browser
        .close()
        .await
        .map(|_| ())
        .map_err(|e| BrowserError::Close(e.to_string()));

    if let Err(e) = browser.wait().await {
        tracing::debug!("Failed to reap browser process: {e}");
    }
    handler.abort();

    result
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Browser session dropped without close");
            self.handler.abort();
        }
    }
}

/// Wait until the document is past the `loading` state.
///
/// Evaluation errors while the new document commits are retried; the caller's
/// timeout bounds the loop.
async fn wait_for_dom_content(page: &Page) {
    loop {
        match page.evaluate("document.readyState").await {
            Ok(value) => match value.into_value::<String>() {
                Ok(state) if state != "loading" => return,
                Ok(_) => {}
                Err(e) => tracing::trace!("Unexpected readyState value: {e}"),
            },
            Err(e) => tracing::trace!("readyState not available yet: {e}"),
        }
        tokio::time::sleep(READY_STATE_POLL).await;
    }
}
