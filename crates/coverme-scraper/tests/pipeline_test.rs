use async_trait::async_trait;
use coverme_browser::{BrowserError, BrowserLauncher, BrowserSession, PageSnapshot};
use coverme_core::{JobLink, ScraperConfig};
use coverme_scraper::{HeuristicTables, Heuristics, ScrapePipeline};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How the mock page behaves once navigated.
#[derive(Clone)]
enum MockPage {
    /// Loads and renders `html`, ending on `final_url` (or the requested URL)
    Loads {
        html: String,
        final_url: Option<String>,
    },
    /// Navigation exceeds its timeout
    NavigationTimeout,
    /// Navigation succeeds but the DOM cannot be read
    SnapshotFails,
}

#[derive(Default)]
struct Counters {
    launches: AtomicUsize,
    navigations: AtomicUsize,
    closes: AtomicUsize,
}

struct MockLauncher {
    page: MockPage,
    close_fails: bool,
    counters: Arc<Counters>,
}

impl MockLauncher {
    fn new(page: MockPage) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        (
            Self {
                page,
                close_fails: false,
                counters: Arc::clone(&counters),
            },
            counters,
        )
    }

    /// Like [`MockLauncher::new`], but every session fails to close.
    fn with_failing_close(page: MockPage) -> (Self, Arc<Counters>) {
        let (mut launcher, counters) = Self::new(page);
        launcher.close_fails = true;
        (launcher, counters)
    }
}

struct MockSession {
    page: MockPage,
    close_fails: bool,
    requested: Option<String>,
    counters: Arc<Counters>,
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
    type Session = MockSession;

    async fn launch(&self) -> coverme_browser::Result<MockSession> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            page: self.page.clone(),
            close_fails: self.close_fails,
            requested: None,
            counters: Arc::clone(&self.counters),
        })
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> coverme_browser::Result<()> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        self.requested = Some(url.to_string());
        match self.page {
            MockPage::NavigationTimeout => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {}ms",
                timeout.as_millis()
            ))),
            _ => Ok(()),
        }
    }

    async fn snapshot(&mut self) -> coverme_browser::Result<PageSnapshot> {
        match &self.page {
            MockPage::Loads { html, final_url } => Ok(PageSnapshot {
                final_url: final_url
                    .clone()
                    .or_else(|| self.requested.clone())
                    .unwrap_or_default(),
                html: html.clone(),
            }),
            MockPage::SnapshotFails => Err(BrowserError::ChromiumError(
                "target closed while reading DOM".to_string(),
            )),
            MockPage::NavigationTimeout => unreachable!("snapshot after failed navigation"),
        }
    }

    async fn close(&mut self) -> coverme_browser::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.close_fails {
            return Err(BrowserError::Close("browser process already gone".to_string()));
        }
        Ok(())
    }
}

fn test_config() -> ScraperConfig {
    ScraperConfig {
        settle_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

fn loads(html: &str) -> MockPage {
    MockPage::Loads {
        html: html.to_string(),
        final_url: None,
    }
}

/// 500 characters of posting text with irregular whitespace.
fn posting_text() -> String {
    let sentence = "Build reliable systems in Rust.  ";
    let mut text = sentence.repeat(20);
    text.truncate(500);
    text
}

#[tokio::test]
async fn test_linkedin_job_url_never_launches_browser() {
    let (launcher, counters) = MockLauncher::new(loads("<html></html>"));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://www.linkedin.com/jobs/view/12345")
        .await;

    assert_eq!(result.content(), "");
    assert!(result.has_auth_issue());
    assert_eq!(counters.launches.load(Ordering::SeqCst), 0);
    assert_eq!(counters.navigations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_gated_board_urls_never_launch_browser() {
    let (launcher, counters) = MockLauncher::new(loads("<html></html>"));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    for url in [
        "https://www.indeed.com/viewjob?jk=abc123",
        "https://www.glassdoor.com/job/engineer-JV_1.htm",
        "https://www.ziprecruiter.com/jobs/acme?jk=xyz",
    ] {
        let result = pipeline.scrape_job_content(url).await;
        assert!(result.has_auth_issue(), "{url}");
        assert_eq!(result.content(), "", "{url}");
    }
    assert_eq!(counters.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_article_page_is_extracted() {
    let text = posting_text();
    let html = format!("<html><body><article>{text}</article></body></html>");
    let (launcher, counters) = MockLauncher::new(loads(&html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://generic-startup.com/careers/engineer")
        .await;

    let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert!(!result.has_auth_issue());
    assert_eq!(result.content(), expected);
    assert!(result.error().is_none());
    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_job_description_is_normalized_and_truncated() {
    let text = format!("Responsibilities:\n\n   {}", "ship   features\t".repeat(50));
    let html = format!(
        r#"<html><body><main>Short</main><div class="job-description">{text}</div></body></html>"#
    );
    let (launcher, _) = MockLauncher::new(loads(&html));
    let config = ScraperConfig {
        max_content_length: 200,
        ..test_config()
    };
    let pipeline = ScrapePipeline::new(launcher, config);

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    let content = result.content();
    assert!(content.starts_with("Responsibilities: ship features ship features"));
    assert!(content.chars().count() <= 200);
    assert!(!content.contains("  "));
    assert!(!content.contains('\n'));
    assert!(!result.has_auth_issue());
}

#[tokio::test]
async fn test_sign_in_text_is_reported_as_auth_issue() {
    let html = "<html><body><div>Please sign in to view this posting.</div></body></html>";
    let (launcher, counters) = MockLauncher::new(loads(html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(result.has_auth_issue());
    assert_eq!(result.content(), "");
    assert_eq!(
        result.error(),
        Some("Authentication required to access job content")
    );
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_auth_wall_wins_over_long_content() {
    let text = posting_text();
    let html = format!(
        r#"<html><body><article>{text}</article><form action="/signin"><input type="password"></form></body></html>"#
    );
    let (launcher, _) = MockLauncher::new(loads(&html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(result.has_auth_issue());
    assert!(!result.has_content());
}

#[tokio::test]
async fn test_redirect_to_foreign_login_is_auth_issue() {
    let page = MockPage::Loads {
        html: "<html><body><p>Continue to your account</p></body></html>".to_string(),
        final_url: Some("https://id.acme-sso.example/login?next=jobs".to_string()),
    };
    let (launcher, _) = MockLauncher::new(page);
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(result.has_auth_issue());
}

#[tokio::test]
async fn test_navigation_timeout_returns_result_and_closes_once() {
    let (launcher, counters) = MockLauncher::new(MockPage::NavigationTimeout);
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://slow-startup.example/careers/1")
        .await;

    assert_eq!(result.content(), "");
    // "timeout" in the error text counts as a likely auth failure
    assert!(result.has_auth_issue());
    let error = result.error().expect("error is reported");
    assert!(error.contains("exceeded 10000ms"));
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_snapshot_failure_closes_browser() {
    let (launcher, counters) = MockLauncher::new(MockPage::SnapshotFails);
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(!result.has_auth_issue());
    assert_eq!(
        result.error(),
        Some("chromium error: target closed while reading DOM")
    );
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_close_failure_keeps_extracted_content() {
    let text = posting_text();
    let html = format!("<html><body><article>{text}</article></body></html>");
    let (launcher, counters) = MockLauncher::with_failing_close(loads(&html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://generic-startup.com/careers/engineer")
        .await;

    let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(result.content(), expected);
    assert!(!result.has_auth_issue());
    assert!(result.error().is_none());
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_close_failure_keeps_auth_verdict() {
    let html = "<html><body><div>Please sign in to view this posting.</div></body></html>";
    let (launcher, counters) = MockLauncher::with_failing_close(loads(html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(result.has_auth_issue());
    assert_eq!(result.content(), "");
    assert_eq!(
        result.error(),
        Some("Authentication required to access job content")
    );
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_url_goes_through_browser() {
    let (launcher, counters) = MockLauncher::new(MockPage::NavigationTimeout);
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let result = pipeline.scrape_job_content("not a url").await;

    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    assert!(result.error().is_some());
    assert_eq!(result.content(), "");
}

#[tokio::test]
async fn test_job_link_posting_is_scraped() {
    let text = posting_text();
    let html = format!("<html><body><main>{text}</main></body></html>");
    let (launcher, counters) = MockLauncher::new(loads(&html));
    let pipeline = ScrapePipeline::new(launcher, test_config());

    let link = JobLink::parse("https://generic-startup.com/careers/engineer").expect("valid link");
    let result = pipeline
        .scrape_job_link(&link)
        .await
        .expect("postings are scraped");

    assert!(result.has_content());
    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);

    let general = pipeline.scrape_job_link(&JobLink::General).await;
    assert!(general.is_none());
    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_custom_heuristics_are_used() {
    let text = posting_text();
    let html = format!(
        r#"<html><body><div class="posting-body">{text}</div><p>Footer links</p></body></html>"#
    );
    let (launcher, _) = MockLauncher::new(loads(&html));
    let tables = HeuristicTables {
        content_selectors: vec![".posting-body".to_string()],
        ..HeuristicTables::default()
    };
    let pipeline = ScrapePipeline::new(launcher, test_config())
        .with_heuristics(Heuristics::new(&tables).expect("valid tables"));

    let result = pipeline
        .scrape_job_content("https://acme.example/jobs/42")
        .await;

    assert!(!result.content().contains("Footer links"));
    assert!(result.content().starts_with("Build reliable systems in Rust."));
}

#[tokio::test]
async fn test_content_and_auth_issue_are_exclusive() {
    let pages = [
        loads("<html><body><article>Welcome back! Log in to view openings.</article></body></html>"),
        loads(&format!(
            "<html><body><article>{}</article></body></html>",
            posting_text()
        )),
        MockPage::NavigationTimeout,
        MockPage::SnapshotFails,
    ];

    for page in pages {
        let (launcher, _) = MockLauncher::new(page);
        let pipeline = ScrapePipeline::new(launcher, test_config());
        let result = pipeline
            .scrape_job_content("https://acme.example/jobs/42")
            .await;
        assert!(!(result.has_auth_issue() && result.has_content()));
    }
}
