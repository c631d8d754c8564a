use crate::browser::chrome::ChromePage;
use crate::browser::config::{ConnectionOptions, LaunchOptions, SessionConfig};
use crate::browser::driver::{PageDriver, WaitPolicy};
use crate::contract::{ContractDocument, SynthesisOptions, synthesize};
use crate::dom::{PageStructure, SnapshotDocument};
use crate::error::{BrowserError, Result};
use crate::network::{CaptureWindow, NetworkCallRecord};
use crate::resolver::{ActionResolver, ClickReport, FillReport, ResolverConfig};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No browser yet
    Uninitialized,
    /// Browser running, nothing loaded
    Launched,
    /// A navigation completed but its capture window did not
    Navigated,
    /// Page loaded and network calls captured
    Ready,
}

/// Result of launching, connecting or attaching
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchReport {
    /// A browser was already open and was reused
    pub already_running: bool,
    pub state: SessionState,
}

/// Result of a navigation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationReport {
    pub url: String,
    pub final_url: String,
    pub status_code: Option<u16>,
    pub title: String,
    /// Distinct programmatic calls seen during the settle window
    pub network_calls: usize,
}

/// A caller-owned browser session.
///
/// Every operation goes through this handle; there is no global session.
/// Operations take `&self` or `&mut self` and are not synchronized with each
/// other, so callers issue one at a time.
pub struct Session {
    config: SessionConfig,

    state: SessionState,

    page: Option<Arc<dyn PageDriver>>,

    /// Calls captured after the last navigation
    network_calls: Vec<NetworkCallRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Create an unlaunched session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
            page: None,
            network_calls: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.page.is_some()
    }

    /// Programmatic calls captured by the last navigation
    pub fn network_calls(&self) -> &[NetworkCallRecord] {
        &self.network_calls
    }

    fn already_running(&self) -> Option<LaunchReport> {
        self.page.as_ref().map(|_| {
            log::info!("Browser already running; reusing it");
            LaunchReport {
                already_running: true,
                state: self.state,
            }
        })
    }

    fn opened(&mut self, page: Arc<dyn PageDriver>) -> LaunchReport {
        self.page = Some(page);
        self.state = SessionState::Launched;
        self.network_calls.clear();
        log::info!("Session launched");
        LaunchReport {
            already_running: false,
            state: self.state,
        }
    }

    /// Use an existing page handle. A no-op when a page is already attached.
    pub fn attach(&mut self, page: Arc<dyn PageDriver>) -> LaunchReport {
        match self.already_running() {
            Some(report) => report,
            None => self.opened(page),
        }
    }

    /// Launch a browser. Launching while one is open reports the existing one.
    pub async fn launch(&mut self, options: LaunchOptions) -> Result<LaunchReport> {
        if let Some(report) = self.already_running() {
            return Ok(report);
        }

        let page = tokio::task::spawn_blocking(move || ChromePage::launch(&options))
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("Launch task failed: {}", e)))??;

        Ok(self.opened(Arc::new(page)))
    }

    /// Attach to a running browser over its DevTools WebSocket
    pub async fn connect(&mut self, options: ConnectionOptions) -> Result<LaunchReport> {
        if let Some(report) = self.already_running() {
            return Ok(report);
        }

        let timeout = Duration::from_millis(options.timeout);
        let task = tokio::task::spawn_blocking(move || ChromePage::connect(&options));
        let page = match tokio::time::timeout(timeout, task).await {
            Ok(joined) => joined.map_err(|e| BrowserError::ConnectionFailed(format!("Connect task failed: {}", e)))??,
            Err(_) => {
                return Err(BrowserError::Timeout {
                    operation: "connect".to_string(),
                    after_ms: timeout.as_millis() as u64,
                });
            }
        };

        Ok(self.opened(Arc::new(page)))
    }

    /// The live page, or a precondition error naming `operation`
    fn page(&self, operation: &str) -> Result<Arc<dyn PageDriver>> {
        self.page
            .clone()
            .ok_or_else(|| BrowserError::NoSession(format!("{} requires a launched browser", operation)))
    }

    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::from(&self.config)
    }

    /// Navigate and capture programmatic calls for the settle window
    pub async fn navigate(&mut self, url: &str, wait: WaitPolicy) -> Result<NavigationReport> {
        let page = self.page("navigate")?;
        self.network_calls.clear();

        page.begin_capture().await?;
        let outcome = match page.navigate(url, wait, self.config.navigation_timeout).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let _ = page.end_capture().await;
                // The previous page is gone
                self.state = SessionState::Launched;
                log::warn!("Navigation to {} failed: {}", url, e);
                return Err(match e {
                    BrowserError::Timeout { .. } => e,
                    other => BrowserError::FetchFailed {
                        url: url.to_string(),
                        status: None,
                        cause: other.to_string(),
                    },
                });
            }
        };
        self.state = SessionState::Navigated;

        if let Some(status) = outcome.status_code.filter(|status| *status >= 400) {
            let _ = page.end_capture().await;
            return Err(BrowserError::FetchFailed {
                url: url.to_string(),
                status: Some(status),
                cause: format!("document answered with HTTP {}", status),
            });
        }

        // Calls arriving after the window closes are not captured
        tokio::time::sleep(self.config.settle_window).await;

        let mut window = CaptureWindow::new();
        window.observe_all(page.end_capture().await?);
        if window.dropped() > 0 {
            log::debug!("Dropped {} duplicate or non-programmatic requests", window.dropped());
        }
        self.network_calls = window.finish();
        self.state = SessionState::Ready;
        log::info!("Navigated to {} ({} network calls)", outcome.final_url, self.network_calls.len());

        Ok(NavigationReport {
            url: url.to_string(),
            final_url: outcome.final_url,
            status_code: outcome.status_code,
            title: outcome.title,
            network_calls: self.network_calls.len(),
        })
    }

    /// Click the element best matching a selector or label
    pub async fn click(&self, target: &str) -> Result<ClickReport> {
        let page = self.page("click")?;
        ActionResolver::new(page.as_ref(), self.resolver_config()).click(target).await
    }

    /// Fill one field, coercing `value` to text
    pub async fn fill(&self, field: &str, value: &Value) -> Result<FillReport> {
        let page = self.page("fill")?;
        ActionResolver::new(page.as_ref(), self.resolver_config()).fill(field, value).await
    }

    /// Fill several fields in order; the first failure aborts the rest
    pub async fn fill_batch(&self, fields: &IndexMap<String, Value>) -> Result<Vec<FillReport>> {
        let page = self.page("fill_form")?;
        ActionResolver::new(page.as_ref(), self.resolver_config()).fill_batch(fields).await
    }

    /// Bounded summary of the currently rendered page
    pub async fn snapshot(&self) -> Result<SnapshotDocument> {
        let page = self.page("snapshot")?;
        let html = page.content().await?;
        let url = page.current_url().await?;
        let title = page.title().await?;

        Ok(SnapshotDocument::from_html(url, title, &html, &self.config.snapshot))
    }

    /// Load `url` with network capture and synthesize its contract
    pub async fn generate_contract(&mut self, url: &str, options: SynthesisOptions) -> Result<ContractDocument> {
        let report = self.navigate(url, WaitPolicy::Load).await?;
        let page = self.page("generate_contract")?;
        let html = page.content().await?;

        let mut options = options;
        if options.base_url.is_none() {
            options.base_url = Some(report.final_url);
        }

        Ok(synthesize(&PageStructure::from_html(&html), &self.network_calls, options))
    }

    /// Close the browser. Returns whether one was open.
    pub async fn close(&mut self) -> Result<bool> {
        let Some(page) = self.page.take() else {
            return Ok(false);
        };
        self.state = SessionState::Uninitialized;
        self.network_calls.clear();

        page.close().await?;
        log::info!("Session closed");
        Ok(true)
    }
}
