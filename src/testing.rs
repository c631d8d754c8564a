//! Scripted [`PageDriver`] for unit tests

use crate::browser::{NavigationOutcome, PageDriver, Query, WaitPolicy};
use crate::error::{BrowserError, Result};
use crate::network::RequestDescriptor;
use crate::resolver::Locator;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A page whose elements are the locators it was told about
#[derive(Default)]
pub struct FakePage {
    pub html: Mutex<String>,
    pub url: Mutex<String>,
    pub title: String,
    pub status: Option<u16>,
    /// Fail every navigation from now on
    pub fail_navigation: AtomicBool,
    /// Every probe, click and fill fails like a dropped CDP connection
    pub disconnected: bool,
    pub requests: Vec<RequestDescriptor>,
    present: Vec<Query>,
    /// Probed as present but never interactable
    inert: Vec<Query>,
    pub probes: Mutex<Vec<Query>>,
    pub clicks: Mutex<Vec<Query>>,
    pub fills: Mutex<Vec<(Query, String)>>,
    pub navigations: Mutex<Vec<String>>,
    pub closed: AtomicBool,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            url: Mutex::new("about:blank".to_string()),
            ..Default::default()
        }
    }

    pub fn with_html(self, html: &str) -> Self {
        *self.html.lock().unwrap() = html.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_element(mut self, locator: Locator) -> Self {
        self.present.push(locator.to_query());
        self
    }

    pub fn with_request(mut self, request: RequestDescriptor) -> Self {
        self.requests.push(request);
        self
    }

    pub fn with_inert_element(mut self, locator: Locator) -> Self {
        self.inert.push(locator.to_query());
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.fail_navigation.store(true, Ordering::SeqCst);
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    fn has(&self, query: &Query) -> bool {
        self.present.contains(query)
    }

    fn check_connection(&self) -> Result<()> {
        if self.disconnected {
            return Err(BrowserError::DriverFailed("connection closed".to_string()));
        }
        Ok(())
    }

    /// Like a CDP wait that never sees the element
    fn interactable(&self, query: &Query) -> Result<()> {
        self.check_connection()?;
        if self.has(query) {
            Ok(())
        } else {
            Err(BrowserError::ElementTimeout {
                locator: query.to_string(),
                after_ms: 0,
            })
        }
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, url: &str, _wait: WaitPolicy, _timeout: Duration) -> Result<NavigationOutcome> {
        self.navigations.lock().unwrap().push(url.to_string());
        if self.fail_navigation.load(Ordering::SeqCst) {
            return Err(BrowserError::DriverFailed("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        *self.url.lock().unwrap() = url.to_string();
        Ok(NavigationOutcome {
            final_url: url.to_string(),
            status_code: self.status.or(Some(200)),
            title: self.title.clone(),
        })
    }

    async fn probe(&self, query: &Query, _timeout: Duration) -> Result<bool> {
        self.probes.lock().unwrap().push(query.clone());
        self.check_connection()?;
        Ok(self.has(query) || self.inert.contains(query))
    }

    async fn click(&self, query: &Query, _timeout: Duration) -> Result<()> {
        self.interactable(query)?;
        self.clicks.lock().unwrap().push(query.clone());
        Ok(())
    }

    async fn fill(&self, query: &Query, text: &str, _timeout: Duration) -> Result<()> {
        self.interactable(query)?;
        self.fills.lock().unwrap().push((query.clone(), text.to_string()));
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.lock().unwrap().clone())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn begin_capture(&self) -> Result<()> {
        Ok(())
    }

    async fn end_capture(&self) -> Result<Vec<RequestDescriptor>> {
        Ok(self.requests.clone())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
