//! The live page handle a session drives.
//!
//! [`PageDriver`] is the seam between resolution logic and a concrete browser.
//! [`ChromePage`](crate::browser::ChromePage) implements it over CDP; tests
//! implement it with scripted pages.

use crate::error::Result;
use crate::network::RequestDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A structural query the driver can evaluate against the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Css(String),
    XPath(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Css(s) => write!(f, "css={s}"),
            Query::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Wait for the load event
    #[default]
    Load,
    /// Return as soon as the navigation is committed
    Commit,
}

/// What a completed navigation reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOutcome {
    pub final_url: String,
    /// HTTP status of the main document, when the driver can tell
    pub status_code: Option<u16>,
    pub title: String,
}

/// A live, queryable browser page
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait according to `wait`, bounded by `timeout`
    async fn navigate(&self, url: &str, wait: WaitPolicy, timeout: Duration) -> Result<NavigationOutcome>;

    /// Whether at least one element currently matches `query`, without waiting for one to appear
    async fn probe(&self, query: &Query, timeout: Duration) -> Result<bool>;

    /// Wait up to `timeout` for `query` to be interactable, then click it.
    ///
    /// A wait that runs out is [`BrowserError::ElementTimeout`](crate::error::BrowserError::ElementTimeout).
    async fn click(&self, query: &Query, timeout: Duration) -> Result<()>;

    /// Wait up to `timeout` for `query` to be interactable, then set its value to `text`
    async fn fill(&self, query: &Query, text: &str, timeout: Duration) -> Result<()>;

    /// Currently rendered markup (not the original source)
    async fn content(&self) -> Result<String>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Start recording intercepted requests, discarding anything recorded before
    async fn begin_capture(&self) -> Result<()>;

    /// Stop recording and return requests in arrival order
    async fn end_capture(&self) -> Result<Vec<RequestDescriptor>>;

    /// Release the page and its browser
    async fn close(&self) -> Result<()>;
}
