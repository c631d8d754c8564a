use crate::network::schema::{BodySchema, infer_body_schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Resource category reported for an intercepted request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Document,
    Xhr,
    Fetch,
    Script,
    Stylesheet,
    Image,
    Font,
    Media,
    Other,
}

impl ResourceCategory {
    /// XHR-style and fetch-style requests are the only ones kept
    pub fn is_programmatic(&self) -> bool {
        matches!(self, ResourceCategory::Xhr | ResourceCategory::Fetch)
    }
}

/// One intercepted request as delivered by the page driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub resource_category: ResourceCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, url: impl Into<String>, category: ResourceCategory) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            resource_category: category,
            body_text: None,
        }
    }

    /// Builder method: set the request body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_text = Some(body.into());
        self
    }
}

/// A deduplicated programmatic call observed during one capture window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCallRecord {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_schema: Option<BodySchema>,
}

impl NetworkCallRecord {
    /// Identity used to collapse repeated observations
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.method, &self.url)
    }
}

/// Collects programmatic calls for one capture window.
///
/// The first occurrence of each `(method, url)` wins; later duplicates are
/// dropped. Methods are upper-cased before keying, URLs compared exactly.
#[derive(Debug, Clone, Default)]
pub struct CaptureWindow {
    calls: IndexMap<(String, String), NetworkCallRecord>,
    dropped: usize,
}

impl CaptureWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one request; returns whether it produced a new record
    pub fn observe(&mut self, request: RequestDescriptor) -> bool {
        if !request.resource_category.is_programmatic() {
            log::debug!(
                "Ignoring {:?} request {} {}",
                request.resource_category,
                request.method,
                request.url
            );
            self.dropped += 1;
            return false;
        }

        let method = request.method.trim().to_ascii_uppercase();
        let key = (method.clone(), request.url.clone());
        if self.calls.contains_key(&key) {
            log::debug!("Dropping duplicate call {} {}", method, request.url);
            self.dropped += 1;
            return false;
        }

        let inferred_schema = infer_body_schema(request.body_text.as_deref());
        self.calls.insert(
            key,
            NetworkCallRecord {
                method,
                url: request.url,
                sample_body: request.body_text,
                inferred_schema,
            },
        );
        true
    }

    /// Observe a whole batch in arrival order
    pub fn observe_all(&mut self, requests: impl IntoIterator<Item = RequestDescriptor>) {
        for request in requests {
            self.observe(request);
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Count of requests discarded as duplicates or non-programmatic
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Close the window and return records in first-seen order
    pub fn finish(self) -> Vec<NetworkCallRecord> {
        self.calls.into_values().collect()
    }
}

/// Normalize a full request stream in one call
pub fn normalize_requests(requests: impl IntoIterator<Item = RequestDescriptor>) -> Vec<NetworkCallRecord> {
    let mut window = CaptureWindow::new();
    window.observe_all(requests);
    window.finish()
}
