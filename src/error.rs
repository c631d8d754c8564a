use thiserror::Error;

/// Errors raised by sessions, resolution and the tool layer
#[derive(Debug, Error)]
pub enum BrowserError {
    /// An interaction was attempted before a session was launched or attached
    #[error("No browser session: {0}")]
    NoSession(String),

    /// No strategy located the requested element in time
    #[error("Element not found: {target}")]
    ElementNotFound { target: String },

    /// The page document could not be loaded
    #[error("Failed to load {url} (status {status:?}): {cause}")]
    FetchFailed {
        url: String,
        status: Option<u16>,
        cause: String,
    },

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A located element did not become interactable within the wait
    #[error("{locator} was not interactable after {after_ms}ms")]
    ElementTimeout { locator: String, after_ms: u64 },

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    /// The underlying page driver reported a failure
    #[error("Page driver error: {0}")]
    DriverFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    /// A batch fill stopped at `field`; `applied` were filled before it and stay filled
    #[error("Batch fill aborted at '{field}' after {applied:?}: {source}")]
    BatchAborted {
        field: String,
        applied: Vec<String>,
        #[source]
        source: Box<BrowserError>,
    },
}

impl BrowserError {
    /// Stable machine-readable category of the error
    pub fn kind(&self) -> &'static str {
        match self {
            BrowserError::NoSession(_) => "precondition",
            BrowserError::ElementNotFound { .. } => "resolution",
            BrowserError::FetchFailed { .. } => "fetch",
            BrowserError::LaunchFailed(_) | BrowserError::ConnectionFailed(_) => "session",
            BrowserError::NavigationFailed(_) => "navigation",
            BrowserError::Timeout { .. } | BrowserError::ElementTimeout { .. } => "timeout",
            BrowserError::DriverFailed(_) => "driver",
            BrowserError::InvalidArgument(_) => "invalid_argument",
            BrowserError::ToolExecutionFailed { .. } => "tool",
            BrowserError::BatchAborted { source, .. } => source.kind(),
        }
    }

    /// Shorthand for a resolution failure naming the original input
    pub fn not_found(target: impl Into<String>) -> Self {
        BrowserError::ElementNotFound { target: target.into() }
    }
}

impl From<anyhow::Error> for BrowserError {
    fn from(err: anyhow::Error) -> Self {
        BrowserError::DriverFailed(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, BrowserError>;
