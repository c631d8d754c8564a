use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::browser::driver::{NavigationOutcome, PageDriver, Query, WaitPolicy};
use crate::error::{BrowserError, Result};
use crate::network::{RequestDescriptor, ResourceCategory};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Network::events::ResponseReceivedEventParams;
use headless_chrome::protocol::cdp::Network::{GetResponseBodyReturnObject, ResourceType};
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::util::Timeout as WaitTimeout;
use headless_chrome::{Browser, Element, Tab};
use std::ffi::OsStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// HTTP status of the main document, via the Navigation Timing API
const NAVIGATION_STATUS_JS: &str = r#"
    (function() {
        const entry = performance.getEntriesByType('navigation')[0];
        return entry && entry.responseStatus ? entry.responseStatus : null;
    })()
"#;

const FILL_VALUE_JS: &str = include_str!("fill_value.js");

/// Upper bound for reading markup, URL or title
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// A single Chrome tab driven over CDP
pub struct ChromePage {
    /// Keeps the browser process (or connection) alive
    browser: Browser,

    tab: Arc<Tab>,

    capturing: Arc<AtomicBool>,

    captured: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl ChromePage {
    /// Launch a new browser and open a tab. Blocking.
    pub fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive between agent steps (default is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path.clone();
        launch_opts.user_data_dir = options.user_data_dir.clone();
        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Self::with_tab(browser, tab)
    }

    /// Attach to a running browser over its DevTools WebSocket. Blocking.
    pub fn connect(options: &ConnectionOptions) -> Result<Self> {
        let browser =
            Browser::connect(options.ws_url.clone()).map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::ConnectionFailed(format!("Failed to create tab: {}", e)))?;

        Self::with_tab(browser, tab)
    }

    fn with_tab(browser: Browser, tab: Arc<Tab>) -> Result<Self> {
        let page = Self {
            browser,
            tab,
            capturing: Arc::new(AtomicBool::new(false)),
            captured: Arc::new(Mutex::new(Vec::new())),
        };
        page.install_request_listener()?;
        Ok(page)
    }

    /// Enable the Network domain and record requests while a capture is open
    fn install_request_listener(&self) -> Result<()> {
        // Registering a response handler is what enables Network events on the tab
        self.tab
            .register_response_handling("page-contract", Box::new(ignore_response))
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to enable network events: {}", e)))?;

        let capturing = Arc::clone(&self.capturing);
        let captured = Arc::clone(&self.captured);
        self.tab
            .add_event_listener(Arc::new(move |event: &Event| {
                let Event::NetworkRequestWillBeSent(sent) = event else {
                    return;
                };
                if !capturing.load(Ordering::SeqCst) {
                    return;
                }

                let request = &sent.params.request;
                let category = sent.params.Type.as_ref().map_or(ResourceCategory::Other, resource_category);
                let mut descriptor = RequestDescriptor::new(request.method.clone(), request.url.clone(), category);
                descriptor.body_text = request.post_data.clone();

                if let Ok(mut buffer) = captured.lock() {
                    buffer.push(descriptor);
                }
            }))
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to listen for requests: {}", e)))?;

        Ok(())
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Get the driven tab
    pub fn tab(&self) -> Arc<Tab> {
        Arc::clone(&self.tab)
    }

    /// Run a blocking CDP call off the async runtime, bounded by `timeout`
    async fn blocking<T, F>(&self, operation: &str, timeout: Duration, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Tab>) -> anyhow::Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        let task = tokio::task::spawn_blocking(move || f(tab));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result.map_err(BrowserError::from),
            Ok(Err(join_error)) => Err(BrowserError::DriverFailed(format!("{} task failed: {}", operation, join_error))),
            Err(_) => Err(BrowserError::Timeout {
                operation: operation.to_string(),
                after_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

fn ignore_response(
    _params: ResponseReceivedEventParams,
    _fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>,
) {
}

fn resource_category(resource_type: &ResourceType) -> ResourceCategory {
    match resource_type {
        ResourceType::Document => ResourceCategory::Document,
        ResourceType::Xhr => ResourceCategory::Xhr,
        ResourceType::Fetch => ResourceCategory::Fetch,
        ResourceType::Script => ResourceCategory::Script,
        ResourceType::Stylesheet => ResourceCategory::Stylesheet,
        ResourceType::Image => ResourceCategory::Image,
        ResourceType::Font => ResourceCategory::Font,
        ResourceType::Media => ResourceCategory::Media,
        _ => ResourceCategory::Other,
    }
}

/// Wait for `query`; `Ok(None)` when the wait ran out
fn wait_for<'a>(tab: &'a Tab, query: &Query, timeout: Duration) -> anyhow::Result<Option<Element<'a>>> {
    let waited = match query {
        Query::Css(selector) => tab.wait_for_element_with_custom_timeout(selector, timeout),
        Query::XPath(xpath) => tab.wait_for_xpath_with_custom_timeout(xpath, timeout),
    };
    match waited {
        Ok(element) => Ok(Some(element)),
        Err(e) if e.is::<WaitTimeout>() => Ok(None),
        Err(e) => Err(e),
    }
}

fn element_timeout(query: &Query, timeout: Duration) -> BrowserError {
    BrowserError::ElementTimeout {
        locator: query.to_string(),
        after_ms: timeout.as_millis() as u64,
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str, wait: WaitPolicy, timeout: Duration) -> Result<NavigationOutcome> {
        let url = url.to_string();
        self.blocking("navigate", timeout, move |tab| {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)?;
            if wait == WaitPolicy::Load {
                tab.wait_until_navigated()?;
            }

            let status_code = tab
                .evaluate(NAVIGATION_STATUS_JS, false)
                .ok()
                .and_then(|object| object.value)
                .and_then(|value| value.as_u64())
                .and_then(|status| u16::try_from(status).ok());

            Ok(NavigationOutcome {
                final_url: tab.get_url(),
                status_code,
                title: tab.get_title().unwrap_or_default(),
            })
        })
        .await
    }

    async fn probe(&self, query: &Query, timeout: Duration) -> Result<bool> {
        let query = query.clone();
        self.blocking("probe", timeout, move |tab| {
            let found = match &query {
                Query::Css(selector) => tab.find_element(selector).is_ok(),
                Query::XPath(xpath) => tab.find_element_by_xpath(xpath).is_ok(),
            };
            Ok(found)
        })
        .await
    }

    async fn click(&self, query: &Query, timeout: Duration) -> Result<()> {
        let waited = query.clone();
        // Allow the click itself to complete after the element appears
        let clicked = self
            .blocking("click", timeout * 2, move |tab| {
                let Some(element) = wait_for(&tab, &waited, timeout)? else {
                    return Ok(false);
                };
                element.click()?;
                Ok(true)
            })
            .await?;

        if clicked { Ok(()) } else { Err(element_timeout(query, timeout)) }
    }

    async fn fill(&self, query: &Query, text: &str, timeout: Duration) -> Result<()> {
        let waited = query.clone();
        let text = text.to_string();
        let filled = self
            .blocking("fill", timeout * 2, move |tab| {
                let Some(element) = wait_for(&tab, &waited, timeout)? else {
                    return Ok(false);
                };
                element.call_js_fn(FILL_VALUE_JS, vec![serde_json::Value::String(text)], false)?;
                Ok(true)
            })
            .await?;

        if filled { Ok(()) } else { Err(element_timeout(query, timeout)) }
    }

    async fn content(&self) -> Result<String> {
        self.blocking("content", READ_TIMEOUT, |tab| tab.get_content()).await
    }

    async fn current_url(&self) -> Result<String> {
        self.blocking("current_url", READ_TIMEOUT, |tab| Ok(tab.get_url())).await
    }

    async fn title(&self) -> Result<String> {
        self.blocking("title", READ_TIMEOUT, |tab| tab.get_title()).await
    }

    async fn begin_capture(&self) -> Result<()> {
        if let Ok(mut buffer) = self.captured.lock() {
            buffer.clear();
        }
        self.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn end_capture(&self) -> Result<Vec<RequestDescriptor>> {
        self.capturing.store(false, Ordering::SeqCst);
        let mut buffer = self
            .captured
            .lock()
            .map_err(|e| BrowserError::DriverFailed(format!("Capture buffer poisoned: {}", e)))?;
        Ok(std::mem::take(&mut *buffer))
    }

    async fn close(&self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        // headless_chrome closes the process when the Browser is dropped; closing the tab
        // releases the page right away
        self.blocking("close", READ_TIMEOUT, |tab| tab.close(false).map(|_| ())).await
    }
}
