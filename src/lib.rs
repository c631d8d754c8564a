//! # page-contract
//!
//! Turn web pages into stable, named action contracts, and resolve those
//! actions back onto live pages via Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Contract synthesis**: forms, buttons, links and observed XHR/fetch calls
//!   become uniquely named actions with shallow parameter schemas
//! - **Action resolution**: click or fill by label, accessible name, field name,
//!   placeholder or CSS selector through an ordered chain of strategies
//! - **Live snapshots**: a bounded summary of what is currently rendered
//! - **Tool system**: the same operations as named tools with JSON-schema parameters
//!
//! ## Contracts from markup
//!
//! Extraction and synthesis need no browser:
//!
//! ```rust
//! use page_contract::contract::{SynthesisOptions, contract_from_html};
//!
//! let html = r#"<form method="post"><input name="email" type="email" required>
//!               <button type="submit">Join</button></form>"#;
//! let contract = contract_from_html(html, &[], SynthesisOptions::default());
//!
//! let join = contract.action("join").unwrap();
//! assert_eq!(join.method, "POST");
//! assert_eq!(join.schema.keys().collect::<Vec<_>>(), vec!["email"]);
//! ```
//!
//! ## Live pages
//!
//! ```rust,no_run
//! use page_contract::{LaunchOptions, Session, SessionConfig, SynthesisOptions};
//!
//! # async fn run() -> page_contract::Result<()> {
//! let mut session = Session::new(SessionConfig::default());
//! session.launch(LaunchOptions::default()).await?;
//!
//! // Load the page, capture its network calls and describe it
//! let contract = session.generate_contract("https://example.com", SynthesisOptions::new()).await?;
//! println!("{}", contract.to_json().unwrap_or_default());
//!
//! session.fill("email", &serde_json::json!("ada@example.com")).await?;
//! session.click("Subscribe").await?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust,no_run
//! use page_contract::Session;
//! use page_contract::tools::{ToolContext, ToolRegistry};
//! use serde_json::json;
//!
//! # async fn run() {
//! let mut session = Session::default();
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(&mut session);
//!
//! registry.dispatch("launch", json!({}), &mut context).await;
//! registry.dispatch("navigate", json!({ "url": "example.com" }), &mut context).await;
//! let result = registry.dispatch("click", json!({ "target": "More information" }), &mut context).await;
//! println!("{}", result.to_response());
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: sessions, the [`PageDriver`] seam and the Chrome driver
//! - [`dom`]: structural extraction and snapshots
//! - [`network`]: request normalization and body schema inference
//! - [`contract`]: naming and contract synthesis
//! - [`resolver`]: click/fill resolution strategies
//! - [`tools`]: named operations over a session
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod contract;
pub mod dom;
pub mod error;
pub mod network;
pub mod resolver;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{
    ChromePage, ConnectionOptions, LaunchOptions, PageDriver, Query, Session, SessionConfig, SessionState, WaitPolicy,
};
pub use contract::{ActionRecord, ContractDocument, NetworkAction, SynthesisOptions};
pub use dom::{PageStructure, SnapshotDocument, SnapshotLimits, ValueType};
pub use error::{BrowserError, Result};
pub use network::{NetworkCallRecord, RequestDescriptor, ResourceCategory};
pub use resolver::{ActionResolver, ClickReport, FillReport};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
