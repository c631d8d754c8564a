//! Action resolution against a live page
//!
//! Maps a requested label, selector or field name onto a concrete element by
//! walking an ordered chain of [`MatchStrategy`] implementations. The first
//! strategy whose probe matches wins; nothing is retried.

pub mod strategy;

pub use strategy::{Locator, MatchStrategy, click_chain, fill_chain, is_selector_shaped};

use crate::browser::{PageDriver, SessionConfig};
use crate::error::{BrowserError, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Result of a successful click
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClickReport {
    /// The input exactly as requested
    pub target: String,
    /// Name of the strategy that matched
    pub strategy: String,
    pub locator: String,
}

/// Result of a successful fill
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub field: String,
    /// Value as typed into the element
    pub value: String,
    pub strategy: String,
}

/// Timeouts and bounds the resolver works with
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub action_timeout: Duration,
    pub probe_timeout: Duration,
    pub selector_length_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for ResolverConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            action_timeout: config.action_timeout,
            probe_timeout: config.probe_timeout,
            selector_length_limit: config.selector_length_limit,
        }
    }
}

/// Coerce a JSON value to the text typed into a field
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A matched element that never became interactable is still "not found";
/// any other driver failure passes through untouched
fn not_interactable(target: &str, locator: &Locator, err: BrowserError) -> BrowserError {
    match err {
        BrowserError::ElementTimeout { .. } => {
            log::warn!("'{}' matched {} but {}", target, locator, err);
            BrowserError::not_found(target)
        }
        other => other,
    }
}

/// Resolves and performs click and fill operations on one page
pub struct ActionResolver<'a> {
    page: &'a dyn PageDriver,
    config: ResolverConfig,
}

impl<'a> ActionResolver<'a> {
    pub fn new(page: &'a dyn PageDriver, config: ResolverConfig) -> Self {
        Self { page, config }
    }

    /// Walk `chain` and return the first strategy that matches `target`
    async fn resolve(&self, target: &str, chain: &[Box<dyn MatchStrategy>]) -> Result<(&'static str, Locator)> {
        for strategy in chain {
            match strategy.find(self.page, target, self.config.probe_timeout).await {
                Ok(Some(locator)) => {
                    log::debug!("'{}' matched by {} as {}", target, strategy.name(), locator);
                    return Ok((strategy.name(), locator));
                }
                Ok(None) => log::debug!("'{}' not matched by {}", target, strategy.name()),
                // Invalid selector syntax only rules out the selector strategy
                Err(e) if strategy.probe_errors_are_misses() => {
                    log::debug!("'{}' probe failed for {}: {}", target, strategy.name(), e)
                }
                Err(e) => {
                    log::warn!("'{}' probe failed for {}: {}", target, strategy.name(), e);
                    return Err(e);
                }
            }
        }

        log::warn!("No strategy matched '{}'", target);
        Err(BrowserError::not_found(target))
    }

    /// Click the element best matching `target` (selector, button, link, then text)
    pub async fn click(&self, target: &str) -> Result<ClickReport> {
        let chain = click_chain(target, self.config.selector_length_limit);
        let (strategy, locator) = self.resolve(target, &chain).await?;

        self.page
            .click(&locator.to_query(), self.config.action_timeout)
            .await
            .map_err(|e| not_interactable(target, &locator, e))?;

        Ok(ClickReport {
            target: target.to_string(),
            strategy: strategy.to_string(),
            locator: locator.to_string(),
        })
    }

    /// Fill the field best matching `field` (name, label, then placeholder)
    pub async fn fill(&self, field: &str, value: &Value) -> Result<FillReport> {
        let chain = fill_chain();
        let (strategy, locator) = self.resolve(field, &chain).await?;
        let text = value_to_text(value);

        self.page
            .fill(&locator.to_query(), &text, self.config.action_timeout)
            .await
            .map_err(|e| not_interactable(field, &locator, e))?;

        Ok(FillReport {
            field: field.to_string(),
            value: text,
            strategy: strategy.to_string(),
        })
    }

    /// Fill fields in the given order, stopping at the first failure.
    ///
    /// Fields filled before the failure are left as they are and named in
    /// [`BrowserError::BatchAborted`].
    pub async fn fill_batch(&self, fields: &IndexMap<String, Value>) -> Result<Vec<FillReport>> {
        let mut reports = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            match self.fill(field, value).await {
                Ok(report) => reports.push(report),
                Err(source) => {
                    return Err(BrowserError::BatchAborted {
                        field: field.clone(),
                        applied: reports.into_iter().map(|r| r.field).collect(),
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(reports)
    }
}
