//! Element matching strategies
//!
//! Each strategy turns a human-readable target into a [`Locator`] and checks
//! whether the live page has a match. Strategies are tried in order and the
//! first match wins.
//!
//! Click chain: CSS (selector-shaped input only) → button name → link name → text.
//! Fill chain: field name → label text → placeholder.

use crate::browser::{PageDriver, Query};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// A typed description of what to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    ButtonName(String),
    LinkName(String),
    TextContains(String),
    FieldName(String),
    LabelText(String),
    Placeholder(String),
}

impl Locator {
    /// Structural query equivalent to this locator
    pub fn to_query(&self) -> Query {
        match self {
            Locator::Css(selector) => Query::Css(selector.clone()),
            Locator::FieldName(name) => {
                let name = css_string(name);
                Query::Css(format!(
                    "input[name={name}], select[name={name}], textarea[name={name}]"
                ))
            }
            Locator::ButtonName(name) => {
                let text = ci_contains("normalize-space(.)", name);
                let aria = ci_contains("@aria-label", name);
                let title = ci_contains("@title", name);
                let value = ci_contains("@value", name);
                Query::XPath(format!(
                    "//button[{text} or {aria} or {title}] \
                     | //*[@role='button'][{text} or {aria}] \
                     | //input[@type='submit' or @type='button' or @type='image'][{value} or {aria}]"
                ))
            }
            Locator::LinkName(name) => {
                let text = ci_contains("normalize-space(.)", name);
                let aria = ci_contains("@aria-label", name);
                let title = ci_contains("@title", name);
                Query::XPath(format!(
                    "//a[@href][{text} or {aria} or {title}] | //*[@role='link'][{text} or {aria}]"
                ))
            }
            Locator::TextContains(text) => {
                let matches = ci_contains("normalize-space(.)", text);
                // Deepest element whose text contains the target
                Query::XPath(format!(
                    "//body//*[not(self::script or self::style)][{matches}][not(.//*[{matches}])]"
                ))
            }
            Locator::LabelText(label) => {
                let matches = ci_contains("normalize-space(.)", label);
                let aria = ci_contains("@aria-label", label);
                Query::XPath(format!(
                    "//*[self::input or self::select or self::textarea][@id = //label[{matches}]/@for] \
                     | //label[{matches}]//*[self::input or self::select or self::textarea] \
                     | //*[self::input or self::select or self::textarea][{aria}]"
                ))
            }
            Locator::Placeholder(text) => {
                let matches = ci_contains("@placeholder", text);
                Query::XPath(format!("//*[self::input or self::textarea][{matches}]"))
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css '{s}'"),
            Locator::ButtonName(s) => write!(f, "button named '{s}'"),
            Locator::LinkName(s) => write!(f, "link named '{s}'"),
            Locator::TextContains(s) => write!(f, "text containing '{s}'"),
            Locator::FieldName(s) => write!(f, "field named '{s}'"),
            Locator::LabelText(s) => write!(f, "field labelled '{s}'"),
            Locator::Placeholder(s) => write!(f, "placeholder '{s}'"),
        }
    }
}

/// Quote a string as an XPath 1.0 literal
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let parts: Vec<String> = s.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Quote a string as a CSS attribute value
pub fn css_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// ASCII case-insensitive XPath containment test of `expr` against `needle`
fn ci_contains(expr: &str, needle: &str) -> String {
    format!(
        "contains(translate({expr}, '{UPPER}', '{LOWER}'), {})",
        xpath_literal(&needle.to_ascii_lowercase())
    )
}

/// Whether the input looks like a CSS selector rather than a label
pub fn is_selector_shaped(input: &str) -> bool {
    let s = input.trim();
    if s.is_empty() || s.contains(char::is_whitespace) && !s.contains(['>', '[', '=']) {
        return false;
    }
    if s.starts_with(['#', '.', '[']) || s.contains(['[', ']', '>', '=']) {
        return true;
    }

    // tag.class, tag#id, tag:pseudo
    let tag_len = s
        .chars()
        .take_while(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .count();
    tag_len > 0 && s[tag_len..].starts_with(['.', '#', ':'])
}

/// One way of finding an element for a target string
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Locator for `target`, or `None` when this strategy does not apply
    fn locator(&self, target: &str) -> Option<Locator>;

    /// Whether a failed probe only means "no match". True where the query
    /// text comes straight from the caller and may not parse.
    fn probe_errors_are_misses(&self) -> bool {
        false
    }

    /// Probe the page; `Some` when at least one element matches
    async fn find(&self, page: &dyn PageDriver, target: &str, timeout: Duration) -> Result<Option<Locator>> {
        let Some(locator) = self.locator(target) else {
            return Ok(None);
        };
        if page.probe(&locator.to_query(), timeout).await? {
            Ok(Some(locator))
        } else {
            Ok(None)
        }
    }
}

fn trimmed(target: &str) -> Option<String> {
    let t = target.split_whitespace().collect::<Vec<_>>().join(" ");
    if t.is_empty() { None } else { Some(t) }
}

/// Direct structural lookup for short selector-shaped input
pub struct CssStrategy {
    pub max_len: usize,
}

impl MatchStrategy for CssStrategy {
    fn name(&self) -> &'static str {
        "css"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        let target = target.trim();
        (target.len() <= self.max_len && is_selector_shaped(target)).then(|| Locator::Css(target.to_string()))
    }

    fn probe_errors_are_misses(&self) -> bool {
        true
    }
}

/// Accessible button name
pub struct ButtonNameStrategy;

impl MatchStrategy for ButtonNameStrategy {
    fn name(&self) -> &'static str {
        "button_name"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        trimmed(target).map(Locator::ButtonName)
    }
}

/// Accessible link name
pub struct LinkNameStrategy;

impl MatchStrategy for LinkNameStrategy {
    fn name(&self) -> &'static str {
        "link_name"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        trimmed(target).map(Locator::LinkName)
    }
}

/// Full-text containment
pub struct TextStrategy;

impl MatchStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        trimmed(target).map(Locator::TextContains)
    }
}

/// Exact `name` attribute on input/select/textarea
pub struct FieldNameStrategy;

impl MatchStrategy for FieldNameStrategy {
    fn name(&self) -> &'static str {
        "field_name"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        let target = target.trim();
        (!target.is_empty()).then(|| Locator::FieldName(target.to_string()))
    }
}

/// Associated `<label>` text
pub struct LabelStrategy;

impl MatchStrategy for LabelStrategy {
    fn name(&self) -> &'static str {
        "label"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        trimmed(target).map(Locator::LabelText)
    }
}

pub struct PlaceholderStrategy;

impl MatchStrategy for PlaceholderStrategy {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn locator(&self, target: &str) -> Option<Locator> {
        trimmed(target).map(Locator::Placeholder)
    }
}

/// Ordered strategies for resolving a click target
pub fn click_chain(target: &str, selector_length_limit: usize) -> Vec<Box<dyn MatchStrategy>> {
    let mut chain: Vec<Box<dyn MatchStrategy>> = Vec::with_capacity(4);
    if is_selector_shaped(target) && target.trim().len() <= selector_length_limit {
        chain.push(Box::new(CssStrategy { max_len: selector_length_limit }));
    }
    chain.push(Box::new(ButtonNameStrategy));
    chain.push(Box::new(LinkNameStrategy));
    chain.push(Box::new(TextStrategy));
    chain
}

/// Ordered strategies for resolving a field to fill
pub fn fill_chain() -> Vec<Box<dyn MatchStrategy>> {
    vec![Box::new(FieldNameStrategy), Box::new(LabelStrategy), Box::new(PlaceholderStrategy)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_shape() {
        for selector in ["#submit", ".btn-primary", "[data-test=go]", "form > button", "button.primary", "a:nth-child(2)", "input[name=q]"] {
            assert!(is_selector_shaped(selector), "{selector}");
        }
        for label in ["Sign in", "Sign up.", "Add to cart", "Price: $5", "", "Continue"] {
            assert!(!is_selector_shaped(label), "{label}");
        }
    }

    #[test]
    fn test_click_chain_order() {
        let names = |chain: Vec<Box<dyn MatchStrategy>>| chain.iter().map(|s| s.name()).collect::<Vec<_>>();

        assert_eq!(names(click_chain("#go", 120)), vec!["css", "button_name", "link_name", "text"]);
        assert_eq!(names(click_chain("Sign in", 120)), vec!["button_name", "link_name", "text"]);

        let long = format!("#{}", "a".repeat(200));
        assert_eq!(names(click_chain(&long, 120)), vec!["button_name", "link_name", "text"]);
        assert_eq!(names(fill_chain()), vec!["field_name", "label", "placeholder"]);
    }

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("plain"), "'plain'");
        assert_eq!(xpath_literal("it's"), "\"it's\"");
        assert_eq!(xpath_literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    #[test]
    fn test_field_name_query() {
        let query = Locator::FieldName(r#"user"name"#.to_string()).to_query();
        assert_eq!(
            query,
            Query::Css(r#"input[name="user\"name"], select[name="user\"name"], textarea[name="user\"name"]"#.to_string())
        );
    }

    #[test]
    fn test_name_queries_are_case_insensitive() {
        let Query::XPath(xpath) = Locator::ButtonName("Sign In".to_string()).to_query() else {
            panic!("expected xpath");
        };
        assert!(xpath.contains("'sign in'"));
        assert!(xpath.contains("translate(normalize-space(.)"));
        assert!(xpath.starts_with("//button["));
    }

    #[test]
    fn test_blank_targets_do_not_apply() {
        assert!(ButtonNameStrategy.locator("   ").is_none());
        assert!(FieldNameStrategy.locator("").is_none());
        assert_eq!(TextStrategy.locator("  Buy   now "), Some(Locator::TextContains("Buy now".to_string())));
        assert!(CssStrategy { max_len: 3 }.locator("#abcdef").is_none());
    }
}
