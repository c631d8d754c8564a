//! Structural extraction of forms, buttons and links from raw markup.
//!
//! Extraction never fails: html5ever recovers from malformed markup, and every
//! record that lacks a label gets a positional fallback instead.

use crate::dom::element::{
    ButtonRecord, FieldRecord, FormMethod, FormRecord, InteractiveElement, LinkRecord,
};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Controls that are buttons by element or role
const NATIVE_BUTTON_SELECTOR: &str =
    "button, input[type=submit], input[type=image], input[type=button], [role=button]";

/// Union of button-like signatures, native and heuristic
const BUTTON_SELECTOR: &str = "button, input[type=submit], input[type=image], input[type=button], \
     [role=button], [class*=btn], [class*=button], [data-action], [onclick]";

/// Attributes consulted, in order, when a button has no visible text
const BUTTON_LABEL_ATTRIBUTES: [&str; 6] =
    ["value", "aria-label", "title", "data-label", "data-action", "alt"];

struct Selectors {
    form: Selector,
    field: Selector,
    submit: Selector,
    button: Selector,
    native_button: Selector,
    link: Selector,
    label: Selector,
    title: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        form: Selector::parse("form").expect("form selector is valid"),
        field: Selector::parse("input[name], select[name], textarea[name]")
            .expect("field selector is valid"),
        submit: Selector::parse("button, input").expect("submit selector is valid"),
        button: Selector::parse(BUTTON_SELECTOR).expect("button selector is valid"),
        native_button: Selector::parse(NATIVE_BUTTON_SELECTOR)
            .expect("native button selector is valid"),
        link: Selector::parse("a[href]").expect("link selector is valid"),
        label: Selector::parse("label[for]").expect("label selector is valid"),
        title: Selector::parse("title").expect("title selector is valid"),
    })
}

/// Interactive affordances found in one markup document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageStructure {
    /// Document `<title>`, if any
    pub title: Option<String>,
    pub forms: Vec<FormRecord>,
    pub buttons: Vec<ButtonRecord>,
    pub links: Vec<LinkRecord>,
}

impl PageStructure {
    /// Parse markup and extract every form, button and link
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let labels = collect_labels(&document);

        let structure = Self {
            title: extract_title(&document),
            forms: extract_forms(&document, &labels),
            buttons: extract_buttons(&document),
            links: extract_links(&document),
        };

        log::debug!(
            "Extracted {} forms, {} buttons, {} links",
            structure.forms.len(),
            structure.buttons.len(),
            structure.links.len()
        );
        structure
    }

    /// All records as one discriminated sequence: forms, then buttons, then links
    pub fn elements(&self) -> impl Iterator<Item = InteractiveElement<'_>> {
        self.forms
            .iter()
            .map(InteractiveElement::Form)
            .chain(self.buttons.iter().map(InteractiveElement::Button))
            .chain(self.links.iter().map(InteractiveElement::Link))
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty() && self.buttons.is_empty() && self.links.is_empty()
    }
}

/// Collapse runs of whitespace in an element's text content
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty_attr(el: &ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(collapse_whitespace)
        .filter(|v| !v.is_empty())
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&selectors().title)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

/// `label[for]` text keyed by the id it points at
fn collect_labels(document: &Html) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for label in document.select(&selectors().label) {
        let Some(target) = label.value().attr("for") else {
            continue;
        };
        let text = element_text(&label);
        if !text.is_empty() {
            labels.entry(target.to_string()).or_insert(text);
        }
    }
    labels
}

fn is_inside(el: &ElementRef<'_>, tag: &str) -> bool {
    el.ancestors()
        .any(|node| node.value().as_element().is_some_and(|e| e.name() == tag))
}

/// Text of an enclosing `<label>`, leaving out the control's own text
fn wrapping_label_text(el: &ElementRef<'_>) -> Option<String> {
    let label = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "label")?;

    let text: Vec<&str> = label
        .descendants()
        .filter(|node| !node.ancestors().any(|a| a.id() == el.id()))
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    Some(collapse_whitespace(&text.join(" "))).filter(|t| !t.is_empty())
}

fn extract_forms(document: &Html, labels: &HashMap<String, String>) -> Vec<FormRecord> {
    let sel = selectors();
    let mut forms = Vec::new();

    for form_el in document.select(&sel.form) {
        let method = FormMethod::parse(form_el.value().attr("method"));
        let target = form_el.value().attr("action").unwrap_or("").trim().to_string();
        let mut form = FormRecord::new(method, target);
        form.id = non_empty_attr(&form_el, "id");

        for field_el in form_el.select(&sel.field) {
            let Some(name) = non_empty_attr(&field_el, "name") else {
                continue;
            };
            let input_type = match field_el.value().name() {
                "input" => field_el
                    .value()
                    .attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "text".to_string()),
                other => other.to_string(),
            };

            let mut field = FieldRecord::new(name, input_type)
                .with_required(field_el.value().attr("required").is_some());

            let label = non_empty_attr(&field_el, "id")
                .and_then(|id| labels.get(&id).cloned())
                .or_else(|| wrapping_label_text(&field_el))
                .or_else(|| non_empty_attr(&field_el, "aria-label"));
            if let Some(label) = label {
                field = field.with_label(label);
            }
            if let Some(placeholder) = non_empty_attr(&field_el, "placeholder") {
                field = field.with_placeholder(placeholder);
            }

            if !form.push_field(field) {
                log::debug!("Skipping repeated field name in form '{}'", form.target);
            }
        }

        if let Some(label) = form_el.select(&sel.submit).find_map(|el| submit_label(&el)) {
            form.submit_label = label;
        }

        forms.push(form);
    }

    forms
}

/// Label of a submit-capable control, `None` for anything else
fn submit_label(el: &ElementRef<'_>) -> Option<String> {
    let control_type = el
        .value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let label = match el.value().name() {
        "button" if control_type.is_empty() || control_type == "submit" => {
            Some(element_text(el)).filter(|t| !t.is_empty())
        }
        "input" if control_type == "submit" || control_type == "image" => {
            non_empty_attr(el, "value").or_else(|| non_empty_attr(el, "alt"))
        }
        _ => return None,
    };

    // A submit control without text still ends the search
    Some(label.unwrap_or_else(|| "submit".to_string()))
}

/// A class, `data-action` or `onclick` match that wraps real buttons, or
/// sits inside one, is not a control of its own
fn is_wrapper_match(el: &ElementRef<'_>) -> bool {
    let sel = selectors();
    if sel.native_button.matches(el) {
        return false;
    }

    let wraps_button = el
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|d| sel.button.matches(&d));
    let inside_button = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| sel.native_button.matches(&a));

    wraps_button || inside_button
}

fn extract_buttons(document: &Html) -> Vec<ButtonRecord> {
    document
        .select(&selectors().button)
        .filter(|el| !is_wrapper_match(el))
        .enumerate()
        .map(|(i, el)| {
            let text = element_text(&el);
            let label = Some(text)
                .filter(|t| !t.is_empty())
                .or_else(|| {
                    BUTTON_LABEL_ATTRIBUTES
                        .iter()
                        .find_map(|attr| non_empty_attr(&el, attr))
                })
                .unwrap_or_else(|| format!("button_{}", i + 1));

            ButtonRecord {
                label,
                identifier: non_empty_attr(&el, "id"),
                class_hint: non_empty_attr(&el, "class"),
                in_form: is_inside(&el, "form"),
            }
        })
        .collect()
}

/// Whether an href points somewhere a navigation can follow
pub(crate) fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.to_ascii_lowercase().starts_with("javascript:"))
}

fn extract_links(document: &Html) -> Vec<LinkRecord> {
    document
        .select(&selectors().link)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim().to_string();
            if !is_navigable_href(&href) {
                return None;
            }

            let text = element_text(&el);
            let label = Some(text)
                .filter(|t| !t.is_empty())
                .or_else(|| non_empty_attr(&el, "aria-label"))
                .or_else(|| non_empty_attr(&el, "title"))
                .unwrap_or_default();

            Some(LinkRecord {
                label,
                identifier: non_empty_attr(&el, "id"),
                href,
                class_hint: non_empty_attr(&el, "class"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::ValueType;

    #[test]
    fn test_form_extraction() {
        let html = r#"
            <form method="POST" action="/signup">
                <label for="mail">Email address</label>
                <input id="mail" name="email" type="email" required>
                <input name="age" type="number">
                <label><input name="terms" type="checkbox"> I agree</label>
                <input type="text" placeholder="no name, ignored">
                <select name="plan"><option>Free</option></select>
                <textarea name="bio"></textarea>
                <button type="submit">Create account</button>
            </form>
        "#;

        let page = PageStructure::from_html(html);
        assert_eq!(page.forms.len(), 1);

        let form = &page.forms[0];
        assert_eq!(form.method, FormMethod::Post);
        assert_eq!(form.target, "/signup");
        assert_eq!(form.submit_label, "Create account");

        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["email", "age", "terms", "plan", "bio"]);

        let email = form.field("email").unwrap();
        assert!(email.required);
        assert_eq!(email.value_type, ValueType::String);
        assert_eq!(email.label.as_deref(), Some("Email address"));

        assert_eq!(form.field("age").unwrap().value_type, ValueType::Number);
        assert_eq!(form.field("terms").unwrap().value_type, ValueType::Boolean);
        assert_eq!(form.field("terms").unwrap().label.as_deref(), Some("I agree"));
        assert_eq!(form.field("plan").unwrap().input_type, "select");
        assert_eq!(form.field("bio").unwrap().value_type, ValueType::String);
    }

    #[test]
    fn test_form_defaults() {
        let html = r#"<form method="delete"><input name="q"></form>"#;
        let form = &PageStructure::from_html(html).forms[0];

        assert_eq!(form.method, FormMethod::Get);
        assert_eq!(form.target, "");
        assert_eq!(form.submit_label, "submit");
        assert_eq!(form.fields[0].input_type, "text");
    }

    #[test]
    fn test_submit_label_skips_plain_buttons() {
        let html = r#"
            <form>
                <button type="button">Toggle</button>
                <button type="reset">Clear</button>
                <input type="submit" value="Search now">
            </form>
        "#;
        let form = &PageStructure::from_html(html).forms[0];
        assert_eq!(form.submit_label, "Search now");
    }

    #[test]
    fn test_button_signatures_and_labels() {
        let html = r#"
            <button id="go">  Go   now </button>
            <input type="submit" value="Send">
            <div role="button" aria-label="Close dialog"></div>
            <span class="primary-btn" title="Help"></span>
            <a data-action="share"></a>
            <div onclick="doIt()"><img></div>
            <p>Not a button</p>
        "#;

        let page = PageStructure::from_html(html);
        let labels: Vec<_> = page.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Go now", "Send", "Close dialog", "Help", "share", "button_6"]);
        assert_eq!(page.buttons[0].identifier.as_deref(), Some("go"));
        assert_eq!(page.buttons[3].class_hint.as_deref(), Some("primary-btn"));
        assert!(page.buttons.iter().all(|b| !b.in_form));
    }

    #[test]
    fn test_button_label_fallback_order() {
        let html = r#"
            <input type="button" value="Apply" aria-label="Apply filters">
            <div role="button" aria-label="Next" title="Go to next page"></div>
            <span class="btn" data-label="Dismiss" data-action="close"></span>
            <a class="btn-icon" alt="Print"></a>
            <button title="Ignored">Visible wins</button>
        "#;

        let labels: Vec<_> = PageStructure::from_html(html)
            .buttons
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["Apply", "Next", "Dismiss", "Print", "Visible wins"]);
    }

    #[test]
    fn test_button_group_wrapper_is_not_a_button() {
        let html = r#"
            <div class="button-group"><button>Save</button><button>Cancel</button></div>
            <div onclick="track()"><a role="button">Share</a></div>
        "#;

        let labels: Vec<_> = PageStructure::from_html(html)
            .buttons
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["Save", "Cancel", "Share"]);
    }

    #[test]
    fn test_styled_child_of_button_is_not_a_second_button() {
        let html = r#"<button id="go"><span class="btn-label">Go</span></button><div class="btn">Alone</div>"#;
        let page = PageStructure::from_html(html);

        let labels: Vec<_> = page.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Go", "Alone"]);
        assert_eq!(page.buttons[0].identifier.as_deref(), Some("go"));
    }

    #[test]
    fn test_wrapping_label_excludes_control_text() {
        let html = r#"
            <form>
                <label>Country <select name="country"><option>United States</option><option>Canada</option></select></label>
                <label>Notes <textarea name="notes">draft text</textarea> (optional)</label>
            </form>
        "#;
        let form = &PageStructure::from_html(html).forms[0];

        assert_eq!(form.field("country").unwrap().label.as_deref(), Some("Country"));
        assert_eq!(form.field("notes").unwrap().label.as_deref(), Some("Notes (optional)"));
    }

    #[test]
    fn test_button_in_form_flag() {
        let html = r#"<form><button>Join</button></form><button>Later</button>"#;
        let page = PageStructure::from_html(html);

        assert!(page.buttons[0].in_form);
        assert!(!page.buttons[1].in_form);
    }

    #[test]
    fn test_link_filtering() {
        let html = r##"
            <a href="/docs">Docs</a>
            <a href="#top">Top</a>
            <a href="">Empty</a>
            <a href="JavaScript:void(0)">Script</a>
            <a>No href</a>
            <a id="cart" href="https://shop.example.com/cart"></a>
        "##;

        let page = PageStructure::from_html(html);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.links[0].label, "Docs");
        assert_eq!(page.links[1].label, "");
        assert_eq!(page.links[1].identifier.as_deref(), Some("cart"));
    }

    #[test]
    fn test_malformed_markup_never_fails() {
        let page = PageStructure::from_html("<form method=<<post><input name='a' <button>Go</form></div></div>");
        assert_eq!(page.forms.len(), 1);

        let empty = PageStructure::from_html("");
        assert!(empty.is_empty());
        assert_eq!(empty.title, None);
    }

    #[test]
    fn test_title_and_elements_order() {
        let html = r#"<title> My   Shop </title><a href="/x">X</a><button>B</button><form></form>"#;
        let page = PageStructure::from_html(html);

        assert_eq!(page.title.as_deref(), Some("My Shop"));
        let kinds: Vec<_> = page
            .elements()
            .map(|e| match e {
                InteractiveElement::Form(_) => "form",
                InteractiveElement::Button(_) => "button",
                InteractiveElement::Link(_) => "link",
            })
            .collect();
        assert_eq!(kinds, vec!["form", "button", "link"]);
    }
}
