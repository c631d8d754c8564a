//! Contract synthesis: extracted records (+ observed calls) to a named action catalog.
//!
//! Synthesis is a pure function of its inputs. Output order is forms, buttons,
//! links, then network actions, and every name is unique within one call.

use crate::contract::document::{ActionRecord, ContractDocument, NetworkAction, Provenance};
use crate::contract::naming::{
    MAX_NAME_LEN, NameAllocator, derive_contract_name, link_path_slug, network_action_base, slugify,
};
use crate::dom::{ButtonRecord, FormRecord, LinkRecord, PageStructure};
use crate::network::NetworkCallRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Inputs that shape synthesis besides the page itself
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SynthesisOptions {
    /// Caller-supplied contract name
    pub name_hint: Option<String>,

    /// URL the markup was loaded from; relative targets resolve against it
    pub base_url: Option<String>,

    /// List required form fields on each form action
    #[serde(default)]
    pub carry_required: bool,
}

impl SynthesisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the contract name hint
    pub fn name_hint(mut self, hint: impl Into<String>) -> Self {
        self.name_hint = Some(hint.into());
        self
    }

    /// Builder method: set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builder method: carry required-field metadata into actions
    pub fn carry_required(mut self, carry: bool) -> Self {
        self.carry_required = carry;
        self
    }
}

/// Builds a [`ContractDocument`] from extracted page structure
#[derive(Debug, Clone, Default)]
pub struct ContractSynthesizer {
    options: SynthesisOptions,
}

impl ContractSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Synthesize the catalog for one page
    pub fn synthesize(&self, page: &PageStructure, calls: &[NetworkCallRecord]) -> ContractDocument {
        let mut names = NameAllocator::new();
        let mut form_names = HashSet::new();
        let mut actions = Vec::with_capacity(page.forms.len() + page.buttons.len() + page.links.len());

        for (i, form) in page.forms.iter().enumerate() {
            let action = self.form_action(form, i, &mut names);
            form_names.insert(action.name.to_ascii_lowercase());
            actions.push(action);
        }

        for (i, button) in page.buttons.iter().enumerate() {
            let base = non_empty(slugify(&button.label, MAX_NAME_LEN))
                .unwrap_or_else(|| format!("button_{}", i + 1));

            // The form's own submit control is already covered by the form action
            if button.in_form && form_names.contains(&base) {
                log::debug!("Skipping button '{}', covered by form action", button.label);
                continue;
            }
            actions.push(self.button_action(button, &base, &mut names));
        }

        for (i, link) in page.links.iter().enumerate() {
            actions.push(self.link_action(link, i, &mut names));
        }

        let network_actions = calls
            .iter()
            .enumerate()
            .map(|(i, call)| network_action(call, i, &mut names))
            .collect();

        let contract = ContractDocument {
            name: derive_contract_name(self.options.name_hint.as_deref(), page.title.as_deref()),
            actions,
            network_actions,
        };
        log::info!(
            "Synthesized contract '{}' with {} actions and {} network actions",
            contract.name,
            contract.actions.len(),
            contract.network_actions.len()
        );
        contract
    }

    fn form_action(&self, form: &FormRecord, index: usize, names: &mut NameAllocator) -> ActionRecord {
        let base = non_empty(slugify(&form.submit_label, MAX_NAME_LEN))
            .unwrap_or_else(|| format!("form_{}", index + 1));
        let name = names.allocate(&base);
        let endpoint = self.resolve(&form.target);

        let schema: IndexMap<_, _> = form
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value_type))
            .collect();

        let mut description = format!(
            "Submit the '{}' form ({} {})",
            form.submit_label,
            form.method.as_str(),
            endpoint
        );
        if !schema.is_empty() {
            let fields: Vec<&str> = schema.keys().map(String::as_str).collect();
            description.push_str(&format!(" with fields: {}", fields.join(", ")));
        }

        ActionRecord {
            name,
            method: form.method.as_str().to_string(),
            endpoint,
            schema,
            description,
            provenance: Provenance::Form,
            required: if self.options.carry_required {
                form.required_fields()
            } else {
                Vec::new()
            },
        }
    }

    fn button_action(&self, button: &ButtonRecord, base: &str, names: &mut NameAllocator) -> ActionRecord {
        ActionRecord {
            name: names.allocate(base),
            method: "POST".to_string(),
            endpoint: self.resolve(""),
            schema: IndexMap::new(),
            description: format!("Click the '{}' button", button.label),
            provenance: Provenance::Button,
            required: Vec::new(),
        }
    }

    fn link_action(&self, link: &LinkRecord, index: usize, names: &mut NameAllocator) -> ActionRecord {
        let base = non_empty(slugify(&link.label, MAX_NAME_LEN))
            .or_else(|| {
                link.identifier
                    .as_deref()
                    .and_then(|id| non_empty(slugify(id, MAX_NAME_LEN)))
            })
            .or_else(|| non_empty(link_path_slug(&link.href)))
            .unwrap_or_else(|| format!("link_{}", index + 1));

        let endpoint = self.resolve(&link.href);
        let description = if link.label.is_empty() {
            format!("Follow the link to {endpoint}")
        } else {
            format!("Follow the '{}' link to {}", link.label, endpoint)
        };

        ActionRecord {
            name: names.allocate(&base),
            method: "GET".to_string(),
            endpoint,
            schema: IndexMap::new(),
            description,
            provenance: Provenance::Link,
            required: Vec::new(),
        }
    }

    /// Resolve a target against the base URL; empty targets mean the page itself
    fn resolve(&self, target: &str) -> String {
        let target = target.trim();
        let base = self.options.base_url.as_deref().and_then(|b| Url::parse(b).ok());

        match (base, target.is_empty()) {
            (Some(base), true) => base.to_string(),
            (None, true) => "/".to_string(),
            (Some(base), false) => base
                .join(target)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| target.to_string()),
            (None, false) => target.to_string(),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn network_action(call: &NetworkCallRecord, index: usize, names: &mut NameAllocator) -> NetworkAction {
    let base = network_action_base(&call.method, &call.url).unwrap_or_else(|| format!("api_{}", index + 1));
    NetworkAction {
        name: names.allocate(&base),
        method: call.method.clone(),
        url: call.url.clone(),
        body_schema: call.inferred_schema.clone(),
        description: format!("{} request observed to {}", call.method, call.url),
    }
}

/// Synthesize a contract with a one-off synthesizer
pub fn synthesize(page: &PageStructure, calls: &[NetworkCallRecord], options: SynthesisOptions) -> ContractDocument {
    ContractSynthesizer::new(options).synthesize(page, calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ValueType;
    use crate::network::{RequestDescriptor, ResourceCategory, normalize_requests};

    fn contract_for(html: &str) -> ContractDocument {
        synthesize(&PageStructure::from_html(html), &[], SynthesisOptions::default())
    }

    #[test]
    fn test_join_form() {
        let html = r#"<form method="post"><input name="email" type="email" required><button type="submit">Join</button></form>"#;
        let contract = contract_for(html);

        assert_eq!(contract.actions.len(), 1, "nested submit button must not duplicate the form");
        let join = &contract.actions[0];
        assert_eq!(join.name, "join");
        assert_eq!(join.method, "POST");
        assert_eq!(join.provenance, Provenance::Form);
        assert_eq!(join.schema.len(), 1);
        assert_eq!(join.schema["email"], ValueType::String);
        assert!(join.required.is_empty());
    }

    #[test]
    fn test_carry_required() {
        let html = r#"<form><input name="email" required><input name="nick"></form>"#;
        let options = SynthesisOptions::new().carry_required(true);
        let contract = synthesize(&PageStructure::from_html(html), &[], options);

        assert_eq!(contract.actions[0].required, vec!["email".to_string()]);
    }

    #[test]
    fn test_button_in_form_with_other_label_is_kept() {
        let html = r#"<form><button>Save</button><button type="button">Preview</button></form>"#;
        let contract = contract_for(html);

        let names: Vec<_> = contract.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["save", "preview"]);
        assert_eq!(contract.actions[1].method, "POST");
        assert!(contract.actions[1].schema.is_empty());
    }

    #[test]
    fn test_ordering_and_uniqueness() {
        let html = r#"
            <a href="/help">Help</a>
            <button>Help</button>
            <form><input name="q"><button>Search</button></form>
            <button>Search</button>
            <a href="/search">Search</a>
        "#;
        let contract = contract_for(html);

        let got: Vec<_> = contract
            .actions
            .iter()
            .map(|a| (a.name.as_str(), a.provenance))
            .collect();
        assert_eq!(
            got,
            vec![
                ("search", Provenance::Form),
                ("help", Provenance::Button),
                ("search_2", Provenance::Button),
                ("help_2", Provenance::Link),
                ("search_3", Provenance::Link),
            ]
        );
    }

    #[test]
    fn test_forms_sharing_label_get_unique_names() {
        let html = r#"<form><button>Go</button></form><form><button>Go</button></form><form></form>"#;
        let contract = contract_for(html);

        let names: Vec<_> = contract.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["go", "go_2", "submit"]);
    }

    #[test]
    fn test_link_name_fallbacks() {
        let html = r#"
            <a href="/a">About us</a>
            <a id="Cart-Link" href="/cart"></a>
            <a href="/catalog/items/category/electronics/alpha"></a>
            <a href="/catalog/items/category/electronics/beta"></a>
            <a href="https://example.com/"></a>
        "#;
        let contract = contract_for(html);

        let names: Vec<_> = contract.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "about_us",
                "cart_link",
                "catalog_items_category_electro",
                "catalog_items_category_electro_2",
                "link_5",
            ]
        );
        assert!(contract.actions.iter().all(|a| a.method == "GET"));
    }

    #[test]
    fn test_endpoints_resolve_against_base() {
        let html = r#"<form action="subscribe"></form><form></form><button>Like</button><a href="/x">X</a>"#;
        let options = SynthesisOptions::new().base_url("https://news.example.com/blog/post");
        let contract = synthesize(&PageStructure::from_html(html), &[], options);

        let endpoints: Vec<_> = contract.actions.iter().map(|a| a.endpoint.as_str()).collect();
        assert_eq!(
            endpoints,
            vec![
                "https://news.example.com/blog/subscribe",
                "https://news.example.com/blog/post",
                "https://news.example.com/blog/post",
                "https://news.example.com/x",
            ]
        );

        let relative = contract_for(html);
        assert_eq!(relative.actions[0].endpoint, "subscribe");
        assert_eq!(relative.actions[1].endpoint, "/");
    }

    #[test]
    fn test_network_actions_share_name_space() {
        let calls = normalize_requests(vec![
            RequestDescriptor::new("POST", "https://x.test/api/search", ResourceCategory::Fetch)
                .with_body(r#"{"q":"red"}"#),
            RequestDescriptor::new("GET", "::bad::", ResourceCategory::Xhr),
        ]);
        let page = PageStructure::from_html(r#"<button>post api search</button>"#);
        let contract = synthesize(&page, &calls, SynthesisOptions::default());

        assert_eq!(contract.actions[0].name, "post_api_search");
        let network: Vec<_> = contract.network_actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(network, vec!["post_api_search_2", "api_2"]);
        assert_eq!(
            contract.network_actions[0].body_schema.as_ref().unwrap()["q"],
            ValueType::String
        );
    }

    #[test]
    fn test_contract_name_sources() {
        let page = PageStructure::from_html("<title>Acme Store</title>");
        assert_eq!(synthesize(&page, &[], SynthesisOptions::default()).name, "Acme_Store");
        assert_eq!(
            synthesize(&page, &[], SynthesisOptions::new().name_hint("acme")).name,
            "acme"
        );
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let html = r#"
            <title>Shop</title>
            <form method="post" action="/cart"><input name="sku"><button>Add</button></form>
            <button>Add</button><button></button><a href="/p/1"></a><a href="/p/1"></a>
        "#;
        let page = PageStructure::from_html(html);
        let first = synthesize(&page, &[], SynthesisOptions::default());
        let second = synthesize(&PageStructure::from_html(html), &[], SynthesisOptions::default());

        assert_eq!(first, second);
    }
}
