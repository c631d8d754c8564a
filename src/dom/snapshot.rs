use crate::dom::extract::PageStructure;
use serde::{Deserialize, Serialize};

/// Per-category caps applied to a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotLimits {
    pub max_buttons: usize,
    pub max_links: usize,
    pub max_forms: usize,
    pub max_inputs_per_form: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self {
            max_buttons: 40,
            max_links: 40,
            max_forms: 10,
            max_inputs_per_form: 20,
        }
    }
}

impl SnapshotLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: cap buttons and links to the same count
    pub fn clickables(mut self, max: usize) -> Self {
        self.max_buttons = max;
        self.max_links = max;
        self
    }

    /// Builder method: cap forms
    pub fn forms(mut self, max: usize) -> Self {
        self.max_forms = max;
        self
    }

    /// Builder method: cap inputs listed per form
    pub fn inputs_per_form(mut self, max: usize) -> Self {
        self.max_inputs_per_form = max;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotButton {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotLink {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotInput {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotForm {
    pub submit_label: String,
    pub inputs: Vec<SnapshotInput>,
}

/// Bounded summary of the affordances currently on a live page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDocument {
    pub url: String,
    pub title: String,
    pub buttons: Vec<SnapshotButton>,
    pub links: Vec<SnapshotLink>,
    pub forms: Vec<SnapshotForm>,
}

impl SnapshotDocument {
    /// Summarize extracted structure, truncating every category to `limits`
    pub fn from_structure(
        url: impl Into<String>,
        title: impl Into<String>,
        structure: &PageStructure,
        limits: &SnapshotLimits,
    ) -> Self {
        let buttons = structure
            .buttons
            .iter()
            .take(limits.max_buttons)
            .map(|b| SnapshotButton {
                label: b.label.clone(),
                id: b.identifier.clone(),
            })
            .collect();

        let links = structure
            .links
            .iter()
            .take(limits.max_links)
            .map(|l| SnapshotLink {
                text: l.label.clone(),
                href: l.href.clone(),
            })
            .collect();

        let forms = structure
            .forms
            .iter()
            .take(limits.max_forms)
            .map(|f| SnapshotForm {
                submit_label: f.submit_label.clone(),
                inputs: f
                    .fields
                    .iter()
                    .take(limits.max_inputs_per_form)
                    .map(|field| SnapshotInput {
                        name: field.name.clone(),
                        label: field.display_label().to_string(),
                        input_type: field.input_type.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            url: url.into(),
            title: title.into(),
            buttons,
            links,
            forms,
        }
    }

    /// Extract `html` and summarize it
    pub fn from_html(url: impl Into<String>, title: impl Into<String>, html: &str, limits: &SnapshotLimits) -> Self {
        Self::from_structure(url, title, &PageStructure::from_html(html), limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_bounded() {
        let mut html = String::new();
        for i in 0..100 {
            html.push_str(&format!("<button>b{i}</button><a href=\"/p/{i}\">l{i}</a>"));
        }
        for i in 0..5 {
            html.push_str(&format!("<form><input name=\"f{i}a\"><input name=\"f{i}b\"></form>"));
        }

        let limits = SnapshotLimits::new().clickables(10).forms(3).inputs_per_form(1);
        let snap = SnapshotDocument::from_html("https://x.test/", "X", &html, &limits);

        assert_eq!(snap.buttons.len(), 10);
        assert_eq!(snap.links.len(), 10);
        assert_eq!(snap.forms.len(), 3);
        assert!(snap.forms.iter().all(|f| f.inputs.len() == 1));
        assert_eq!(snap.buttons[0].label, "b0");
        assert_eq!(snap.links[9].href, "/p/9");
    }

    #[test]
    fn test_snapshot_input_labels() {
        let html = r#"
            <form>
                <label for="e">Email</label><input id="e" name="email" type="email">
                <input name="q" placeholder="Search">
                <input name="zip">
                <button>Go</button>
            </form>
        "#;
        let snap = SnapshotDocument::from_html("u", "t", html, &SnapshotLimits::default());
        let form = &snap.forms[0];

        assert_eq!(form.submit_label, "Go");
        let labels: Vec<_> = form.inputs.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Email", "Search", "zip"]);
        assert_eq!(form.inputs[0].input_type, "email");
    }

    #[test]
    fn test_snapshot_serialization_shape() {
        let snap = SnapshotDocument::from_html(
            "https://x.test/",
            "Home",
            r#"<form><input name="a"></form>"#,
            &SnapshotLimits::default(),
        );
        let json = serde_json::to_value(&snap).unwrap();

        assert_eq!(json["forms"][0]["submitLabel"], "submit");
        assert_eq!(json["forms"][0]["inputs"][0]["type"], "text");
        assert!(json["buttons"].as_array().unwrap().is_empty());
    }
}
