use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete value type inferred for a form field or a request body key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Reserved for consumers of serialized contracts. Inference is total over
    /// the other variants and never produces it.
    Unknown,
}

impl ValueType {
    /// Map an `<input type=...>` value to a field type.
    ///
    /// Anything not listed falls back to `String`, so inference is total.
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.trim().to_ascii_lowercase().as_str() {
            "number" => ValueType::Number,
            "checkbox" => ValueType::Boolean,
            // text, email, password, tel, url, hidden, search and everything else
            _ => ValueType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method a form submits with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Anything other than a case-insensitive `post` is treated as GET
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
        }
    }
}

/// A named, addressable control inside a form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    /// `name` attribute, unique within its form
    pub name: String,

    /// Inferred value type
    pub value_type: ValueType,

    /// Raw control type (`email`, `select`, `textarea`, ...)
    pub input_type: String,

    /// Whether the control carries the `required` marker
    #[serde(default)]
    pub required: bool,

    /// Associated `<label>` text or `aria-label`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>, input_type: impl Into<String>) -> Self {
        let input_type = input_type.into();
        Self {
            name: name.into(),
            value_type: ValueType::from_input_type(&input_type),
            input_type,
            required: false,
            label: None,
            placeholder: None,
        }
    }

    /// Builder method: mark as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Builder method: set label text
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder method: set placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Best human-readable description of the field
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.placeholder.as_deref())
            .unwrap_or(&self.name)
    }
}

/// A `<form>` and its named fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub method: FormMethod,

    /// Raw `action` attribute (may be empty)
    pub target: String,

    /// Named fields in document order
    pub fields: Vec<FieldRecord>,

    /// Text of the first submit-capable control, `"submit"` when there is none
    pub submit_label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FormRecord {
    pub fn new(method: FormMethod, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            fields: Vec::new(),
            submit_label: "submit".to_string(),
            id: None,
        }
    }

    /// Add a field unless one with the same name already exists.
    ///
    /// Returns whether the field was added.
    pub fn push_field(&mut self, field: FieldRecord) -> bool {
        if self.field(&field.name).is_some() {
            return false;
        }
        self.fields.push(field);
        true
    }

    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of fields carrying the required marker
    pub fn required_fields(&self) -> Vec<String> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.clone()).collect()
    }
}

/// A clickable, button-like element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonRecord {
    /// Resolved label, or a positional fallback such as `button_3`
    pub label: String,

    /// `id` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// `class` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_hint: Option<String>,

    /// Whether the element sits inside a `<form>`
    #[serde(default)]
    pub in_form: bool,
}

/// An anchor with a navigable target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Visible text, possibly empty
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    pub href: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_hint: Option<String>,
}

/// Discriminated view over the three record kinds
#[derive(Debug, Clone, PartialEq)]
pub enum InteractiveElement<'a> {
    Form(&'a FormRecord),
    Button(&'a ButtonRecord),
    Link(&'a LinkRecord),
}
