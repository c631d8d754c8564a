use crate::network::BodySchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dom::ValueType;

/// Which kind of page element an action was synthesized from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Form,
    Button,
    Link,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provenance::Form => "form",
            Provenance::Button => "button",
            Provenance::Link => "link",
        })
    }
}

/// A named, schema-described operation backed by a form, button or link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    pub name: String,
    pub method: String,
    pub endpoint: String,
    /// Field name to inferred type, in field order
    pub schema: IndexMap<String, ValueType>,
    pub description: String,
    pub provenance: Provenance,
    /// Required fields, only populated when explicitly requested at synthesis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// An action derived from an observed programmatic call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAction {
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_schema: Option<BodySchema>,
    pub description: String,
}

/// The catalog of actions derivable from a page at one point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    pub name: String,
    pub actions: Vec<ActionRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_actions: Vec<NetworkAction>,
}

impl ContractDocument {
    /// Look up a UI action by name, case-insensitively.
    ///
    /// Network actions are looked up with [`Self::network_action`].
    pub fn action(&self, name: &str) -> Option<&ActionRecord> {
        self.actions.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn network_action(&self, name: &str) -> Option<&NetworkAction> {
        self.network_actions.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Every action name, UI actions first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions
            .iter()
            .map(|a| a.name.as_str())
            .chain(self.network_actions.iter().map(|a| a.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.actions.len() + self.network_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
