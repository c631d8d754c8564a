//! Contract synthesis
//!
//! Turns extracted page structure and observed network calls into a
//! [`ContractDocument`]: a catalog of uniquely named, schema-described actions.

pub mod document;
pub mod naming;
pub mod synthesize;

pub use document::{ActionRecord, ContractDocument, NetworkAction, Provenance};
pub use naming::{NameAllocator, derive_contract_name, slugify};
pub use synthesize::{ContractSynthesizer, SynthesisOptions, synthesize};

use crate::dom::PageStructure;
use crate::network::NetworkCallRecord;

/// Extract `html` and synthesize its contract in one step
pub fn contract_from_html(html: &str, calls: &[NetworkCallRecord], options: SynthesisOptions) -> ContractDocument {
    synthesize(&PageStructure::from_html(html), calls, options)
}
