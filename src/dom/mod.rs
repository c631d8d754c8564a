//! Structural extraction of interactive affordances
//!
//! This module turns markup into canonical records:
//! - FormRecord / FieldRecord: forms and their named fields
//! - ButtonRecord: anything that looks clickable
//! - LinkRecord: anchors with a navigable target
//! - SnapshotDocument: a bounded summary for live pages

pub mod element;
pub mod extract;
pub mod snapshot;

pub use element::{
    ButtonRecord, FieldRecord, FormMethod, FormRecord, InteractiveElement, LinkRecord, ValueType,
};
pub use extract::PageStructure;
pub use snapshot::{SnapshotDocument, SnapshotLimits};

/// Extract forms, buttons and links from raw markup
pub fn extract(html: &str) -> PageStructure {
    PageStructure::from_html(html)
}
