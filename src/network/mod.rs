//! Network observation normalizer
//!
//! Intercepted requests are filtered to programmatic calls, deduplicated by
//! `(method, url)` and given a shallow body schema.

pub mod capture;
pub mod schema;

pub use capture::{CaptureWindow, NetworkCallRecord, RequestDescriptor, ResourceCategory, normalize_requests};
pub use schema::{BodySchema, infer_body_schema};
