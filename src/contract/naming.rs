//! Deterministic naming: slugs, contract names and collision-free action names.

use std::collections::HashSet;
use url::Url;

/// Cap applied to label slugs and derived contract names
pub const MAX_NAME_LEN: usize = 40;

/// Cap applied to slugs derived from link paths
pub const MAX_PATH_SLUG_LEN: usize = 30;

/// Contract name used when neither a hint nor a title is usable
pub const DEFAULT_CONTRACT_NAME: &str = "web_contract";

/// Lowercase ASCII slug: `[a-z0-9_]`, underscore runs collapsed, trimmed, capped
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let trimmed = slug.trim_matches('_');
    let capped = &trimmed[..trimmed.len().min(max_len)];
    capped.trim_end_matches('_').to_string()
}

fn underscore_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Pick the contract name: a usable caller hint, else the page title, else a default
pub fn derive_contract_name(hint: Option<&str>, title: Option<&str>) -> String {
    if let Some(hint) = hint {
        let normalized = underscore_whitespace(hint);
        if !normalized.is_empty() && normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return normalized;
        }
        log::debug!("Ignoring contract name hint '{}'", hint);
    }

    if let Some(title) = title {
        let name: String = underscore_whitespace(title)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .take(MAX_NAME_LEN)
            .collect();
        if !name.trim_matches('_').is_empty() {
            return name;
        }
    }

    DEFAULT_CONTRACT_NAME.to_string()
}

/// Slug of the path portion of an href, with the domain stripped
pub fn link_path_slug(href: &str) -> String {
    let href = href.trim();
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("http:{href}"))
    } else {
        Url::parse(href)
    };

    let path = match parsed {
        Ok(url) => url.path().to_string(),
        Err(_) => href.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    slugify(&path.replace('/', "_"), MAX_PATH_SLUG_LEN)
}

/// Base name for an observed call: method plus the last two non-empty path segments.
///
/// Returns `None` when the URL cannot be parsed.
pub fn network_action_base(method: &str, url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let method = slugify(method, MAX_NAME_LEN);
    let method = if method.is_empty() { "get".to_string() } else { method };

    let tail = &segments[segments.len().saturating_sub(2)..];
    let path = slugify(&tail.join("_"), MAX_NAME_LEN);
    if path.is_empty() {
        Some(format!("{method}_root"))
    } else {
        Some(format!("{method}_{path}"))
    }
}

/// Hands out names unique (case-insensitively) within one synthesis call
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is already taken
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(&name.to_ascii_lowercase())
    }

    /// Claim `base`, or the first free `base_2`, `base_3`, ...
    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_ascii_lowercase()) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.to_ascii_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
