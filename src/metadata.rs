//! Metadata resolution over repeated, publisher-specific labels.
//!
//! Canvases and manifests both carry ordered `{label, value}` lists. Which
//! labels a publisher uses, and whether it repeats them, varies by
//! institution, so every record field is resolved through a *chain* of
//! lookups evaluated left to right. The first lookup that produces visible
//! text wins:
//!
//! ```text
//! date: canvas "Date" → manifest "Date" → manifest "Created Published"
//! ```
//!
//! ## Repeated labels
//!
//! By default the **first** entry with a matching label wins, and its value
//! is returned whole (a sequence stays a sequence). Some publishers instead
//! repeat a label and put the authoritative entry last, while others pack
//! several values into one entry. [`resolve`] with `prefer_last` covers that
//! case: it takes the **last** matching entry, and if that entry's value is a
//! sequence, only the sequence's **first** element.

use crate::types::{MetadataEntry, TextValue};

/// Look up `label` in `entries`.
///
/// - No entry with that label → `None`.
/// - `prefer_last == false` → value of the first matching entry, as-is.
/// - `prefer_last == true` → value of the last matching entry; a sequence
///   value is narrowed to its first element.
///
/// A matching entry without a value resolves to `None`; later duplicates are
/// not consulted.
pub fn resolve(entries: &[MetadataEntry], label: &str, prefer_last: bool) -> Option<TextValue> {
    let mut matches = entries.iter().filter(|entry| entry.has_label(label));
    if prefer_last {
        let value = matches.next_back()?.value.as_ref()?;
        value.first_item().cloned()
    } else {
        matches.next()?.value.clone()
    }
}

/// Which metadata list a lookup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Canvas,
    Manifest,
}

/// One link in a precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub scope: Scope,
    pub label: &'static str,
    pub prefer_last: bool,
}

impl Lookup {
    pub const fn canvas(label: &'static str) -> Self {
        Self {
            scope: Scope::Canvas,
            label,
            prefer_last: false,
        }
    }

    pub const fn manifest(label: &'static str) -> Self {
        Self {
            scope: Scope::Manifest,
            label,
            prefer_last: false,
        }
    }

    /// Manifest lookup that prefers the last of several same-label entries.
    pub const fn manifest_last(label: &'static str) -> Self {
        Self {
            scope: Scope::Manifest,
            label,
            prefer_last: true,
        }
    }
}

/// Evaluate `chain` against canvas and manifest metadata.
///
/// Returns the first lookup's text that is present and non-blank.
pub fn resolve_chain(
    canvas: &[MetadataEntry],
    manifest: &[MetadataEntry],
    chain: &[Lookup],
) -> Option<String> {
    chain.iter().find_map(|lookup| {
        let entries = match lookup.scope {
            Scope::Canvas => canvas,
            Scope::Manifest => manifest,
        };
        resolve(entries, lookup.label, lookup.prefer_last)?.text()
    })
}
