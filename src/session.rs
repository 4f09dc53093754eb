//! Collected manifests and combined-manifest export.
//!
//! A [`Session`] owns every manifest successfully fetched during one run, in
//! fetch order. It is append-only; a fresh session is the only reset.
//! Fetching the same URL twice collects it twice: manifests are opaque
//! captures, not deduplicated by identifier.
//!
//! ## Combined manifest format
//!
//! Export wraps the collected manifests, *whole and unmodified*, in a small
//! envelope:
//!
//! ```json
//! {
//!   "@context": "http://iiif.io/api/presentation/3.0/context.json",
//!   "id": "http://example.org/combined-manifest",
//!   "type": "Manifest",
//!   "label": { "en": ["Combined Manifest"] },
//!   "items": [ <manifest>, <manifest>, ... ]
//! }
//! ```
//!
//! This borrows IIIF vocabulary but is this tool's own interchange format: a
//! real Presentation 3 `items` list holds canvases, not manifests. Import
//! ([`crate::ingest::repopulate`]) validates it strictly rather than treating
//! it as standard IIIF.

use crate::config::ExportConfig;
use crate::ingest::IngestedManifest;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The ordered manifests collected in one run.
#[derive(Debug, Default)]
pub struct Session {
    collected: Vec<IngestedManifest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a manifest and return the stored copy.
    pub fn collect(&mut self, manifest: IngestedManifest) -> &IngestedManifest {
        let index = self.collected.len();
        self.collected.push(manifest);
        &self.collected[index]
    }

    pub fn manifests(&self) -> &[IngestedManifest] {
        &self.collected
    }

    pub fn len(&self) -> usize {
        self.collected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    /// Build the combined manifest for everything collected so far.
    ///
    /// `name` only determines the file name; see [`export_filename`].
    pub fn export(&self, name: &str, config: &ExportConfig) -> CombinedExport<'_> {
        CombinedExport {
            filename: export_filename(name, &config.default_name),
            document: CombinedManifest {
                context: config.context.clone(),
                id: config.id.clone(),
                kind: "Manifest",
                label: BTreeMap::from([("en".to_string(), vec![config.label.clone()])]),
                items: self.collected.iter().map(IngestedManifest::raw).collect(),
            },
        }
    }
}

/// The combined document. Items borrow the session's raw manifests.
#[derive(Debug, Serialize)]
pub struct CombinedManifest<'a> {
    #[serde(rename = "@context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: BTreeMap<String, Vec<String>>,
    pub items: Vec<&'a Value>,
}

/// A combined manifest ready to be saved.
#[derive(Debug)]
pub struct CombinedExport<'a> {
    pub filename: String,
    pub document: CombinedManifest<'a>,
}

impl CombinedExport<'_> {
    /// Pretty-printed JSON, 2-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document)
    }

    /// Write `{filename}` into `dir`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

/// `{name}.json`, with `name` trimmed and `default_name` used when blank.
///
/// Path separators are replaced with `_` so the file always lands in the
/// export directory.
pub fn export_filename(name: &str, default_name: &str) -> String {
    let name = match name.trim() {
        "" => default_name.trim(),
        trimmed => trimmed,
    };
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.json")
}
