//! Shared test utilities for the manifest-gal test suite.
//!
//! Provides manifest builders, fixture loading, a canned [`ManifestSource`],
//! and recording sinks that stand in for a presenter.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = MockSource::new()
//!     .with_fixture("https://x.org/m", "loc-map.json")
//!     .with_status("https://x.org/gone", 404);
//!
//! let mut sink = RecordingSink::default();
//! Gallery::default().ingest_remote(&source, "https://x.org/m", &mut sink).unwrap();
//! assert_eq!(sink.cards.len(), 1);
//! ```

use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::gallery::{GallerySink, ViewerSink};
use crate::ingest::{IngestError, ManifestSource};
use crate::record::ImageRecord;
use crate::types::Manifest;

// =========================================================================
// Manifest builders
// =========================================================================

/// A Presentation 2 manifest with a plain-string label.
pub fn manifest_json(label: &str, metadata: Value, canvases: Vec<Value>) -> Value {
    json!({
        "@context": "http://iiif.io/api/presentation/2/context.json",
        "@type": "sc:Manifest",
        "label": label,
        "metadata": metadata,
        "sequences": [{"@type": "sc:Sequence", "canvases": canvases}]
    })
}

/// A canvas with a single image whose service is `service_id`.
pub fn canvas_json(service_id: &str, metadata: Value) -> Value {
    json!({
        "@id": format!("{service_id}/canvas"),
        "@type": "sc:Canvas",
        "metadata": metadata,
        "images": [{
            "@type": "oa:Annotation",
            "resource": {
                "@type": "dctypes:Image",
                "service": {"@id": service_id, "profile": "http://iiif.io/api/image/2/level2.json"}
            }
        }]
    })
}

// =========================================================================
// Fixtures
// =========================================================================

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/manifests")
        .join(name)
}

/// Raw text of `fixtures/manifests/<name>`.
pub fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture '{name}' unreadable: {e}"))
}

/// `fixtures/manifests/<name>` deserialized into the typed view.
pub fn load_fixture(name: &str) -> Manifest {
    serde_json::from_str(&fixture_text(name))
        .unwrap_or_else(|e| panic!("fixture '{name}' does not parse: {e}"))
}

// =========================================================================
// MockSource
// =========================================================================

/// Canned responses keyed by URL. Unknown URLs fail like a DNS error.
#[derive(Default)]
pub struct MockSource {
    responses: HashMap<String, Result<String, u16>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture(self, url: &str, name: &str) -> Self {
        self.with_body(url, &fixture_text(name))
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }
}

impl ManifestSource for MockSource {
    fn fetch(&self, url: &str) -> Result<String, IngestError> {
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(IngestError::Transport {
                url: url.to_string(),
                status: Some(*status),
                message: format!("Network response was not ok: {status}"),
            }),
            None => Err(IngestError::Transport {
                url: url.to_string(),
                status: None,
                message: "no route to host".to_string(),
            }),
        }
    }
}

// =========================================================================
// Recording sinks
// =========================================================================

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub cards: Vec<ImageRecord>,
    pub clears: usize,
}

impl GallerySink for RecordingSink {
    fn render_card(&mut self, record: &ImageRecord) {
        self.cards.push(record.clone());
    }

    fn clear_gallery(&mut self) {
        self.cards.clear();
        self.clears += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingViewer {
    pub opened: Vec<String>,
}

impl ViewerSink for RecordingViewer {
    fn open(&mut self, full_resolution_url: &str) {
        self.opened.push(full_resolution_url.to_string());
    }
}

/// A fully populated record titled `name`.
pub fn sample_record(name: &str) -> ImageRecord {
    let service = format!("https://iiif.example.org/{name}");
    ImageRecord {
        thumbnail_url: format!("{service}/full/!200,200/0/default.jpg"),
        full_resolution_url: format!("{service}/info.json"),
        title: name.to_string(),
        author: "Walling, H. F.".to_string(),
        date: "1852".to_string(),
        collection: "Map Center".to_string(),
        attribution: "Example Library".to_string(),
        location_link: format!("https://example.org/item/{name}"),
    }
}
