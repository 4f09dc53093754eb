//! The gallery-facing API: what a presenter calls, and what it must provide.
//!
//! The core never builds UI. A presenter hands in a [`GallerySink`] (where
//! cards go) and, for deep zoom, a [`ViewerSink`]; [`Gallery`] drives
//! ingestion, extraction, and export, and reports errors back as values so the
//! presenter can show them without the run ending.
//!
//! ```text
//! Gallery::ingest_remote(url)          fetch → validate → collect → render_card × N
//! Gallery::ingest_batch(urls)          ingest_remote for each URL, in order
//! Gallery::ingest_local_combined(doc)  validate all → clear_gallery → render_card × N
//! Gallery::export_combined(name)       Session::export
//! ```
//!
//! Batches run strictly one URL after another: the session's order is the
//! input order, and one URL's failure never stops the rest.

use crate::config::ExportConfig;
use crate::ingest::{self, IngestError, IngestedManifest, ManifestSource};
use crate::record::{self, ImageRecord};
use crate::session::{CombinedExport, Session};
use serde_json::Value;
use tracing::{debug, error};

/// Receives rendered cards.
pub trait GallerySink {
    fn render_card(&mut self, record: &ImageRecord);
    fn clear_gallery(&mut self);
}

/// Shows one image at full resolution.
pub trait ViewerSink {
    /// `full_resolution_url` is the image service's `info.json`.
    fn open(&mut self, full_resolution_url: &str);
}

/// Open a record's image in the viewer.
pub fn open_in_viewer(record: &ImageRecord, viewer: &mut impl ViewerSink) {
    viewer.open(&record.full_resolution_url);
}

/// Whether a combined-manifest import also joins the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Rebuild the gallery only; a later export does not include the import.
    #[default]
    ViewOnly,
    /// Rebuild the gallery and collect every imported manifest.
    Append,
}

/// Per-URL outcome of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub url: String,
    /// Number of cards rendered, or why the URL failed.
    pub result: Result<usize, IngestError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn cards_rendered(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Split a comma-separated URL list, dropping blank entries.
pub fn split_urls(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}

/// Render every extractable canvas of `manifest`; returns the card count.
pub fn render_manifest(manifest: &IngestedManifest, sink: &mut impl GallerySink) -> usize {
    let mut rendered = 0;
    for (canvas, parent) in manifest.pairs() {
        if let Some(record) = record::extract(canvas, parent) {
            sink.render_card(&record);
            rendered += 1;
        }
    }
    rendered
}

/// Records for every extractable canvas, in order.
pub fn records(manifest: &IngestedManifest) -> Vec<ImageRecord> {
    manifest
        .pairs()
        .filter_map(|(canvas, parent)| record::extract(canvas, parent))
        .collect()
}

/// One browsing session: collected manifests plus export settings.
#[derive(Debug, Default)]
pub struct Gallery {
    session: Session,
    export: ExportConfig,
}

impl Gallery {
    pub fn new(export: ExportConfig) -> Self {
        Self {
            session: Session::new(),
            export,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch one manifest, collect it, and render its cards.
    pub fn ingest_remote(
        &mut self,
        source: &impl ManifestSource,
        url: &str,
        sink: &mut impl GallerySink,
    ) -> Result<usize, IngestError> {
        let manifest = ingest::fetch_manifest(source, url).inspect_err(|e| {
            error!(url, error = %e, "error fetching IIIF manifest");
        })?;
        let stored = self.session.collect(manifest);
        let rendered = render_manifest(stored, sink);
        debug!(url, rendered, "manifest added to gallery");
        Ok(rendered)
    }

    /// Ingest `urls` one after another, recording every outcome.
    pub fn ingest_batch<S: AsRef<str>>(
        &mut self,
        source: &impl ManifestSource,
        urls: &[S],
        sink: &mut impl GallerySink,
    ) -> BatchReport {
        let outcomes = urls
            .iter()
            .map(|url| {
                let url = url.as_ref();
                BatchOutcome {
                    url: url.to_string(),
                    result: self.ingest_remote(source, url, sink),
                }
            })
            .collect();
        BatchReport { outcomes }
    }

    /// Rebuild the gallery from a combined manifest document.
    ///
    /// The whole document is validated first; on error the gallery is left
    /// as it was. On success the gallery is cleared and every manifest's cards
    /// are rendered. With [`ImportMode::Append`] the manifests are also
    /// collected, so a later export includes them.
    pub fn ingest_local_combined(
        &mut self,
        document: Value,
        mode: ImportMode,
        sink: &mut impl GallerySink,
    ) -> Result<usize, IngestError> {
        let manifests = ingest::repopulate(document).inspect_err(|e| {
            error!(error = %e, "failed to load combined manifest");
        })?;
        sink.clear_gallery();

        let mut rendered = 0;
        for manifest in manifests {
            match mode {
                ImportMode::ViewOnly => rendered += render_manifest(&manifest, sink),
                ImportMode::Append => {
                    rendered += render_manifest(self.session.collect(manifest), sink)
                }
            }
        }
        debug!(rendered, ?mode, "combined manifest loaded");
        Ok(rendered)
    }

    /// Parse combined-manifest text, then [`ingest_local_combined`](Self::ingest_local_combined).
    pub fn import_combined_str(
        &mut self,
        text: &str,
        mode: ImportMode,
        sink: &mut impl GallerySink,
    ) -> Result<usize, IngestError> {
        let document = ingest::parse_combined(text).inspect_err(|e| {
            error!(error = %e, "error parsing combined manifest");
        })?;
        self.ingest_local_combined(document, mode, sink)
    }

    pub fn export_combined(&self, name: &str) -> CombinedExport<'_> {
        self.session.export(name, &self.export)
    }
}
