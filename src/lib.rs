//! # Manifest Gal
//!
//! Builds a browsable image gallery from IIIF Presentation 2 manifests. Give it
//! manifest URLs from any institution; every canvas with an image service
//! becomes a card with a thumbnail, a deep-zoom viewer link, and the title,
//! author, date, collection, attribution, and item link found in the
//! manifest's metadata. Everything fetched in a run can be exported as one
//! combined manifest and loaded again later.
//!
//! # Architecture
//!
//! ```text
//! URL ──► ingest ──► session ──► export ──► combined.json
//!            │                                   │
//!            ▼                                   ▼
//!         record ◄───────────────────────── ingest (import)
//!            │
//!            ▼
//!      GallerySink (render::HtmlGallery, or any presenter)
//! ```
//!
//! The core never builds UI. [`gallery::Gallery`] drives ingestion and export
//! and pushes cards into a [`gallery::GallerySink`]; errors come back as values.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Lenient serde view of a Presentation 2 manifest and its text values |
//! | [`metadata`] | Label lookup in metadata lists and precedence chains across canvas and manifest |
//! | [`link`] | Item-link normalization |
//! | [`record`] | Canvas → [`record::ImageRecord`] extraction with per-field fallbacks |
//! | [`ingest`] | Fetching, parsing, and validating manifests and combined documents |
//! | [`session`] | Collected manifests and combined-manifest export |
//! | [`gallery`] | Presenter-facing API: sinks, batches, import modes |
//! | [`render`] | Static HTML gallery page using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Lenient Reading, Lossless Writing
//!
//! Published manifests vary widely: labels are strings, language maps, or
//! lists of tagged values, and any field may be missing. The typed view in
//! [`types`] accepts all of these and never fails on a shape it does not
//! understand. Export never goes through that view; it writes the document as
//! it was received.
//!
//! ## Strict Import
//!
//! A combined manifest is validated as a whole before the gallery is touched,
//! so a bad file cannot leave a half-rebuilt gallery behind.

pub mod config;
pub mod gallery;
pub mod ingest;
pub mod link;
pub mod metadata;
pub mod output;
pub mod record;
pub mod render;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
