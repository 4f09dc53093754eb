//! Image record extraction.
//!
//! Turns one `(canvas, manifest)` pair into an [`ImageRecord`]: the two image
//! URLs derived from the canvas's image service, plus the descriptive fields a
//! gallery card shows. A record is a pure function of its source pair; it has
//! no identity of its own and is recomputed rather than edited.
//!
//! ## Resolution priority
//!
//! Each field is resolved independently, left to right, first visible text
//! wins (see [`crate::metadata`] for how a single lookup works):
//!
//! - **Title**: canvas `Title` → manifest `Title` → manifest `label`
//! - **Date**: canvas `Date` → manifest `Date` → manifest `Created Published`
//! - **Author**: `Creator` → `Contributors` → `Author` → `Contributor`,
//!   each tried on the canvas first, then the manifest
//! - **Collection**: canvas `Location` → manifest `Location`
//! - **Attribution**: manifest `attribution`
//! - **Location link**: manifest `related` → canvas `Identifier` → manifest
//!   `Identifier` (last entry wins) → canvas `Item Url` → manifest `Item Url`,
//!   then normalized to an absolute URL
//!
//! A field with nothing to show gets its fallback literal (`No title returned`,
//! [`NO_LINK`], ...), so every record renders the same way.
//!
//! ## Image URLs
//!
//! ```text
//! thumbnail:       {service}/full/!200,200/0/default.jpg
//! full resolution: {service}/info.json
//! ```

use crate::link::{self, NO_LINK};
use crate::metadata::{Lookup, resolve_chain};
use crate::types::{Canvas, Manifest, TextValue};
use serde::Serialize;
use std::fmt;
use tracing::warn;

pub const NO_TITLE: &str = "No title returned";
pub const NO_DATE: &str = "No date returned";
pub const NO_AUTHOR: &str = "No author returned";
pub const NO_COLLECTION: &str = "No collection returned";
pub const NO_ATTRIBUTION: &str = "No attribution returned";

/// Image API request for a thumbnail fitting a 200×200 box.
const THUMBNAIL_REQUEST: &str = "full/!200,200/0/default.jpg";
const INFO_DOCUMENT: &str = "info.json";

const TITLE_CHAIN: &[Lookup] = &[Lookup::canvas("Title"), Lookup::manifest("Title")];

const DATE_CHAIN: &[Lookup] = &[
    Lookup::canvas("Date"),
    Lookup::manifest("Date"),
    Lookup::manifest("Created Published"),
];

const AUTHOR_CHAIN: &[Lookup] = &[
    Lookup::canvas("Creator"),
    Lookup::manifest("Creator"),
    Lookup::canvas("Contributors"),
    Lookup::manifest("Contributors"),
    Lookup::canvas("Author"),
    Lookup::manifest("Author"),
    Lookup::canvas("Contributor"),
    Lookup::manifest("Contributor"),
];

const COLLECTION_CHAIN: &[Lookup] = &[Lookup::canvas("Location"), Lookup::manifest("Location")];

// Some publishers repeat "Identifier" at manifest level with the item URL last.
const LINK_CHAIN: &[Lookup] = &[
    Lookup::canvas("Identifier"),
    Lookup::manifest_last("Identifier"),
    Lookup::canvas("Item Url"),
    Lookup::manifest("Item Url"),
];

/// Everything a gallery card needs for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub thumbnail_url: String,
    pub full_resolution_url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub collection: String,
    pub attribution: String,
    pub location_link: String,
}

impl ImageRecord {
    pub fn has_location_link(&self) -> bool {
        self.location_link != NO_LINK
    }

    /// Anchor target for the "View Item" link: `#` when there is no link.
    pub fn location_href(&self) -> &str {
        if self.has_location_link() {
            &self.location_link
        } else {
            "#"
        }
    }
}

/// Why a canvas produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The canvas has no images.
    NoImage,
    /// The first image has no usable image service identifier.
    NoService,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoImage => write!(f, "canvas has no images"),
            SkipReason::NoService => {
                write!(f, "image service is missing or does not contain an @id field")
            }
        }
    }
}

/// Extract a record, logging and returning `None` for canvases that cannot
/// produce one.
pub fn extract(canvas: &Canvas, manifest: &Manifest) -> Option<ImageRecord> {
    match try_extract(canvas, manifest) {
        Ok(record) => Some(record),
        Err(reason) => {
            warn!(canvas = %canvas.describe(), %reason, "skipping canvas");
            None
        }
    }
}

/// Extract a record, reporting why a canvas was skipped.
pub fn try_extract(canvas: &Canvas, manifest: &Manifest) -> Result<ImageRecord, SkipReason> {
    if canvas.images.is_empty() {
        return Err(SkipReason::NoImage);
    }
    let service = canvas.image_service_id().ok_or(SkipReason::NoService)?;

    let canvas_md = &canvas.metadata;
    let manifest_md = &manifest.metadata;

    let title = resolve_chain(canvas_md, manifest_md, TITLE_CHAIN)
        .or_else(|| manifest.label.as_ref().and_then(TextValue::text))
        .unwrap_or_else(|| NO_TITLE.to_string());
    let date = resolve_chain(canvas_md, manifest_md, DATE_CHAIN)
        .unwrap_or_else(|| NO_DATE.to_string());
    let author = resolve_chain(canvas_md, manifest_md, AUTHOR_CHAIN)
        .unwrap_or_else(|| NO_AUTHOR.to_string());
    let collection = resolve_chain(canvas_md, manifest_md, COLLECTION_CHAIN)
        .unwrap_or_else(|| NO_COLLECTION.to_string());
    let attribution = manifest
        .attribution
        .as_ref()
        .and_then(TextValue::text)
        .unwrap_or_else(|| NO_ATTRIBUTION.to_string());

    Ok(ImageRecord {
        thumbnail_url: format!("{service}/{THUMBNAIL_REQUEST}"),
        full_resolution_url: format!("{service}/{INFO_DOCUMENT}"),
        title,
        author,
        date,
        collection,
        attribution,
        location_link: location_link(canvas, manifest),
    })
}

/// `related` first, then the metadata chain, then the sentinel.
fn location_link(canvas: &Canvas, manifest: &Manifest) -> String {
    let related = manifest.related.as_ref().and_then(|r| r.link()).map(String::from);
    match related.or_else(|| resolve_chain(&canvas.metadata, &manifest.metadata, LINK_CHAIN)) {
        Some(candidate) => link::normalize(&candidate),
        None => NO_LINK.to_string(),
    }
}
