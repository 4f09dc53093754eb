//! IIIF Presentation data model, as far as the gallery needs it.
//!
//! These are *read views* over manifests published by many different
//! institutions. Field names and nesting vary between publishers, so every
//! field is optional, `null` is treated like an absent field, and unknown
//! fields are ignored. The raw JSON document is kept alongside the typed view
//! (see [`crate::ingest::IngestedManifest`]) so nothing is lost on export.
//!
//! Two manifest shapes are understood:
//!
//! ```text
//! Presentation 2 manifest        combined manifest (our own export)
//! ───────────────────────        ──────────────────────────────────
//! label, attribution?, related?  @context, id, type, label
//! metadata?: [{label, value}]    items: [<manifest>, <manifest>, ...]
//! sequences: [{ canvases: [
//!   { metadata?, images: [
//!     { resource: { service: { "@id" } } } ] } ] }]
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deserialize `null` as the type's default instead of failing.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a list one element at a time. An element of an unexpected
/// shape becomes `T::default()`, keeping its position; a non-list is `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

/// [`lenient_list`], with a non-list read as empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(lenient_list(deserializer)?.unwrap_or_default())
}

/// A IIIF manifest: one digitized object with its canvases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub label: Option<TextValue>,
    pub attribution: Option<TextValue>,
    pub related: Option<Related>,
    #[serde(deserialize_with = "nullable")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(deserialize_with = "nullable")]
    pub sequences: Vec<Sequence>,
}

impl Manifest {
    /// Canvases of the first sequence, or `None` when the manifest lacks
    /// `sequences[0].canvases`.
    pub fn canvases(&self) -> Option<&[Canvas]> {
        self.sequences
            .first()
            .and_then(|sequence| sequence.canvases.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sequence {
    /// `None` when absent; an empty list is a valid, image-less sequence.
    /// A canvas that is not an object reads as an empty canvas.
    #[serde(deserialize_with = "lenient_list")]
    pub canvases: Option<Vec<Canvas>>,
}

/// One page or image-bearing surface of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Canvas {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    pub label: Option<TextValue>,
    #[serde(deserialize_with = "nullable")]
    pub metadata: Vec<MetadataEntry>,
    /// An image of an unexpected shape reads as one without a resource.
    #[serde(deserialize_with = "lenient_vec")]
    pub images: Vec<ImageAnnotation>,
}

impl Canvas {
    /// Base identifier of the image service behind this canvas's first image.
    ///
    /// Returns `None` when there is no image, no resource, no service, or the
    /// service identifier is blank. A trailing `/` is dropped so derived URLs
    /// never contain `//`.
    pub fn image_service_id(&self) -> Option<&str> {
        self.images
            .first()?
            .resource
            .as_ref()?
            .service
            .as_ref()?
            .identifier()
            .map(|id| id.trim_end_matches('/'))
            .filter(|id| !id.is_empty())
    }

    /// Printable identity for diagnostics.
    pub fn describe(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.label.as_ref().and_then(TextValue::text))
            .unwrap_or_else(|| "<unidentified canvas>".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageAnnotation {
    pub resource: Option<ImageResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageResource {
    pub service: Option<ServiceRef>,
}

/// `service` is a single object in most manifests, a list in some.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    One(ImageService),
    Many(Vec<ImageService>),
    Other(serde_json::Value),
}

impl ServiceRef {
    /// First non-blank service identifier.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ServiceRef::One(service) => service.identifier(),
            ServiceRef::Many(services) => services.iter().find_map(ImageService::identifier),
            ServiceRef::Other(_) => None,
        }
    }
}

/// A IIIF Image API endpoint. Presentation 2 uses `@id`, version 3 `id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageService {
    #[serde(rename = "@id")]
    pub at_id: Option<String>,
    pub id: Option<String>,
}

impl ImageService {
    pub fn identifier(&self) -> Option<&str> {
        non_blank(self.at_id.as_deref()).or_else(|| non_blank(self.id.as_deref()))
    }
}

/// The manifest's link back to the item on the publisher's site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Related {
    Link(String),
    Resource(RelatedResource),
    Many(Vec<Related>),
    Other(serde_json::Value),
}

impl Related {
    /// The first usable link: an object's identifier or a plain string.
    pub fn link(&self) -> Option<&str> {
        match self {
            Related::Link(url) => non_blank(Some(url)),
            Related::Resource(resource) => {
                non_blank(resource.at_id.as_deref()).or_else(|| non_blank(resource.id.as_deref()))
            }
            Related::Many(links) => links.iter().find_map(Related::link),
            Related::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelatedResource {
    #[serde(rename = "@id")]
    pub at_id: Option<String>,
    pub id: Option<String>,
}

/// A `{label, value}` pair. Labels may repeat; order is significant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetadataEntry {
    pub label: Option<TextValue>,
    pub value: Option<TextValue>,
}

impl MetadataEntry {
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_ref().is_some_and(|l| l.matches(label))
    }
}

/// Any of the text shapes publishers use for labels and values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Tagged(TaggedText),
    Sequence(Vec<TextValue>),
    LanguageMap(BTreeMap<String, Vec<String>>),
    Other(serde_json::Value),
}

/// `{"@value": "...", "@language": "en"}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaggedText {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@language", default)]
    pub language: Option<String>,
}

const PREFERRED_LANGUAGES: [&str; 2] = ["en", "none"];

impl TextValue {
    /// Display text, or `None` when the value holds no visible text.
    ///
    /// Sequences join their non-empty elements with `", "`. Language maps
    /// prefer English, then `none`, then the first language present.
    pub fn text(&self) -> Option<String> {
        match self {
            TextValue::Text(s) => non_blank(Some(s)).map(String::from),
            TextValue::Tagged(tagged) => non_blank(Some(&tagged.value)).map(String::from),
            TextValue::Sequence(items) => join_texts(items.iter().filter_map(TextValue::text)),
            TextValue::LanguageMap(map) => {
                let values = PREFERRED_LANGUAGES
                    .iter()
                    .find_map(|lang| map.get(*lang))
                    .or_else(|| map.values().next())?;
                join_texts(
                    values
                        .iter()
                        .filter_map(|v| non_blank(Some(v)).map(String::from)),
                )
            }
            TextValue::Other(serde_json::Value::Number(n)) => Some(n.to_string()),
            TextValue::Other(serde_json::Value::Bool(b)) => Some(b.to_string()),
            TextValue::Other(_) => None,
        }
    }

    /// The first element of a sequence, or the value itself.
    pub fn first_item(&self) -> Option<&TextValue> {
        match self {
            TextValue::Sequence(items) => items.first(),
            other => Some(other),
        }
    }

    /// Whether any text carried by this value equals `label` exactly.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            TextValue::Text(s) => s == label,
            TextValue::Tagged(tagged) => tagged.value == label,
            TextValue::Sequence(items) => items.iter().any(|item| item.matches(label)),
            TextValue::LanguageMap(map) => map.values().flatten().any(|v| v == label),
            TextValue::Other(_) => false,
        }
    }
}

fn join_texts(texts: impl Iterator<Item = String>) -> Option<String> {
    let joined = texts.collect::<Vec<_>>().join(", ");
    (!joined.is_empty()).then_some(joined)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
