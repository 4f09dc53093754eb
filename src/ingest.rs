//! Manifest ingestion: fetching, parsing, and shape validation.
//!
//! A manifest reaches the gallery in one of two ways:
//!
//! ```text
//! remote   URL ──fetch──► body ──parse──► IngestedManifest ──► Session (appended)
//! import   combined file ──parse──► items[] ──► IngestedManifest × N   (view only)
//! ```
//!
//! Both paths end in the same [`IngestedManifest`], whose
//! [`pairs`](IngestedManifest::pairs) feed the record extractor. Each manifest
//! is held twice: the raw JSON document, which is what gets exported (so export
//! never loses fields the typed view ignores), and the typed view used for
//! extraction.
//!
//! ## Validation
//!
//! A manifest must be a JSON object with `sequences[0].canvases`. An empty
//! canvas list is valid and simply renders nothing. A combined document must
//! be an object whose `items` is an array of valid manifests; one bad item
//! rejects the whole document, so a failed import never half-rebuilds the
//! gallery.

use crate::config::HttpConfig;
use crate::types::{Canvas, Manifest};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to fetch {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },
    #[error("{0}")]
    Schema(String),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const MISSING_CANVASES: &str = "manifest missing sequences/canvases";

/// Anything that can deliver a manifest document for a URL.
///
/// Implementations return the response body; parsing and validation happen in
/// [`parse_manifest_str`] so every source shares one error taxonomy.
pub trait ManifestSource {
    fn fetch(&self, url: &str) -> Result<String, IngestError>;
}

/// Production source: blocking HTTP GET.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(config: &HttpConfig) -> Result<Self, IngestError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|error| IngestError::Transport {
                url: String::new(),
                status: None,
                message: format!("cannot build HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }
}

impl ManifestSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, IngestError> {
        let transport = |status: Option<u16>, message: String| IngestError::Transport {
            url: url.to_string(),
            status,
            message,
        };

        debug!(url, "fetching manifest");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json, application/ld+json")
            .send()
            .map_err(|error| transport(None, error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            return Err(transport(
                Some(status.as_u16()),
                format!("Network response was not ok: {} {reason}", status.as_u16()),
            ));
        }

        response
            .text()
            .map_err(|error| transport(Some(status.as_u16()), error.to_string()))
    }
}

/// A validated manifest: the document as received plus its typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedManifest {
    raw: Value,
    manifest: Manifest,
}

impl IngestedManifest {
    /// The document exactly as published.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Canvases of `sequences[0]`. Never fails: validated at construction.
    pub fn canvases(&self) -> &[Canvas] {
        self.manifest.canvases().unwrap_or_default()
    }

    /// One `(canvas, manifest)` pair per canvas, in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Canvas, &Manifest)> + '_ {
        self.canvases()
            .iter()
            .map(move |canvas| (canvas, &self.manifest))
    }
}

/// Validate a parsed manifest document.
pub fn parse_manifest(raw: Value) -> Result<IngestedManifest, IngestError> {
    if !raw.is_object() {
        return Err(IngestError::Schema(
            "manifest is not a JSON object".to_string(),
        ));
    }
    let manifest = Manifest::deserialize(&raw)
        .map_err(|error| IngestError::Schema(format!("malformed manifest: {error}")))?;
    if manifest.canvases().is_none() {
        return Err(IngestError::Schema(MISSING_CANVASES.to_string()));
    }
    Ok(IngestedManifest { raw, manifest })
}

/// Parse and validate a manifest from its JSON text.
pub fn parse_manifest_str(body: &str) -> Result<IngestedManifest, IngestError> {
    parse_manifest(serde_json::from_str(body)?)
}

/// Fetch one manifest through `source` and validate it.
pub fn fetch_manifest(
    source: &impl ManifestSource,
    url: &str,
) -> Result<IngestedManifest, IngestError> {
    let body = source.fetch(url)?;
    let ingested = parse_manifest_str(&body)?;
    debug!(url, canvases = ingested.canvases().len(), "manifest validated");
    Ok(ingested)
}

/// Parse a combined manifest file's text.
pub fn parse_combined(text: &str) -> Result<Value, IngestError> {
    Ok(serde_json::from_str(text)?)
}

/// Expand a combined manifest back into its manifests.
///
/// Every item is validated before anything is returned.
pub fn repopulate(document: Value) -> Result<Vec<IngestedManifest>, IngestError> {
    let items = match document {
        Value::Object(mut map) => map.remove("items"),
        _ => {
            return Err(IngestError::Schema(
                "combined manifest is not a JSON object".to_string(),
            ));
        }
    };
    let Some(Value::Array(items)) = items else {
        return Err(IngestError::Schema(
            "No valid items found in the manifest data".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            parse_manifest(item).map_err(|error| match error {
                IngestError::Schema(message) => {
                    IngestError::Schema(format!("items[{index}]: {message}"))
                }
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    // =========================================================================
    // parse_manifest()
    // =========================================================================

    #[test]
    fn valid_manifest_yields_pairs_in_order() {
        let ingested = parse_manifest(manifest_json(
            "Atlas",
            json!([]),
            vec![
                canvas_json("https://x.org/a", json!([])),
                canvas_json("https://x.org/b", json!([])),
            ],
        ))
        .unwrap();
        let services: Vec<_> = ingested
            .pairs()
            .map(|(canvas, _)| canvas.image_service_id().unwrap())
            .collect();
        assert_eq!(services, vec!["https://x.org/a", "https://x.org/b"]);
    }

    #[test]
    fn pairs_share_the_manifest() {
        let ingested = parse_manifest(manifest_json(
            "Atlas",
            json!([]),
            vec![canvas_json("https://x.org/a", json!([]))],
        ))
        .unwrap();
        let (_, manifest) = ingested.pairs().next().unwrap();
        assert!(std::ptr::eq(manifest, ingested.manifest()));
    }

    #[test]
    fn missing_sequences_is_schema_error() {
        let err = parse_manifest(json!({"label": "No sequences"})).unwrap_err();
        assert!(matches!(err, IngestError::Schema(ref m) if m == MISSING_CANVASES));
    }

    #[test]
    fn empty_sequences_is_schema_error() {
        let err = parse_manifest(json!({"sequences": []})).unwrap_err();
        assert!(matches!(err, IngestError::Schema(_)));
    }

    #[test]
    fn missing_canvases_is_schema_error() {
        let err = parse_manifest(json!({"sequences": [{"@type": "sc:Sequence"}]})).unwrap_err();
        assert!(matches!(err, IngestError::Schema(_)));
    }

    #[test]
    fn empty_canvas_list_is_valid() {
        let ingested = parse_manifest(json!({"sequences": [{"canvases": []}]})).unwrap();
        assert_eq!(ingested.pairs().count(), 0);
    }

    #[test]
    fn malformed_image_is_not_a_schema_error() {
        let ingested = parse_manifest(manifest_json(
            "Atlas",
            json!([]),
            vec![
                canvas_json("https://x.org/a", json!([])),
                json!({"images": [{"resource": "https://x.org/b.jpg"}]}),
            ],
        ))
        .unwrap();
        let services: Vec<_> = ingested
            .pairs()
            .map(|(canvas, _)| canvas.image_service_id())
            .collect();
        assert_eq!(services, vec![Some("https://x.org/a"), None]);
    }

    #[test]
    fn non_object_is_schema_error() {
        assert!(matches!(
            parse_manifest(json!(["not", "a", "manifest"])),
            Err(IngestError::Schema(_))
        ));
    }

    #[test]
    fn wrongly_typed_sequences_is_schema_error() {
        assert!(matches!(
            parse_manifest(json!({"sequences": "nope"})),
            Err(IngestError::Schema(_))
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_manifest_str("{ not json"),
            Err(IngestError::Parse(_))
        ));
    }

    #[test]
    fn raw_document_is_kept_verbatim() {
        let doc = json!({
            "@id": "https://x.org/m",
            "x-custom": {"kept": true},
            "sequences": [{"canvases": []}]
        });
        let ingested = parse_manifest(doc.clone()).unwrap();
        assert_eq!(ingested.raw(), &doc);
    }

    // =========================================================================
    // fetch_manifest()
    // =========================================================================

    #[test]
    fn fetch_validates_body() {
        let source = MockSource::new()
            .with_fixture("https://x.org/dc", "digital-commonwealth.json")
            .with_body("https://x.org/bad", r#"{"label": "no sequences"}"#);
        let ok = fetch_manifest(&source, "https://x.org/dc").unwrap();
        assert_eq!(ok.canvases().len(), 3);
        assert!(matches!(
            fetch_manifest(&source, "https://x.org/bad"),
            Err(IngestError::Schema(_))
        ));
    }

    #[test]
    fn fetch_transport_error_passes_through() {
        let source = MockSource::new().with_status("https://x.org/gone", 404);
        let err = fetch_manifest(&source, "https://x.org/gone").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Transport {
                status: Some(404),
                ..
            }
        ));
    }

    // =========================================================================
    // repopulate()
    // =========================================================================

    #[test]
    fn repopulate_expands_items() {
        let doc = json!({
            "@context": "http://iiif.io/api/presentation/3.0/context.json",
            "type": "Manifest",
            "items": [
                manifest_json("One", json!([]), vec![canvas_json("https://x.org/1", json!([]))]),
                manifest_json("Two", json!([]), vec![
                    canvas_json("https://x.org/2a", json!([])),
                    canvas_json("https://x.org/2b", json!([]))
                ])
            ]
        });
        let manifests = repopulate(doc).unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[1].canvases().len(), 2);
    }

    #[test]
    fn repopulate_requires_items_array() {
        assert!(matches!(
            repopulate(json!({"items": {"not": "array"}})),
            Err(IngestError::Schema(_))
        ));
        assert!(matches!(repopulate(json!({})), Err(IngestError::Schema(_))));
        assert!(matches!(repopulate(json!("text")), Err(IngestError::Schema(_))));
    }

    #[test]
    fn repopulate_rejects_whole_document_on_bad_item() {
        let doc = json!({"items": [
            manifest_json("Good", json!([]), vec![canvas_json("https://x.org/1", json!([]))]),
            {"label": "bad"}
        ]});
        let err = repopulate(doc).unwrap_err();
        assert!(matches!(err, IngestError::Schema(ref m) if m.starts_with("items[1]")));
    }

    #[test]
    fn repopulate_empty_items() {
        assert!(repopulate(json!({"items": []})).unwrap().is_empty());
    }

    #[test]
    fn parse_combined_reports_malformed_json() {
        assert!(matches!(parse_combined("{"), Err(IngestError::Parse(_))));
    }
}
