//! HTML gallery presenter.
//!
//! [`HtmlGallery`] is the crate's own [`GallerySink`] / [`ViewerSink`]: it
//! collects cards and renders them into a single self-contained `index.html`.
//!
//! ## Page layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ title                      N images      │
//! ├──────────────────────────────────────────┤
//! │ deep-zoom viewer (OpenSeadragon)         │
//! ├──────────┬──────────┬──────────┬─────────┤
//! │ [x]      │ [x]      │ [x]      │         │
//! │ thumb    │ thumb    │ thumb    │  ...    │
//! │ Title:   │ Title:   │ Title:   │         │
//! │ Author:  │ ...      │          │         │
//! │ View Item│          │          │         │
//! └──────────┴──────────┴──────────┴─────────┘
//! ```
//!
//! Clicking a thumbnail opens its `info.json` in the viewer. The `x` button
//! removes a card after confirmation. Both are done by `static/gallery.js`;
//! everything else is static HTML. Styles are `static/gallery.css` plus color
//! variables from config.
//!
//! Uses [maud](https://maud.lambda.xyz/), so every interpolated value is
//! HTML-escaped.

use crate::config::{self, SiteConfig};
use crate::gallery::{GallerySink, ViewerSink};
use crate::record::ImageRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/gallery.css");
const JS: &str = include_str!("../static/gallery.js");
const OPENSEADRAGON_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/openseadragon/4.0.0/openseadragon.min.js";

/// Cards collected for one gallery page.
#[derive(Debug, Default)]
pub struct HtmlGallery {
    cards: Vec<ImageRecord>,
    opened: Option<String>,
}

impl HtmlGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[ImageRecord] {
        &self.cards
    }

    /// The `info.json` shown in the viewer when the page loads.
    pub fn opened(&self) -> Option<&str> {
        self.opened.as_deref()
    }

    pub fn render_page(&self, config: &SiteConfig) -> Markup {
        let css = format!(
            "{}\n\n{}",
            config::generate_color_css(&config.colors),
            CSS_STATIC
        );
        let title = &config.gallery.title;

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    style { (PreEscaped(css)) }
                    script src=(OPENSEADRAGON_JS) {}
                }
                body {
                    header.gallery-header {
                        h1 { (title) }
                        span.gallery-count { (image_count(self.cards.len())) }
                    }
                    div #viewer data-open=[self.opened.as_deref()] {}
                    main #gallery {
                        @for card in &self.cards {
                            (render_card(card))
                        }
                    }
                    script { (PreEscaped(JS)) }
                }
            }
        }
    }

    /// Write `index.html` into `output_dir`.
    pub fn write(&self, output_dir: &Path, config: &SiteConfig) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join("index.html");
        fs::write(&path, self.render_page(config).into_string())?;
        Ok(path)
    }
}

impl GallerySink for HtmlGallery {
    fn render_card(&mut self, record: &ImageRecord) {
        self.cards.push(record.clone());
    }

    fn clear_gallery(&mut self) {
        self.cards.clear();
        self.opened = None;
    }
}

impl ViewerSink for HtmlGallery {
    fn open(&mut self, full_resolution_url: &str) {
        self.opened = Some(full_resolution_url.to_string());
    }
}

fn image_count(n: usize) -> String {
    match n {
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    }
}

/// One gallery card.
fn render_card(record: &ImageRecord) -> Markup {
    html! {
        div.card {
            button.delete-btn type="button" title="Remove from gallery" { "x" }
            img src=(record.thumbnail_url)
                data-info=(record.full_resolution_url)
                alt=(record.title)
                loading="lazy";
            p { "Title: " (record.title) }
            p { "Author: " (record.author) }
            p { "Date: " (record.date) }
            p { "Collection: " (record.collection) }
            p { "Attribution: " (record.attribution) }
            p {
                a href=(record.location_href()) target="_blank" rel="noopener" { "View Item" }
            }
        }
    }
}
