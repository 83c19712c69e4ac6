// src/document/mod.rs
pub mod markers;
pub mod table;

pub use markers::SectionMarker;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::process::raw_table::RawTable;

static SECTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, table").expect("section selector should parse")
});

/// A fetched page reduced to what the pipeline reads: headings and table
/// boundaries in document order, plus the tables in that same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedDocument {
    pub markers: Vec<SectionMarker>,
    pub tables: Vec<RawTable>,
}

/// Walk `html` once. A single selector visits headings and tables in document
/// order, so the n-th `SectionMarker::Table` always describes `tables[n]`.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn walk(html: &str) -> FetchedDocument {
    let doc = Html::parse_document(html);
    let mut out = FetchedDocument::default();

    for el in doc.select(&SECTION_SELECTOR) {
        let name = el.value().name();
        match markers::heading_level(name) {
            Some(level) => out.markers.push(SectionMarker::Heading {
                level,
                text: markers::visible_text(el),
            }),
            None => {
                out.markers.push(SectionMarker::Table);
                out.tables.push(table::parse_table(el));
            }
        }
    }

    debug!(
        markers = out.markers.len(),
        tables = out.tables.len(),
        "walked document"
    );
    out
}
