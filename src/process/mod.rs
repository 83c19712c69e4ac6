// src/process/mod.rs
pub mod date_parser;
pub mod extract;
pub mod filter;
pub mod headings;
pub mod raw_table;
pub mod schema;
pub mod sort;
pub mod utils;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::document::FetchedDocument;
use raw_table::TitledTable;

/// Headings → relevance → column names → numeric extraction → sort.
///
/// Consumes its own copy of the fetched document; nothing is shared between
/// runs. Unparsable cells become Null and an empty result is returned as-is,
/// so the only error is a bad unit label in `cfg`.
#[tracing::instrument(level = "info", skip_all, fields(tables = document.tables.len()))]
pub fn run(document: FetchedDocument, cfg: &PipelineConfig) -> Result<Vec<TitledTable>> {
    let FetchedDocument { markers, tables } = document;

    let titled = headings::associate(&markers, tables, &cfg.untitled);
    let relevant = filter::retain_relevant(titled, &cfg.domain_prefix);
    if relevant.is_empty() {
        warn!(prefix = %cfg.domain_prefix, "no relevant tables");
        return Ok(relevant);
    }
    let normalized =
        schema::normalize_columns(relevant, &cfg.legacy_column, &cfg.canonical_column);
    let extracted = extract::apply_numeric_extraction(normalized, cfg)?;
    let sorted = sort::sort_by_chronology(extracted, &cfg.chronological_column);

    info!(tables = sorted.len(), "pipeline finished");
    Ok(sorted)
}

/// What a chart of chronology against the derived value would need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub title: String,
    pub rows: usize,
    pub derived_values: usize,
    pub chronology: Option<(f64, f64)>,
    pub derived_range: Option<(f64, f64)>,
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub fn summarize(table: &TitledTable, cfg: &PipelineConfig) -> TableSummary {
    let t = &table.table;
    let derived: Vec<f64> = t
        .column(&cfg.derived_column())
        .map(|c| c.cells.iter().filter_map(|x| x.as_number()).collect())
        .unwrap_or_default();
    let chronology = t.column(&cfg.chronological_column).and_then(|c| {
        min_max(c.cells.iter().filter_map(date_parser::chronological_key))
    });

    TableSummary {
        title: table.title.clone(),
        rows: t.row_count(),
        derived_values: derived.len(),
        chronology,
        derived_range: min_max(derived.into_iter()),
    }
}
