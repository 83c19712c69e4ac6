use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::config::PipelineConfig;
use crate::process::raw_table::{Cell, Column, RawTable, TitledTable};

static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[0-9]+\]").expect("citation regex should compile"));

/// A decimal quantity immediately followed by a unit suffix, e.g. `4.2 L/100 km`
/// or `.5 L/100 km`. Only ASCII digits count.
#[derive(Debug, Clone)]
pub struct UnitPattern {
    re: Regex,
}

impl UnitPattern {
    /// Spaces inside `unit` match any run of whitespace, including none.
    pub fn new(unit: &str) -> Result<Self> {
        let suffix = unit
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s*");
        let re = Regex::new(&format!(r"([0-9]*\.?[0-9]+)\s*{}", suffix))
            .with_context(|| format!("building unit pattern for {:?}", unit))?;
        Ok(Self { re })
    }

    /// First matching quantity in `text`, or `None`.
    pub fn extract(&self, text: &str) -> Option<f64> {
        self.re
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Remove every `[n]` footnote marker; all other text, spacing included, is kept.
pub fn strip_citations(text: &str) -> String {
    CITATION_RE.replace_all(text, "").into_owned()
}

pub fn extract_quantity(cell: &Cell, pattern: &UnitPattern) -> Option<f64> {
    pattern.extract(&cell.to_string())
}

/// Append the derived numeric column and strip citation markers from the
/// canonical column. Tables without the canonical column pass through.
/// Extraction reads the original text, before markers are stripped.
pub fn derive_numeric_column(
    mut table: RawTable,
    canonical: &str,
    derived: &str,
    pattern: &UnitPattern,
) -> RawTable {
    let Some(source) = table.column_mut(canonical) else {
        return table;
    };

    let values: Vec<Cell> = source
        .cells
        .iter()
        .map(|c| match extract_quantity(c, pattern) {
            Some(v) => Cell::Number(v),
            None => {
                trace!(cell = %c, "no quantity found");
                Cell::Null
            }
        })
        .collect();

    for cell in source.cells.iter_mut() {
        if let Cell::Text(text) = cell {
            *text = strip_citations(text);
        }
    }

    let column = Column::new(derived, values);
    match table.column_index(derived) {
        Some(idx) => table.columns[idx] = column,
        None => table.columns.push(column),
    }
    table
}

#[instrument(level = "debug", skip(tables, cfg), fields(tables = tables.len()))]
pub fn apply_numeric_extraction(
    tables: Vec<TitledTable>,
    cfg: &PipelineConfig,
) -> Result<Vec<TitledTable>> {
    let pattern = UnitPattern::new(&cfg.unit_label)?;
    let derived = cfg.derived_column();
    Ok(tables
        .into_iter()
        .map(|TitledTable { title, table }| {
            let table = derive_numeric_column(table, &cfg.canonical_column, &derived, &pattern);
            if let Some(col) = table.column(&derived) {
                let hits = col.cells.iter().filter(|c| !c.is_null()).count();
                debug!(title = %title, hits, rows = col.cells.len(), "derived numeric column");
            }
            TitledTable { title, table }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> UnitPattern {
        UnitPattern::new("L/100 km").unwrap()
    }

    #[test]
    fn extracts_value_and_strips_markers() {
        let text = Cell::Text("4.2 L/100 km[3]".into());
        assert_eq!(extract_quantity(&text, &pattern()), Some(4.2));
        assert_eq!(strip_citations("4.2 L/100 km[3]"), "4.2 L/100 km");
    }

    #[test]
    fn no_match_is_none_and_text_unchanged() {
        assert_eq!(extract_quantity(&Cell::Text("N/A".into()), &pattern()), None);
        assert_eq!(strip_citations("N/A"), "N/A");
        assert_eq!(extract_quantity(&Cell::Null, &pattern()), None);
        assert_eq!(extract_quantity(&Cell::Number(4.2), &pattern()), None);
    }

    #[test]
    fn tolerant_spacing_and_first_match() {
        let p = pattern();
        assert_eq!(p.extract("2.16L/100km"), Some(2.16));
        assert_eq!(p.extract("~3 L/100 km (1.2 L/100 km cruise)"), Some(3.0));
        assert_eq!(p.extract("52 mpg‑US (4.5 L/100 km)[7]"), Some(4.5));
    }

    #[test]
    fn leading_decimal_point_is_kept() {
        assert_eq!(pattern().extract(".5 L/100 km"), Some(0.5));
        assert_eq!(pattern().extract("12 L/100 km"), Some(12.0));
    }

    #[test]
    fn non_ascii_digits_are_skipped() {
        assert_eq!(pattern().extract("\u{0663}4.2 L/100 km"), Some(4.2));
        assert_eq!(pattern().extract("\u{0663}\u{0664} L/100 km"), None);
        assert_eq!(strip_citations("x[\u{0663}]"), "x[\u{0663}]");
    }

    #[test]
    fn marker_inside_match_span_yields_none() {
        assert_eq!(pattern().extract("4.2[3] L/100 km"), None);
    }

    #[test]
    fn strip_keeps_other_brackets_and_spacing() {
        assert_eq!(strip_citations("a  [b] [12]c[3][4]"), "a  [b] c");
        assert_eq!(strip_citations("[note 1] x"), "[note 1] x");
    }

    #[test]
    fn derived_column_appended_after_originals() {
        let t = RawTable::new(vec![
            Column::new("Model", vec![Cell::Text("A".into()), Cell::Text("B".into())]),
            Column::new(
                "Fuel per seat",
                vec![Cell::Text("2.5 L/100 km[1]".into()), Cell::Text("N/A".into())],
            ),
        ]);
        let out = derive_numeric_column(t, "Fuel per seat", "Fuel per seat (L/100 km)", &pattern());
        assert_eq!(
            out.column_names().collect::<Vec<_>>(),
            vec!["Model", "Fuel per seat", "Fuel per seat (L/100 km)"]
        );
        assert_eq!(
            out.columns[1].cells,
            vec![Cell::Text("2.5 L/100 km".into()), Cell::Text("N/A".into())]
        );
        assert_eq!(out.columns[2].cells, vec![Cell::Number(2.5), Cell::Null]);
    }

    #[test]
    fn table_without_canonical_column_passes_through() {
        let t = RawTable::new(vec![Column::new("Fuel burn", vec![Cell::Text("5 L/100 km".into())])]);
        let out = derive_numeric_column(t.clone(), "Fuel per seat", "Fuel per seat (L/100 km)", &pattern());
        assert_eq!(out, t);
    }

    #[test]
    fn applies_across_tables() -> Result<()> {
        let cfg = PipelineConfig::default();
        let t = RawTable::new(vec![Column::new(
            "Fuel per seat",
            vec![Cell::Text("3 L/100 km".into())],
        )]);
        let out = apply_numeric_extraction(vec![TitledTable::new("x", t)], &cfg)?;
        assert_eq!(
            out[0].table.column(&cfg.derived_column()).unwrap().cells,
            vec![Cell::Number(3.0)]
        );
        Ok(())
    }
}
