use tracing::{debug, instrument};

use crate::document::SectionMarker;
use crate::process::raw_table::{RawTable, TitledTable};

/// One title per `Table` marker: the text of the nearest heading before it,
/// or `untitled` when no heading has been seen yet.
pub fn assign_titles(markers: &[SectionMarker], untitled: &str) -> Vec<String> {
    let (_, titles) = markers.iter().fold(
        (untitled.to_string(), Vec::new()),
        |(current, mut titles), marker| match marker {
            SectionMarker::Heading { text, .. } => (text.trim().to_string(), titles),
            SectionMarker::Table => {
                titles.push(current.clone());
                (current, titles)
            }
        },
    );
    titles
}

/// Pair each table with its title by position.
///
/// Requires the n-th `Table` marker to describe `tables[n]`; this is not
/// checked, and a mismatch only shifts titles. Extra tables or markers on
/// either side are dropped.
#[instrument(level = "debug", skip_all, fields(markers = markers.len(), tables = tables.len()))]
pub fn associate(
    markers: &[SectionMarker],
    tables: Vec<RawTable>,
    untitled: &str,
) -> Vec<TitledTable> {
    let titles = assign_titles(markers, untitled);
    if titles.len() != tables.len() {
        debug!(
            titles = titles.len(),
            tables = tables.len(),
            "table marker count differs from table count"
        );
    }
    titles
        .into_iter()
        .zip(tables)
        .map(|(title, table)| TitledTable::new(title, table))
        .collect()
}
