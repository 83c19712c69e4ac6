use tracing::{debug, instrument, warn};

use crate::process::raw_table::{RawTable, TitledTable};

/// Rename the `legacy` column to `canonical`, in place and keeping its
/// position. When both names are present the canonical column is kept and
/// the legacy one dropped.
pub fn rename_legacy(mut table: RawTable, legacy: &str, canonical: &str) -> RawTable {
    let Some(idx) = table.column_index(legacy) else {
        return table;
    };
    if table.column_index(canonical).is_some() {
        warn!(
            legacy,
            canonical, "both column names present; dropping legacy column"
        );
        table.columns.remove(idx);
    } else {
        table.columns[idx].name = canonical.to_string();
    }
    table
}

#[instrument(level = "debug", skip(tables), fields(tables = tables.len()))]
pub fn normalize_columns(
    tables: Vec<TitledTable>,
    legacy: &str,
    canonical: &str,
) -> Vec<TitledTable> {
    tables
        .into_iter()
        .map(|TitledTable { title, table }| {
            let renamed = table.column_index(legacy).is_some();
            let table = rename_legacy(table, legacy, canonical);
            if renamed {
                debug!(title = %title, "normalized legacy column name");
            }
            TitledTable { title, table }
        })
        .collect()
}
