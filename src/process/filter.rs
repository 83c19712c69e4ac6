use tracing::{debug, instrument};

use crate::process::raw_table::{RawTable, TitledTable};

pub fn is_relevant(table: &RawTable, prefix: &str) -> bool {
    table.column_names().any(|name| name.starts_with(prefix))
}

/// Keep only tables with at least one column named `prefix…`, titles travelling
/// with their tables. Order is preserved.
#[instrument(level = "debug", skip(tables), fields(input = tables.len()))]
pub fn retain_relevant(tables: Vec<TitledTable>, prefix: &str) -> Vec<TitledTable> {
    let kept: Vec<TitledTable> = tables
        .into_iter()
        .filter(|t| {
            let keep = is_relevant(&t.table, prefix);
            if !keep {
                debug!(title = %t.title, "dropping table without matching column");
            }
            keep
        })
        .collect();
    debug!(kept = kept.len(), "relevance filter done");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::raw_table::{Cell, Column};

    fn table(cols: &[&str]) -> RawTable {
        RawTable::new(cols.iter().map(|c| Column::new(*c, vec![Cell::Null])).collect())
    }

    #[test]
    fn keeps_prefixed_in_order() {
        let input = vec![
            TitledTable::new("a", table(&["Model", "Fuel per seat"])),
            TitledTable::new("b", table(&["Range"])),
            TitledTable::new("c", table(&["Fuel burn"])),
            TitledTable::new("d", table(&["fuel lowercase"])),
        ];
        let out = retain_relevant(input, "Fuel");
        let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let out = retain_relevant(vec![TitledTable::new("x", table(&["Range"]))], "Fuel");
        assert!(out.is_empty());
        assert!(retain_relevant(Vec::new(), "Fuel").is_empty());
    }
}
