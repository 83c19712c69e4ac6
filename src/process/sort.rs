use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

use crate::process::date_parser::chronological_key;
use crate::process::raw_table::{RawTable, TitledTable};

/// Rows without a key go last.
fn cmp_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable ascending sort of every row by `column`. Rows whose key cannot be
/// read keep their relative order at the end. A missing column or columns of
/// unequal length leave the table as it is.
pub fn sort_table(mut table: RawTable, column: &str) -> RawTable {
    let Some(col) = table.column(column) else {
        warn!(column, "chronological column missing; keeping source order");
        return table;
    };
    if !table.is_rectangular() {
        warn!(column, "columns differ in length; keeping source order");
        return table;
    }

    let keys: Vec<Option<f64>> = col.cells.iter().map(chronological_key).collect();
    let unkeyed = keys.iter().filter(|k| k.is_none()).count();
    if unkeyed > 0 {
        debug!(column, unkeyed, "rows without chronological key sorted last");
    }

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| cmp_keys(keys[a], keys[b]));
    table.permute_rows(&order);
    table
}

#[instrument(level = "debug", skip(tables), fields(tables = tables.len()))]
pub fn sort_by_chronology(tables: Vec<TitledTable>, column: &str) -> Vec<TitledTable> {
    tables
        .into_iter()
        .map(|TitledTable { title, table }| TitledTable {
            title,
            table: sort_table(table, column),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::raw_table::{Cell, Column};

    fn table(years: Vec<Cell>, labels: &[&str]) -> RawTable {
        RawTable::new(vec![
            Column::new("First flight", years),
            Column::new(
                "Model",
                labels.iter().map(|l| Cell::Text(l.to_string())).collect(),
            ),
        ])
    }

    fn labels(t: &RawTable) -> Vec<String> {
        t.column("Model")
            .unwrap()
            .cells
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn ascending_with_unkeyed_last() {
        let t = table(
            vec![
                Cell::Text("TBD".into()),
                Cell::Number(1995.0),
                Cell::Null,
                Cell::Text("1970[2]".into()),
            ],
            &["tbd", "b", "null", "a"],
        );
        let out = sort_table(t, "First flight");
        assert_eq!(labels(&out), vec!["a", "b", "tbd", "null"]);
        assert_eq!(out.row_count(), 4);
    }

    #[test]
    fn equal_keys_keep_order_and_resort_is_identity() {
        let t = table(
            vec![
                Cell::Number(1990.0),
                Cell::Number(1980.0),
                Cell::Number(1990.0),
            ],
            &["first-1990", "1980", "second-1990"],
        );
        let once = sort_table(t, "First flight");
        assert_eq!(labels(&once), vec!["1980", "first-1990", "second-1990"]);
        let twice = sort_table(once.clone(), "First flight");
        assert_eq!(twice, once);
    }

    #[test]
    fn uneven_columns_keep_order() {
        let t = RawTable::new(vec![
            Column::new("First flight", vec![Cell::Number(2000.0), Cell::Number(1990.0)]),
            Column::new("Fuel per seat", vec![Cell::Text("3 L/100 km".into())]),
        ]);
        let out = sort_table(t.clone(), "First flight");
        assert_eq!(out, t);
    }

    #[test]
    fn missing_column_keeps_order() {
        let t = table(vec![Cell::Number(2.0), Cell::Number(1.0)], &["x", "y"]);
        let out = sort_table(t.clone(), "Year");
        assert_eq!(out, t);
    }
}
