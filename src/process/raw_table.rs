use serde::{Deserialize, Serialize};
use std::fmt;

use crate::process::utils::parse_number;

/// A single scraped cell. HTML tables mix numbers, free text and blanks in
/// the same column, so every cell carries its own kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify already-cleaned cell text: blank → Null, float → Number, else Text.
    pub fn from_text(text: &str) -> Self {
        let t = text.trim();
        if t.is_empty() {
            Cell::Null
        } else if let Some(n) = parse_number(t) {
            Cell::Number(n)
        } else {
            Cell::Text(t.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("nan"),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// A table as scraped: ordered, named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<Column>,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build from a header and row-major data; short rows are padded with Null.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for col in columns.iter_mut() {
                col.cells.push(cells.next().unwrap_or(Cell::Null));
            }
        }
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// True when every column holds the same number of cells.
    pub fn is_rectangular(&self) -> bool {
        let n = self.row_count();
        self.columns.iter().all(|c| c.cells.len() == n)
    }

    /// Reorder every column by the same row permutation. Callers check
    /// `is_rectangular` first; `order` must index every column.
    pub fn permute_rows(&mut self, order: &[usize]) {
        for col in self.columns.iter_mut() {
            col.cells = order.iter().map(|&i| col.cells[i].clone()).collect();
        }
    }
}

/// A table paired with the section heading it appeared under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitledTable {
    pub title: String,
    pub table: RawTable,
}

impl TitledTable {
    pub fn new(title: impl Into<String>, table: RawTable) -> Self {
        Self {
            title: title.into(),
            table,
        }
    }
}
