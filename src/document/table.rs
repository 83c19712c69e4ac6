use scraper::ElementRef;
use std::collections::HashMap;
use tracing::trace;

use super::markers::visible_text;
use crate::process::raw_table::{Cell, RawTable};

/// Spans above this are treated as markup errors and clamped.
const MAX_SPAN: usize = 1000;

#[derive(Debug, Clone)]
struct GridCell {
    text: String,
    header: bool,
}

struct SourceCell {
    cell: GridCell,
    colspan: usize,
    rowspan: usize,
}

fn span(el: &ElementRef, attr: &str) -> usize {
    el.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

/// `tr` elements owned by `table` itself, looking through `thead`/`tbody`/`tfoot`
/// but never into nested tables.
fn own_rows(table: ElementRef) -> Vec<ElementRef> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|c| c.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

fn source_cells(row: ElementRef) -> Vec<SourceCell> {
    child_elements(row)
        .filter_map(|c| {
            let header = match c.value().name() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            Some(SourceCell {
                cell: GridCell {
                    text: visible_text(c),
                    header,
                },
                colspan: span(&c, "colspan"),
                rowspan: span(&c, "rowspan"),
            })
        })
        .collect()
}

/// Lay rows out on a rectangular-ish grid, repeating spanned cells into every
/// position they cover.
fn expand_spans(rows: Vec<Vec<SourceCell>>) -> Vec<Vec<GridCell>> {
    // per column: (rows still to fill, cell to repeat)
    let mut carry: Vec<Option<(usize, GridCell)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out: Vec<GridCell> = Vec::new();
        let mut cells = row.into_iter().peekable();
        let mut col = 0;

        while cells.peek().is_some() || col < carry.len() {
            let held = match carry.get_mut(col) {
                Some(Some((left, held))) => {
                    *left -= 1;
                    Some((held.clone(), *left == 0))
                }
                _ => None,
            };
            if let Some((cell, done)) = held {
                if done {
                    carry[col] = None;
                }
                out.push(cell);
                col += 1;
                continue;
            }

            match cells.next() {
                Some(src) => {
                    for _ in 0..src.colspan {
                        if src.rowspan > 1 {
                            if carry.len() <= col {
                                carry.resize(col + 1, None);
                            }
                            carry[col] = Some((src.rowspan - 1, src.cell.clone()));
                        }
                        out.push(src.cell.clone());
                        col += 1;
                    }
                }
                None => {
                    out.push(GridCell {
                        text: String::new(),
                        header: false,
                    });
                    col += 1;
                }
            }
        }
        grid.push(out);
    }
    grid
}

/// Header labels stacked over one column, blanks and repeats dropped.
fn column_label(header_rows: &[Vec<GridCell>], col: usize) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for row in header_rows {
        if let Some(c) = row.get(col) {
            let t = c.text.as_str();
            if !t.is_empty() && !parts.contains(&t) {
                parts.push(t);
            }
        }
    }
    parts.join(" ")
}

/// Suffix repeated names with `.1`, `.2`, ... so every column is addressable.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let n = seen.entry(name.clone()).or_insert(0);
            let out = if *n == 0 {
                name
            } else {
                format!("{}.{}", name, n)
            };
            *n += 1;
            out
        })
        .collect()
}

/// Parse one `<table>` element. Leading rows made only of `th` cells form the
/// header; everything after is data.
pub fn parse_table(table: ElementRef) -> RawTable {
    let rows: Vec<Vec<SourceCell>> = own_rows(table)
        .into_iter()
        .map(source_cells)
        .filter(|r| !r.is_empty())
        .collect();
    let grid = expand_spans(rows);

    let header_len = grid
        .iter()
        .take_while(|r| r.iter().all(|c| c.header))
        .count();
    let (header_rows, body_rows) = grid.split_at(header_len);
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let names: Vec<String> = (0..width)
        .map(|i| {
            if header_rows.is_empty() {
                return i.to_string();
            }
            let label = column_label(header_rows, i);
            if label.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                label
            }
        })
        .collect();

    let data: Vec<Vec<Cell>> = body_rows
        .iter()
        .map(|r| r.iter().map(|c| Cell::from_text(&c.text)).collect())
        .collect();

    trace!(
        columns = width,
        header_rows = header_len,
        rows = data.len(),
        "parsed table"
    );
    RawTable::from_rows(dedupe_names(names), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn parse_first(html: &str) -> RawTable {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("table").unwrap();
        parse_table(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn header_and_typed_cells() {
        let t = parse_first(
            r#"<table>
              <tr><th>Model</th><th>First flight</th><th>Fuel per seat</th></tr>
              <tr><td>ATR 72</td><td>1988</td><td>2.8 L/100 km<sup>[4]</sup></td></tr>
              <tr><td>Q400</td><td></td><td>N/A</td></tr>
            </table>"#,
        );
        assert_eq!(
            t.column_names().collect::<Vec<_>>(),
            vec!["Model", "First flight", "Fuel per seat"]
        );
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns[1].cells, vec![Cell::Number(1988.0), Cell::Null]);
        assert_eq!(
            t.columns[2].cells[0],
            Cell::Text("2.8 L/100 km[4]".into())
        );
    }

    #[test]
    fn rowspan_and_colspan_expand() {
        let t = parse_first(
            r#"<table>
              <tr><th>Model</th><th colspan="2">Fuel</th></tr>
              <tr><td rowspan="2">A320</td><td>1</td><td>2</td></tr>
              <tr><td>3</td><td>4</td></tr>
            </table>"#,
        );
        assert_eq!(
            t.column_names().collect::<Vec<_>>(),
            vec!["Model", "Fuel", "Fuel.1"]
        );
        assert_eq!(
            t.columns[0].cells,
            vec![Cell::Text("A320".into()), Cell::Text("A320".into())]
        );
        assert_eq!(t.columns[1].cells, vec![Cell::Number(1.0), Cell::Number(3.0)]);
        assert_eq!(t.columns[2].cells, vec![Cell::Number(2.0), Cell::Number(4.0)]);
    }

    #[test]
    fn stacked_headers_join_labels() {
        let t = parse_first(
            r#"<table><thead>
              <tr><th rowspan="2">Model</th><th colspan="2">Fuel</th></tr>
              <tr><th>per seat</th><th>burn</th></tr>
            </thead><tbody>
              <tr><td>B737</td><td>x</td><td>y</td></tr>
            </tbody></table>"#,
        );
        assert_eq!(
            t.column_names().collect::<Vec<_>>(),
            vec!["Model", "Fuel per seat", "Fuel burn"]
        );
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn nested_table_rows_stay_out() {
        let t = parse_first(
            r#"<table>
              <tr><th>Outer</th></tr>
              <tr><td><table><tr><td>inner</td></tr><tr><td>more</td></tr></table></td></tr>
            </table>"#,
        );
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn headerless_table_gets_positional_names() {
        let t = parse_first("<table><tr><td>a</td><td>b</td></tr></table>");
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(t.row_count(), 1);
    }
}
