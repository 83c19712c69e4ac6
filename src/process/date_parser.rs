use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::process::extract::strip_citations;
use crate::process::raw_table::Cell;
use crate::process::utils::parse_number;

static LEADING_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})\b").expect("year regex should compile"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%B %d, %Y"];

/// `1987-06-15` → `1987.45…`: the year plus the elapsed fraction of it.
fn fractional_year(d: NaiveDate) -> f64 {
    let days = if NaiveDate::from_ymd_opt(d.year(), 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    d.year() as f64 + d.ordinal0() as f64 / days
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        // "%B %Y" has no day, so pin it to the 1st
        .or_else(|| NaiveDate::parse_from_str(&format!("1 {}", s), "%d %B %Y").ok())
}

/// Sort key for a chronological cell. Numbers are used as-is; text is tried as
/// a number, a calendar date, then a leading four-digit year.
pub fn chronological_key(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Null => None,
        Cell::Number(n) if n.is_nan() => None,
        Cell::Number(n) => Some(*n),
        Cell::Text(raw) => {
            let s = strip_citations(raw);
            let s = s.trim();
            if let Some(n) = parse_number(s) {
                return Some(n);
            }
            if let Some(d) = parse_date(s) {
                return Some(fractional_year(d));
            }
            LEADING_YEAR_RE
                .captures(s)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
    }
}
