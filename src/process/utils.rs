use once_cell::sync::Lazy;
use regex::Regex;

static THOUSANDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?$").expect("thousands regex"));

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Parse a plain or comma-grouped decimal (`"1987"`, `"12,500.5"`).
/// Words like `NaN` or `inf` that `f64::from_str` accepts are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim();
    if !v.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Ok(n) = v.parse::<f64>() {
        return Some(n);
    }
    if THOUSANDS_RE.is_match(v) {
        return v.replace(',', "").parse().ok();
    }
    None
}
