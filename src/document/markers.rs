use scraper::{node::Node, ElementRef};
use serde::{Deserialize, Serialize};

use crate::process::utils::normalize_ws;

/// One heading or table boundary, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionMarker {
    Heading { level: u8, text: String },
    Table,
}

impl SectionMarker {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        SectionMarker::Heading {
            level,
            text: text.into(),
        }
    }
}

/// `h1`..`h6` → `Some(1..=6)`.
pub fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h' | b'H', d @ b'1'..=b'6'] => Some(*d - b'0'),
        _ => None,
    }
}

fn is_hidden(el: &ElementRef) -> bool {
    let v = el.value();
    matches!(v.name(), "style" | "script")
        || v.classes().any(|c| c == "mw-editsection")
        || v
            .attr("style")
            .map_or(false, |s| s.replace(' ', "").contains("display:none"))
}

/// Visible text under `root`: `<br>` counts as a space, edit links and
/// style/script bodies are skipped, whitespace is collapsed.
pub fn visible_text(root: ElementRef) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .ancestors()
                    .take_while(|a| a.id() != root.id())
                    .filter_map(ElementRef::wrap)
                    .any(|a| is_hidden(&a));
                if !hidden {
                    out.push_str(text);
                }
            }
            Node::Element(e) if e.name() == "br" => out.push(' '),
            _ => {}
        }
    }
    normalize_ws(&out)
}
