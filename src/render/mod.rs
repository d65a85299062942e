//! Renderers turning a [`BlockAnalysis`](crate::domain::model::BlockAnalysis)
//! into report artifacts. All functions here are pure.

pub mod export;
pub mod plot;
pub mod summary;
pub mod table;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
