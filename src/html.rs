//! HTML attribute escaping for rendered tags.

/// Escape text for placement inside a double-quoted HTML attribute.
///
/// Covers `&`, `<`, `>`, and `"`. Single quotes pass through; rendered
/// attributes are always double-quoted.
pub(crate) fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
