//! HTML escaping
//!
//! Every dynamic value written into markup (header values, product fields,
//! request paths) goes through `escape_html`.

use std::borrow::Cow;

/// Escape text for use in HTML element content or a quoted attribute value
///
/// Borrows the input unchanged when nothing needs escaping.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
