//! XML text escaping for generated package parts.
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use deckforge::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hi\"</tag>"), "&lt;tag&gt;&quot;hi&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Strip characters that are not allowed in XML 1.0 documents.
///
/// Generated slide text can carry stray control characters; PowerPoint refuses
/// to open a part containing them even when escaped.
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}'))
        .collect()
}

/// Escape text destined for an `<a:t>` run, dropping invalid characters first.
#[inline]
pub fn escape_text(s: &str) -> String {
    escape_xml(&strip_invalid_xml_chars(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_entities() {
        assert_eq!(escape_xml(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }

    #[test]
    fn test_escape_text_drops_control_chars() {
        assert_eq!(escape_text("bell\u{7} & tab\t"), "bell &amp; tab\t");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_text("Quarterly results"), "Quarterly results");
    }
}
