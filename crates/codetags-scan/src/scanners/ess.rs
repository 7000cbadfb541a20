//! Editra style sheet scanner: every selector names a style tag.

use codetags::{Document, Kind, Tag};

use super::delimited;

/// Build the outline of an Editra style sheet.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Style, "Style Tags");

    for selector in delimited::selectors(lines) {
        if !doc.contains(&Kind::Style, &selector.text) {
            doc.add_element(
                Kind::Style,
                Tag::new(selector.text, selector.line, Kind::Style),
            );
        }
    }
    doc
}
