//! DOS / Windows batch file scanner: `:label` jump targets.

use codetags::{Document, Kind, Tag};

/// Build the outline of a batch file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Label, "Labels");

    for (lnum, line) in lines.iter().enumerate() {
        let Some(label) = line.as_ref().trim_start().strip_prefix(':') else {
            continue;
        };
        // `::` is a comment idiom.
        if label.starts_with(':') {
            continue;
        }
        let name = label
            .split(|c: char| c.is_whitespace() || c == ':')
            .next()
            .unwrap_or_default();
        if !name.is_empty() && !doc.contains(&Kind::Label, name) {
            doc.add_element(Kind::Label, Tag::new(name, lnum, Kind::Label));
        }
    }
    doc
}
