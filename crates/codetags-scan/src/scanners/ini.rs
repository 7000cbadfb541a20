//! INI / conf scanner: `[section]` headers and their keys.

use codetags::{Class, Document, Kind, Tag};
use codetags_lang::Language;

/// Build the outline of an INI-style configuration file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Section, "Sections");
    doc.set_description(Kind::Variable, "Keys");
    doc.set_priority(Kind::Section, 1);

    let comments = Language::Ini.comments();
    let mut section: Option<Class> = None;
    for (lnum, line) in lines.iter().enumerate() {
        let text = line.as_ref().trim();
        if text.is_empty() || comments.is_line_comment(text) {
            continue;
        }

        if let Some(header) = text.strip_prefix('[') {
            let Some((name, _)) = header.split_once(']') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if let Some(done) = section.take() {
                doc.add_element(Kind::Section, done);
            }
            let mut next = Class::new(name, lnum).with_kind(Kind::Section);
            next.members_mut().set_description(Kind::Variable, "Keys");
            section = Some(next);
            continue;
        }

        let Some(end) = text.find(['=', ':']) else {
            continue;
        };
        let key = text[..end].trim();
        if key.is_empty() {
            continue;
        }
        let tag = Tag::variable(key, lnum);
        match section.as_mut() {
            Some(section) => section.add_variable(tag),
            None => doc.add_variable(tag),
        }
    }
    if let Some(done) = section {
        doc.add_element(Kind::Section, done);
    }
    doc
}
