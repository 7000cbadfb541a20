//! Cascading style sheet scanner.
//!
//! Every selector of a rule set is split into its element (`tag`), class (`style`) and id (`id`)
//! parts; each distinct name is reported once, at its first use.

use codetags::{Document, Kind, LineCursor, Tag};

use super::delimited;

/// Build the outline of a CSS file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Tag, "Tags");
    doc.set_description(Kind::Style, "Class Selectors");
    doc.set_description(Kind::Id, "Identifiers");
    doc.set_priority(Kind::Id, 3);
    doc.set_priority(Kind::Style, 2);
    doc.set_priority(Kind::Tag, 1);

    for selector in delimited::selectors(lines) {
        for (kind, name) in selector_parts(&selector.text) {
            if !doc.contains(&kind, &name) {
                doc.add_element(kind.clone(), Tag::new(name, selector.line, kind));
            }
        }
    }
    doc
}

fn is_css_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Element, class and id names used by one selector, in order.
fn selector_parts(selector: &str) -> Vec<(Kind, String)> {
    let mut parts = Vec::new();
    let mut cur = LineCursor::new(selector);
    while let Some(c) = cur.peek() {
        match c {
            '.' | '#' => {
                cur.bump();
                let name = cur.eat_while(is_css_ident_char);
                if !name.is_empty() {
                    let kind = if c == '.' { Kind::Style } else { Kind::Id };
                    parts.push((kind, format!("{c}{name}")));
                }
            }
            ':' => {
                cur.bump();
                cur.eat(":");
                cur.eat_while(is_css_ident_char);
                if cur.eat("(") {
                    skip_arguments(&mut cur);
                }
            }
            '[' => {
                cur.skip_past("]");
            }
            c if c.is_alphabetic() || c == '_' => {
                let name = cur.eat_while(is_css_ident_char);
                parts.push((Kind::Tag, name.to_string()));
            }
            _ => {
                cur.bump();
            }
        }
    }
    parts
}

/// Skip a pseudo-class argument list whose `(` was already consumed.
fn skip_arguments(cur: &mut LineCursor<'_>) {
    let mut depth = 1usize;
    while let Some(c) = cur.bump() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}
