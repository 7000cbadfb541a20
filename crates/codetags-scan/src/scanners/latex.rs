//! LaTeX scanner: sectioning commands, macro and environment definitions.

use codetags::{Document, Kind, LineCursor, Tag};

const SECTIONS: &[&str] = &["part", "chapter", "section", "subsection", "subsubsection"];
const NEW_COMMANDS: &[&str] = &["newcommand", "renewcommand", "providecommand"];

/// Build the outline of a LaTeX document.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Section, "Sections");
    doc.set_description(Kind::Macro, "Macro Definitions");
    doc.set_description(Kind::custom("environment"), "Environment Definitions");
    doc.set_priority(Kind::Section, 3);
    doc.set_priority(Kind::Macro, 2);
    doc.set_priority(Kind::custom("environment"), 1);

    for (lnum, line) in lines.iter().enumerate() {
        let mut cur = LineCursor::new(strip_comment(line.as_ref()));
        while cur.skip_past("\\") {
            let command = cur.eat_while(char::is_alphabetic);
            if command.is_empty() {
                // Control symbol such as `\\` or `\%`.
                cur.bump();
                continue;
            }
            if SECTIONS.contains(&command) {
                cur.eat("*");
                cur.skip_whitespace();
                if cur.eat("[") {
                    skip_group(&mut cur, '[', ']');
                }
                cur.skip_whitespace();
                if let Some(title) = brace_argument(&mut cur).filter(|t| !t.is_empty()) {
                    doc.add_element(Kind::Section, Tag::new(title, lnum, Kind::Section));
                }
            } else if NEW_COMMANDS.contains(&command) || command == "def" {
                cur.eat("*");
                cur.skip_whitespace();
                let braced = cur.eat("{");
                cur.skip_whitespace();
                if !cur.eat("\\") {
                    continue;
                }
                let name = cur.eat_while(|c| c.is_alphabetic() || c == '@');
                if braced {
                    cur.skip_whitespace();
                    cur.eat("}");
                }
                if !name.is_empty() && !doc.contains(&Kind::Macro, name) {
                    doc.add_element(Kind::Macro, Tag::new(name, lnum, Kind::Macro));
                }
            } else if command == "newenvironment" {
                cur.eat("*");
                cur.skip_whitespace();
                if let Some(name) = brace_argument(&mut cur).filter(|n| !n.is_empty()) {
                    let kind = Kind::custom("environment");
                    doc.add_element(kind.clone(), Tag::new(name, lnum, kind));
                }
            }
        }
    }
    doc
}

/// The line up to its first unescaped `%`.
fn strip_comment(line: &str) -> &str {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..idx],
            _ => escaped = false,
        }
    }
    line
}

/// Skip to the `close` matching an already consumed `open`.
fn skip_group(cur: &mut LineCursor<'_>, open: char, close: char) {
    let mut depth = 1usize;
    while let Some(c) = cur.bump() {
        if c == '\\' {
            cur.bump();
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return;
            }
        }
    }
}

/// `{...}` argument at the cursor, trimmed. An argument left open runs to the end of the line.
fn brace_argument(cur: &mut LineCursor<'_>) -> Option<String> {
    if !cur.eat("{") {
        return None;
    }
    let start = cur.pos();
    skip_group(cur, '{', '}');
    let inner = &cur.line()[start..cur.pos()];
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    Some(inner.split_whitespace().collect::<Vec<_>>().join(" "))
}
