//! Bourne-style shell scanner.
//!
//! Recognizes `function name`, `function name()`, `name()` and `name ()`. A function defined more
//! than once is reported only at its first definition.

use codetags::{Document, Kind, Tag, is_identifier_char, strip_keyword};
use codetags_lang::Language;

const KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "select", "in",
];

/// Build the outline of a shell script.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Function, "Function Definitions");

    let comments = Language::Shell.comments();
    for (lnum, line) in lines.iter().enumerate() {
        let text = line.as_ref().trim_start();
        if text.is_empty() || comments.is_line_comment(text) {
            continue;
        }

        let name = match strip_keyword(text, "function") {
            Some(rest) => shell_name(rest),
            None => {
                let name = shell_name(text);
                let after = text[name.len()..].trim_start();
                let parens = after
                    .strip_prefix('(')
                    .is_some_and(|inner| inner.trim_start().starts_with(')'));
                if parens { name } else { "" }
            }
        };
        if name.is_empty() || KEYWORDS.contains(&name) || name.starts_with('-') {
            continue;
        }
        if !doc.contains(&Kind::Function, name) {
            doc.add_function(Tag::function(name, lnum));
        }
    }
    doc
}

/// Function name characters accepted by bash: identifiers plus `-`, `.`, `:`.
fn shell_name(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|&(_, c)| !(is_identifier_char(c) || matches!(c, '-' | '.' | ':')))
        .map_or(text.len(), |(idx, _)| idx);
    &text[..end]
}
