//! NSIS installer script scanner.
//!
//! NSIS keywords are case-insensitive, so matching happens on an ASCII-lowercased copy of each
//! line while names are taken from the original text at the same byte offsets.

use codetags::{Document, Kind, Tag, strip_keyword};
use codetags_lang::Language;

/// Build the outline of an NSIS script.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Section, "Section Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_description(Kind::Macro, "Macro Definitions");
    doc.set_priority(Kind::Section, 3);
    doc.set_priority(Kind::Function, 2);
    doc.set_priority(Kind::Macro, 1);

    let comments = Language::Nsis.comments();
    let mut in_comment = false;

    for (lnum, line) in lines.iter().enumerate() {
        let mut text = line.as_ref().trim_start();
        if in_comment {
            match text.find("*/") {
                Some(end) => {
                    in_comment = false;
                    text = text[end + 2..].trim_start();
                }
                None => continue,
            }
        }
        if text.starts_with("/*") {
            match text.find("*/") {
                Some(end) => text = text[end + 2..].trim_start(),
                None => {
                    in_comment = true;
                    continue;
                }
            }
        }
        if text.is_empty() || comments.is_line_comment(text) {
            continue;
        }

        let lower = text.to_ascii_lowercase();
        let rest_of = |keyword: &str| {
            strip_keyword(&lower, keyword).map(|rest| &text[text.len() - rest.len()..])
        };

        if let Some(rest) = rest_of("function") {
            if let Some(name) = arguments(rest).into_iter().next() {
                doc.add_function(Tag::function(name, lnum));
            }
        } else if let Some(rest) = rest_of("section").or_else(|| rest_of("sectiongroup")) {
            if let Some(name) = arguments(rest).into_iter().find(|arg| !arg.starts_with('/')) {
                doc.add_element(Kind::Section, Tag::new(name, lnum, Kind::Section));
            }
        } else if let Some(rest) = rest_of("!macro") {
            if let Some(name) = arguments(rest).into_iter().next() {
                doc.add_element(Kind::Macro, Tag::new(name, lnum, Kind::Macro));
            }
        }
    }
    doc
}

/// Split an NSIS argument list. Quoted arguments (`"`, `'` or `` ` ``) keep inner whitespace and
/// lose their quotes; an unquoted `;` or `#` starts a comment.
fn arguments(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = text.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };
        if first == ';' || first == '#' {
            break;
        }
        let mut arg = String::new();
        if matches!(first, '"' | '\'' | '`') {
            chars.next();
            for c in chars.by_ref() {
                if c == first {
                    break;
                }
                arg.push(c);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                arg.push(c);
            }
        }
        if !arg.is_empty() {
            args.push(arg);
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(doc: &Document, kind: Kind) -> Vec<(String, usize)> {
        doc.scope()
            .sorted(&kind)
            .into_iter()
            .map(|e| (e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_sections_functions_macros() {
        let doc = generate_tags(&[
            "; installer",
            "!macro VersionCheck ver",
            "!macroend",
            "Section \"Main Program\" SecMain",
            "SectionEnd",
            "section /o -Hidden",
            "SectionGroup /e \"!Extras\"",
            "SectionGroupEnd",
            "Section",
            "FUNCTION .onInit",
            "FunctionEnd",
            "/* Function Commented",
            "   Section Also */ Function Visible",
        ]);
        assert_eq!(
            named(&doc, Kind::Section),
            vec![
                ("!Extras".to_string(), 6),
                ("-Hidden".to_string(), 5),
                ("Main Program".to_string(), 3)
            ]
        );
        assert_eq!(
            named(&doc, Kind::Function),
            vec![(".onInit".to_string(), 9), ("Visible".to_string(), 12)]
        );
        assert_eq!(named(&doc, Kind::Macro), vec![("VersionCheck".to_string(), 1)]);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(
            arguments(r#"/o "A B" c ; tail"#),
            vec!["/o".to_string(), "A B".to_string(), "c".to_string()]
        );
        assert_eq!(arguments("\"unterminated"), vec!["unterminated".to_string()]);
        assert!(arguments("").is_empty());
    }
}
