//! Perl scanner.
//!
//! Line oriented. `package Name;` makes `Name` the current package and subs that follow become
//! its methods; `package main;` returns to top-level functions. POD blocks are skipped and the
//! scan stops at `__END__` / `__DATA__`.

use codetags::{Class, Document, Kind, Tag, is_identifier_char, strip_keyword};
use codetags_lang::Language;

/// Build the outline of a Perl source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Class, "Packages");
    doc.set_description(Kind::Function, "Subroutines");
    doc.set_description(Kind::Variable, "Package Variables");
    doc.set_priority(Kind::Class, 3);
    doc.set_priority(Kind::Function, 2);
    doc.set_priority(Kind::Variable, 1);

    let comments = Language::Perl.comments();
    let mut in_pod = false;

    for (lnum, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if in_pod {
            if line.starts_with("=cut") {
                in_pod = false;
            }
            continue;
        }
        if line.starts_with('=') && line[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            in_pod = true;
            continue;
        }

        let text = line.trim_start();
        if text.starts_with("__END__") || text.starts_with("__DATA__") {
            break;
        }
        if text.is_empty() || comments.is_line_comment(text) {
            continue;
        }

        if let Some(rest) = strip_keyword(text, "package") {
            let name = qualified_name(rest);
            if name == "main" {
                doc.clear_last_class();
            } else if !name.is_empty() {
                let mut package = Class::new(name, lnum).with_kind(Kind::Package);
                package.members_mut().set_description(Kind::Method, "Subroutines");
                package
                    .members_mut()
                    .set_description(Kind::Variable, "Package Variables");
                doc.add_class(package);
            }
        } else if let Some(rest) = strip_keyword(text, "sub") {
            let name = qualified_name(rest);
            if name.is_empty() {
                continue;
            }
            match doc.last_class_mut() {
                Some(package) => package.add_method(Tag::method(name, lnum)),
                None => doc.add_function(Tag::function(name, lnum)),
            }
        } else if let Some(rest) = strip_keyword(text, "our") {
            for name in declared_variables(rest) {
                match doc.last_class_mut() {
                    Some(package) => package.add_variable(Tag::variable(name, lnum)),
                    None => doc.add_variable(Tag::variable(name, lnum)),
                }
            }
        }
    }
    if in_pod {
        tracing::trace!("perl: unterminated POD block at end of input");
    }
    doc
}

/// `Foo::Bar` or `Foo'Bar` style name at the start of `text`.
fn qualified_name(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|&(_, c)| !(is_identifier_char(c) || c == ':' || c == '\''))
        .map_or(text.len(), |(idx, _)| idx);
    text[..end].trim_end_matches([':', '\''])
}

/// Sigiled names declared by `our $x;` or `our ($x, @y) = ...;`.
fn declared_variables(text: &str) -> Vec<&str> {
    let head = text.split(['=', ';']).next().unwrap_or_default();
    head.split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')'))
        .filter(|word| {
            let mut chars = word.chars();
            matches!(chars.next(), Some('$' | '@' | '%'))
                && chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
                && word[1..].chars().all(|c| is_identifier_char(c) || c == ':')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(items: Vec<&codetags::CodeElement>) -> Vec<(String, usize)> {
        items
            .into_iter()
            .map(|e| (e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_packages_and_subs() {
        let doc = generate_tags(&[
            "#!/usr/bin/perl",
            "our $VERSION = '1.0';",
            "sub helper { 1 }",
            "package Foo::Bar;",
            "our ($x, @list);",
            "sub new {",
            "    my $class = shift;",
            "}",
            "# sub commented {}",
            "package main;",
            "sub run { }",
        ]);
        assert_eq!(
            named(doc.functions()),
            vec![("helper".to_string(), 2), ("run".to_string(), 10)]
        );
        assert_eq!(named(doc.variables()), vec![("$VERSION".to_string(), 1)]);
        let package = doc.classes()[0];
        assert_eq!(package.name, "Foo::Bar");
        assert_eq!(package.kind, Kind::Package);
        assert_eq!(named(package.methods()), vec![("new".to_string(), 5)]);
        assert_eq!(
            named(package.variables()),
            vec![("$x".to_string(), 4), ("@list".to_string(), 4)]
        );
    }

    #[test]
    fn test_pod_and_end_markers() {
        let doc = generate_tags(&[
            "=head1 NAME",
            "",
            "sub in_pod {}",
            "=cut",
            "sub visible {}",
            "__END__",
            "sub after_end {}",
        ]);
        assert_eq!(named(doc.functions()), vec![("visible".to_string(), 4)]);
    }

    #[test]
    fn test_malformed_lines() {
        let doc = generate_tags(&["=", "sub", "package", "package ;", "sub {"]);
        assert!(doc.is_empty());
    }
}
