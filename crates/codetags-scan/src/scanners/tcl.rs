//! Tcl scanner.
//!
//! `proc name` lines become procedures. `namespace eval name {` and `oo::class create name {`
//! open scopes that last until the brace depth returns to where they started; procedures (and
//! `method`s of classes) found inside are attached to the innermost open scope.

use codetags::{Class, Document, Kind, LineCursor, Tag, strip_keyword};
use codetags_lang::Language;

/// Build the outline of a Tcl source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Namespace, "Namespaces");
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Procedure, "Procedure Definitions");
    doc.set_priority(Kind::Namespace, 3);
    doc.set_priority(Kind::Class, 2);
    doc.set_priority(Kind::Procedure, 1);

    let comments = Language::Tcl.comments();
    let mut depth = 0usize;
    let mut scopes: Vec<ScopeFrame> = Vec::new();

    for (lnum, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let text = line.trim_start();
        if text.is_empty() || comments.is_line_comment(text) {
            continue;
        }

        if let Some(rest) = strip_keyword(text, "proc") {
            let name = tcl_name(rest);
            if !name.is_empty() {
                let tag = Tag::new(name, lnum, Kind::Procedure);
                match scopes.last_mut() {
                    Some(frame) => frame.class.add_element(Kind::Procedure, tag),
                    None => doc.add_element(Kind::Procedure, tag),
                }
            }
        } else if let Some(rest) = strip_keyword(text, "method") {
            let name = tcl_name(rest);
            if let Some(frame) = scopes.last_mut().filter(|f| f.class.kind == Kind::Class) {
                if !name.is_empty() {
                    frame.class.add_method(Tag::method(name, lnum));
                }
            }
        } else if let Some(name) = strip_keyword(text, "namespace")
            .and_then(|rest| strip_keyword(rest, "eval"))
            .map(tcl_name)
            .filter(|name| !name.is_empty())
        {
            let mut class = Class::new(name, lnum).with_kind(Kind::Namespace);
            class
                .members_mut()
                .set_description(Kind::Procedure, "Procedures");
            scopes.push(ScopeFrame { class, depth });
        } else if let Some(name) = strip_keyword(text, "oo::class")
            .and_then(|rest| strip_keyword(rest, "create"))
            .map(tcl_name)
            .filter(|name| !name.is_empty())
        {
            scopes.push(ScopeFrame {
                class: Class::new(name, lnum),
                depth,
            });
        }

        depth = brace_depth(depth, line);
        while scopes.last().is_some_and(|frame| depth <= frame.depth) {
            close_scope(&mut scopes, &mut doc);
        }
    }

    while !scopes.is_empty() {
        close_scope(&mut scopes, &mut doc);
    }
    doc
}

struct ScopeFrame {
    class: Class,
    depth: usize,
}

fn close_scope(scopes: &mut Vec<ScopeFrame>, doc: &mut Document) {
    let Some(frame) = scopes.pop() else {
        return;
    };
    let kind = frame.class.kind.clone();
    match (scopes.last_mut(), kind) {
        (Some(parent), kind) => parent.class.add_element(kind, frame.class),
        (None, Kind::Class) => doc.add_class(frame.class),
        (None, kind) => doc.add_element(kind, frame.class),
    }
}

/// A Tcl word used as a name: everything up to whitespace or a brace.
fn tcl_name(text: &str) -> &str {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '{' || c == '}' || c == ';')
        .unwrap_or(text.len());
    &text[..end]
}

/// Brace depth after `line`, ignoring escaped braces and braces inside double quotes.
fn brace_depth(mut depth: usize, line: &str) -> usize {
    let mut cur = LineCursor::new(line);
    while let Some(c) = cur.bump() {
        match c {
            '\\' => {
                cur.bump();
            }
            '"' => {
                cur.skip_quoted_body('"');
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}
