//! C / C++ scanner.
//!
//! Unlike the line-oriented scanners this one treats the whole buffer as one text blob. Comments
//! and string/char literals are blanked first (newlines are preserved so line numbers survive),
//! then function signatures, class-like definitions and `#define`s are located with regular
//! expressions. Line numbers come from counting newlines up to the match offset.

use codetags::{Class, Document, Kind, Tag};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Names that match the signature shape but are control-flow keywords.
const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "case", "catch", "return", "sizeof", "do",
];

/// `type [type...] name(params) [const] {`
static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[A-Za-z0-9_*&:<>~]+[ \t\r\n*&]+)+([A-Za-z_~][A-Za-z0-9_:~]*)[ \t\r\n]*\((?:[^()]|\([^()]*\))*\)[ \t\r\n]*(?:const[ \t\r\n]*)?(?:noexcept[ \t\r\n]*)?(?:override[ \t\r\n]*)?\{",
    )
    .expect("Invalid C function regex")
});

/// `class|struct|union|namespace Name ... {`
static CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct|union|namespace)[ \t\r\n]+([A-Za-z_][A-Za-z0-9_]*)[^;{}()=]*\{")
        .expect("Invalid C class regex")
});

/// `#define NAME`
static MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*define[ \t]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid C macro regex")
});

/// Build the outline of a C or C++ source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Macro, "Macros");
    doc.set_description(Kind::Namespace, "Namespaces");
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_priority(Kind::Macro, 4);
    doc.set_priority(Kind::Namespace, 3);
    doc.set_priority(Kind::Class, 2);
    doc.set_priority(Kind::Function, 1);

    let text = mask_comments_and_literals(&join_lines(lines));
    let index = TextIndex::new(&text);

    let mut bodies: Vec<ClassBody> = Vec::new();
    for caps in CLASS.captures_iter(&text) {
        let (Some(keyword), Some(name), Some(whole)) = (caps.get(1), caps.get(2), caps.get(0))
        else {
            continue;
        };
        let line = index.line_of(name.start());
        if keyword.as_str() == "namespace" {
            if !doc.contains(&Kind::Namespace, name.as_str()) {
                doc.add_element(Kind::Namespace, Tag::new(name.as_str(), line, Kind::Namespace));
            }
            continue;
        }
        let open = whole.end() - 1;
        bodies.push(ClassBody {
            class: Class::new(name.as_str(), line),
            open,
            close: index.matching_brace(open),
        });
    }

    for caps in FUNCTION.captures_iter(&text) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let fname = name.as_str();
        if KEYWORDS.contains(&fname) {
            continue;
        }
        let line = index.line_of(name.start());

        if let Some(body) = innermost_body(&mut bodies, name.start()) {
            body.class.add_method(Tag::method(fname, line));
            continue;
        }
        if let Some((owner, method)) = fname.rsplit_once("::") {
            if let Some(body) = bodies.iter_mut().find(|body| body.class.name == owner) {
                body.class.add_method(Tag::method(method, line));
                continue;
            }
        }
        doc.add_function(Tag::function(fname, line));
    }

    for body in bodies {
        doc.add_class(body.class);
    }
    doc.clear_last_class();

    for caps in MACRO.captures_iter(&text) {
        if let Some(name) = caps.get(1) {
            let line = index.line_of(name.start());
            doc.add_element(Kind::Macro, Tag::new(name.as_str(), line, Kind::Macro));
        }
    }

    doc
}

struct ClassBody {
    class: Class,
    open: usize,
    close: usize,
}

fn innermost_body(bodies: &mut [ClassBody], offset: usize) -> Option<&mut ClassBody> {
    bodies
        .iter_mut()
        .filter(|body| body.open < offset && offset < body.close)
        .min_by_key(|body| body.close - body.open)
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text
}

/// Newline offsets and brace pairs of the masked buffer, computed in one pass.
struct TextIndex {
    newlines: Vec<usize>,
    /// Offset of each `{` mapped to its matching `}`.
    braces: HashMap<usize, usize>,
    len: usize,
}

impl TextIndex {
    fn new(text: &str) -> Self {
        let mut newlines = Vec::new();
        let mut braces = HashMap::new();
        let mut open = Vec::new();
        for (idx, b) in text.bytes().enumerate() {
            match b {
                b'\n' => newlines.push(idx),
                b'{' => open.push(idx),
                b'}' => {
                    if let Some(start) = open.pop() {
                        braces.insert(start, idx);
                    }
                }
                _ => {}
            }
        }
        Self {
            newlines,
            braces,
            len: text.len(),
        }
    }

    /// Zero-based line containing `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset)
    }

    /// Offset of the `}` matching the `{` at `open`, or the end of the text if unbalanced.
    fn matching_brace(&self, open: usize) -> usize {
        self.braces.get(&open).copied().unwrap_or(self.len)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mask {
    Code,
    LineComment,
    BlockComment,
    Literal(char),
}

/// Replace comment and literal contents with spaces, keeping newlines and quote characters.
fn mask_comments_and_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = Mask::Code;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            Mask::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = Mask::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = Mask::BlockComment;
                }
                '"' | '\'' => {
                    out.push(c);
                    state = Mask::Literal(c);
                }
                _ => out.push(c),
            },
            Mask::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = Mask::Code;
                } else {
                    out.push(' ');
                }
            }
            Mask::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = Mask::Code;
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
            Mask::Literal(quote) => match c {
                '\\' => {
                    out.push(' ');
                    if let Some(next) = chars.next() {
                        out.push(if next == '\n' { '\n' } else { ' ' });
                    }
                }
                '\n' => {
                    // Unterminated literal: C literals do not span lines.
                    out.push('\n');
                    state = Mask::Code;
                }
                c if c == quote => {
                    out.push(c);
                    state = Mask::Code;
                }
                _ => out.push(' '),
            },
        }
    }
    if state == Mask::BlockComment {
        tracing::trace!("c: unterminated block comment at end of input");
    }
    out
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
    fn test_text_index() {
        let index = TextIndex::new("a {\n { }\n}\n} {");
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(3), 0);
        assert_eq!(index.line_of(4), 1);
        assert_eq!(index.line_of(11), 3);
        assert_eq!(index.matching_brace(2), 9);
        assert_eq!(index.matching_brace(5), 7);
        assert_eq!(index.matching_brace(13), 14);
    }

    #[test]
    fn test_large_buffer_line_numbers() {
        let mut lines = Vec::new();
        for i in 0..20_000 {
            lines.push(format!("int handler_{i:05}(int code) {{"));
            lines.push("    return code;".to_string());
            lines.push("}".to_string());
        }
        let doc = generate_tags(&lines);
        let functions = doc.functions();
        assert_eq!(functions.len(), 20_000);
        for (i, function) in functions.iter().enumerate() {
            assert_eq!(function.name(), format!("handler_{i:05}"));
            assert_eq!(function.line(), i * 3);
        }
    }

    #[test]
    fn test_keyword_exclusion() {
        let doc = generate_tags(&["    if (x > 0) {", "    }"]);
        assert!(doc.functions().is_empty());

        let doc = generate_tags(&["} else if (y) {", "}"]);
        assert!(doc.functions().is_empty());
    }

    #[test]
    fn test_function_line_numbers() {
        let doc = generate_tags(&[
            "#include <stdio.h>",
            "",
            "int add(int a, int b) {",
            "    return a + b;",
            "}",
            "static const char *",
            "name_of(struct item *it,",
            "        int flags)",
            "{",
            "    if (flags) { return it->name; }",
            "    return NULL;",
            "}",
        ]);
        assert_eq!(
            named(doc.functions()),
            vec![("add".to_string(), 2), ("name_of".to_string(), 6)]
        );
    }

    #[test]
    fn test_macros_and_comments() {
        let doc = generate_tags(&[
            "#define MAX(a, b) ((a) > (b) ? (a) : (b))",
            "  #  define  DEBUG 1",
            "/* int hidden(void) {",
            "} */",
            "// void also_hidden(void) {",
            "const char *s = \"void fake(void) {\";",
            "void real(void) { }",
        ]);
        assert_eq!(
            named(doc.scope().sorted(&Kind::Macro)),
            vec![("DEBUG".to_string(), 1), ("MAX".to_string(), 0)]
        );
        assert_eq!(named(doc.functions()), vec![("real".to_string(), 6)]);
    }

    #[test]
    fn test_cpp_classes_and_methods() {
        let doc = generate_tags(&[
            "namespace geo {",
            "class Shape {",
            "public:",
            "    virtual double area() const {",
            "        return 0.0;",
            "    }",
            "};",
            "struct Point;",
            "double Shape::perimeter(int sides) {",
            "    return 0.0;",
            "}",
            "}",
        ]);
        assert_eq!(named(doc.scope().sorted(&Kind::Namespace)), vec![("geo".to_string(), 0)]);
        let classes = doc.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(
            named(classes[0].methods()),
            vec![("area".to_string(), 3), ("perimeter".to_string(), 8)]
        );
        assert!(doc.functions().is_empty());
        assert!(doc.last_class().is_none());
    }

    #[test]
    fn test_mask_preserves_lines() {
        let masked = mask_comments_and_literals("a /* x\ny */ b \"q\\\"\" c\n");
        assert_eq!(masked.matches('\n').count(), 2);
        assert!(masked.contains('b'));
        assert!(!masked.contains('x'));
        assert!(!masked.contains('q'));
    }
}
