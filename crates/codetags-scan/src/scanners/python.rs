//! Python scanner.
//!
//! Scope is defined by indentation. Open classes are kept on a stack of frames, each remembering
//! the indent of its `class` line; a frame closes as soon as a statement line is indented at or
//! left of it. Only lines that *start* a statement are matched: lines inside triple-quoted
//! strings, inside open brackets or after a backslash continuation are skipped.

use codetags::{
    Class, Document, Kind, LineCursor, Tag, get_first_identifier, is_identifier, leading_indent,
    strip_keyword,
};

const TAB_WIDTH: usize = 8;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Build the outline of a Python source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_description(Kind::Variable, "Global Variables");
    doc.set_priority(Kind::Class, 3);
    doc.set_priority(Kind::Function, 2);
    doc.set_priority(Kind::Variable, 1);

    let mut lexer = Lexer::default();
    let mut classes: Vec<ClassFrame> = Vec::new();
    let mut function_indent: Option<usize> = None;

    for (lnum, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let statement = lexer.at_statement_start();
        let assignment = lexer.scan(line);
        if !statement {
            continue;
        }

        let text = line.trim_start();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let indent = leading_indent(line, TAB_WIDTH);
        if function_indent.is_some_and(|def_indent| indent <= def_indent) {
            function_indent = None;
        }
        while classes.last().is_some_and(|frame| indent <= frame.indent) {
            close_class(&mut classes, &mut doc);
        }
        // Locals of a function body are not part of the outline.
        if function_indent.is_some() {
            continue;
        }

        if let Some(rest) = strip_keyword(text, "class") {
            if let Some(name) = get_first_identifier(rest).filter(|name| is_identifier(name)) {
                classes.push(ClassFrame {
                    class: Class::new(name, lnum),
                    indent,
                });
            }
            continue;
        }

        let def = strip_keyword(text, "async").unwrap_or(text);
        if let Some(rest) = strip_keyword(def, "def") {
            if let Some(name) = get_first_identifier(rest).filter(|name| is_identifier(name)) {
                match classes.last_mut() {
                    Some(frame) if indent > 0 => frame.class.add_method(Tag::method(name, lnum)),
                    _ => doc.add_function(Tag::function(name, lnum)),
                }
            }
            function_indent = Some(indent);
            continue;
        }

        let Some(eq) = assignment else {
            continue;
        };
        let target = line.get(..eq).unwrap_or_default().trim();
        let target = match target.split_once(':') {
            // `else: name = 0`
            Some((head, body))
                if get_first_identifier(head.trim_start()).is_some_and(is_keyword) =>
            {
                body.trim()
            }
            // `name: int = 0`
            Some((name, _)) => name.trim_end(),
            None => target,
        };
        if !is_identifier(target) || is_keyword(target) {
            continue;
        }
        match classes.last_mut() {
            Some(frame) => frame.class.add_variable(Tag::variable(target, lnum)),
            None => doc.add_variable(Tag::variable(target, lnum)),
        }
    }

    while !classes.is_empty() {
        close_class(&mut classes, &mut doc);
    }
    if lexer.state != State::Code {
        tracing::trace!("python: unterminated triple-quoted string at end of input");
    }
    doc
}

struct ClassFrame {
    class: Class,
    indent: usize,
}

fn close_class(classes: &mut Vec<ClassFrame>, doc: &mut Document) {
    let Some(frame) = classes.pop() else {
        return;
    };
    match classes.last_mut() {
        Some(parent) => parent.class.add_element(Kind::Class, frame.class),
        None => doc.add_class(frame.class),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Code,
    /// Inside a `'''` or `"""` string opened with the given quote.
    TripleQuoted(char),
}

/// Lexical state carried from one line to the next.
#[derive(Debug, Default)]
struct Lexer {
    state: State,
    depth: usize,
    continued: bool,
}

impl Lexer {
    fn at_statement_start(&self) -> bool {
        self.state == State::Code && self.depth == 0 && !self.continued
    }

    /// Walk one line, updating the carried state. If the line started a statement, returns the
    /// byte offset of its first top-level plain `=`.
    fn scan(&mut self, line: &str) -> Option<usize> {
        let tracking = self.at_statement_start();
        let mut assignment = None;
        self.continued = false;

        let mut cur = LineCursor::new(line);
        while let Some(c) = cur.peek() {
            if let State::TripleQuoted(quote) = self.state {
                if c == '\\' {
                    cur.bump_n(2);
                } else if cur.eat(triple(quote)) {
                    self.state = State::Code;
                } else {
                    cur.bump();
                }
                continue;
            }

            match c {
                '#' => break,
                '"' | '\'' => {
                    if cur.eat(triple(c)) {
                        self.state = State::TripleQuoted(c);
                    } else {
                        cur.skip_quoted(c);
                    }
                }
                '(' | '[' | '{' => {
                    self.depth += 1;
                    cur.bump();
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    cur.bump();
                }
                '\\' => {
                    cur.bump();
                    if cur.is_eof() {
                        self.continued = true;
                    } else {
                        cur.bump();
                    }
                }
                '=' => {
                    let plain = cur
                        .prev()
                        .is_none_or(|prev| !"=!<>+-*/%&|^:@~".contains(prev))
                        && cur.peek_nth(1) != Some('=');
                    if tracking && plain && self.depth == 0 && assignment.is_none() {
                        assignment = Some(cur.pos());
                    }
                    cur.bump();
                    cur.eat("=");
                }
                _ => {
                    cur.bump();
                }
            }
        }
        assignment
    }
}

fn triple(quote: char) -> &'static str {
    if quote == '"' { "\"\"\"" } else { "'''" }
}
