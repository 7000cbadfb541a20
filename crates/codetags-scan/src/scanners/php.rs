//! PHP scanner.
//!
//! Character-level state machine with an explicit brace counter. Only text inside `<?php ... ?>`
//! is scanned. A class (or interface/trait/enum) opens at the first `{` after its header and
//! closes when the brace counter returns to the depth recorded at that point; functions seen at
//! class-body depth are methods, named functions elsewhere outside a class are top-level.

use codetags::{Class, Document, Kind, LineCursor, Tag, is_identifier, is_identifier_char};

const CLASS_KEYWORDS: &[&str] = &["class", "interface", "trait", "enum"];
const PROPERTY_KEYWORDS: &[&str] = &["public", "protected", "private", "var", "static", "readonly"];

/// Build the outline of a PHP source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Namespace, "Namespaces");
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_priority(Kind::Namespace, 3);
    doc.set_priority(Kind::Class, 2);
    doc.set_priority(Kind::Function, 1);

    let mut scanner = Scanner::default();
    for (lnum, line) in lines.iter().enumerate() {
        scanner.scan_line(&mut doc, lnum, line.as_ref());
    }
    if scanner.state == State::BlockComment {
        tracing::trace!("php: unterminated block comment at end of input");
    }
    doc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// Outside `<?php ... ?>`.
    #[default]
    Html,
    Code,
    BlockComment,
    Quoted(char),
}

#[derive(Debug, Default)]
struct Scanner {
    state: State,
    depth: usize,
    /// Brace depth at which the open class started.
    class_depth: Option<usize>,
    /// Header seen, waiting for its `{`.
    pending_class: Option<(String, usize)>,
}

impl Scanner {
    fn in_class_body(&self) -> bool {
        self.class_depth.is_some_and(|depth| self.depth == depth + 1)
    }

    fn scan_line(&mut self, doc: &mut Document, lnum: usize, line: &str) {
        if self.state == State::Code && self.in_class_body() {
            self.scan_property(doc, lnum, line);
        }

        let mut cur = LineCursor::new(line);
        while let Some(c) = cur.peek() {
            match self.state {
                State::Html => {
                    if cur.skip_past("<?") {
                        cur.eat("php");
                        cur.eat("=");
                        self.state = State::Code;
                    }
                }
                State::BlockComment => {
                    if cur.skip_past("*/") {
                        self.state = State::Code;
                    }
                }
                State::Quoted(quote) => {
                    if cur.skip_quoted_body(quote) {
                        self.state = State::Code;
                    }
                }
                State::Code => self.scan_code(doc, lnum, &mut cur, c),
            }
        }
    }

    fn scan_code(&mut self, doc: &mut Document, lnum: usize, cur: &mut LineCursor<'_>, c: char) {
        if cur.eat("?>") {
            self.state = State::Html;
            return;
        }
        if cur.eat("/*") {
            self.state = State::BlockComment;
            return;
        }
        if cur.starts_with("#[") {
            cur.bump_n(2);
            return;
        }
        if cur.starts_with("//") || c == '#' {
            // Line comments end at the line end or at a closing tag.
            match cur.rest().find("?>") {
                Some(offset) => cur.bump_n(cur.rest()[..offset].chars().count()),
                None => cur.skip_to_end(),
            }
            return;
        }
        match c {
            '"' | '\'' | '`' => {
                cur.bump();
                self.state = State::Quoted(c);
            }
            '{' => {
                cur.bump();
                if let Some((name, line)) = self.pending_class.take() {
                    if self.class_depth.is_none() {
                        doc.add_class(Class::new(name, line));
                        self.class_depth = Some(self.depth);
                    }
                }
                self.depth += 1;
            }
            '}' => {
                cur.bump();
                if self.depth == 0 {
                    tracing::trace!(line = lnum, "php: unbalanced closing brace");
                }
                self.depth = self.depth.saturating_sub(1);
                if self.class_depth == Some(self.depth) {
                    self.class_depth = None;
                    doc.clear_last_class();
                }
            }
            ';' => {
                cur.bump();
                self.pending_class = None;
            }
            c if is_identifier_char(c) && cur.at_word_start() => {
                self.scan_word(doc, lnum, cur);
            }
            _ => {
                cur.bump();
            }
        }
    }

    fn scan_word(&mut self, doc: &mut Document, lnum: usize, cur: &mut LineCursor<'_>) {
        let before = cur.prev();
        let Some(word) = cur.eat_identifier() else {
            cur.bump();
            return;
        };
        // `$class`, `Foo::class`, `$this->function`
        if matches!(before, Some('$' | ':' | '>')) {
            return;
        }
        if !cur.peek().is_some_and(char::is_whitespace) {
            return;
        }

        if CLASS_KEYWORDS.contains(&word) {
            cur.skip_whitespace();
            if let Some(name) = cur.eat_identifier().filter(|name| is_identifier(name)) {
                self.pending_class = Some((name.to_string(), lnum));
            }
        } else if word == "function" {
            cur.skip_whitespace();
            cur.eat("&");
            let Some(name) = cur.eat_identifier().filter(|name| is_identifier(name)) else {
                return;
            };
            if self.class_depth.is_some() {
                if self.in_class_body() {
                    if let Some(class) = doc.last_class_mut() {
                        class.add_method(Tag::method(name, lnum));
                    }
                }
            } else {
                doc.add_function(Tag::function(name, lnum));
            }
        } else if word == "namespace" && self.depth == 0 {
            cur.skip_whitespace();
            let name = cur.eat_while(|c| is_identifier_char(c) || c == '\\');
            if !name.is_empty() {
                doc.add_element(Kind::Namespace, Tag::new(name, lnum, Kind::Namespace));
            }
        }
    }

    /// `public $name = ...;` at class-body depth.
    fn scan_property(&self, doc: &mut Document, lnum: usize, line: &str) {
        let text = line.trim_start();
        let first = text.split_whitespace().next().unwrap_or_default();
        if !PROPERTY_KEYWORDS.contains(&first) {
            return;
        }
        let head = text.split(['(', '=', ';']).next().unwrap_or_default();
        if head.split_whitespace().any(|word| word == "function" || word == "const") {
            return;
        }
        let Some((_, after)) = head.split_once('$') else {
            return;
        };
        let name: String = after.chars().take_while(|&c| is_identifier_char(c)).collect();
        if is_identifier(&name) {
            if let Some(class) = doc.last_class_mut() {
                class.add_variable(Tag::variable(name, lnum));
            }
        }
    }
}
