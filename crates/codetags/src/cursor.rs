//! Bounds-checked cursor over a single line.
//!
//! Scanners walk lines character by character. [`LineCursor`] keeps the byte position on a
//! `char` boundary and never indexes past the end of the line, so malformed input can only make
//! a lookahead return `None`.

use crate::parselib::{is_identifier_char, is_token};

/// A forward-only cursor over one line of text.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `line`.
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// The whole line.
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns `true` once every character has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Unconsumed remainder of the line.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Text consumed so far.
    pub fn consumed(&self) -> &'a str {
        &self.line[..self.pos]
    }

    /// Character at the cursor.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `n` positions after the cursor (`peek_nth(0) == peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Character just before the cursor.
    pub fn prev(&self) -> Option<char> {
        self.consumed().chars().next_back()
    }

    /// Returns `true` if the remainder starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Returns `true` if `token` starts at the cursor as a whitespace-delimited word.
    pub fn starts_with_token(&self, token: &str) -> bool {
        is_token(self.line, self.pos, token)
    }

    /// Returns `true` if the cursor sits at the start of a word (the previous character is not
    /// an identifier character).
    pub fn at_word_start(&self) -> bool {
        self.prev().is_none_or(|c| !is_identifier_char(c))
    }

    /// Consume one character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `n` characters (fewer at end of line).
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Consume `pat` if the remainder starts with it.
    pub fn eat(&mut self, pat: &str) -> bool {
        if self.starts_with(pat) {
            self.pos += pat.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.line[start..self.pos]
    }

    /// Skip whitespace.
    pub fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    /// Consume an identifier-character run, if any.
    pub fn eat_identifier(&mut self) -> Option<&'a str> {
        let word = self.eat_while(is_identifier_char);
        (!word.is_empty()).then_some(word)
    }

    /// Move just past the next occurrence of `pat`. Returns `false` (and moves to the end of the
    /// line) when `pat` does not occur.
    pub fn skip_past(&mut self, pat: &str) -> bool {
        match self.rest().find(pat) {
            Some(offset) => {
                self.pos += offset + pat.len();
                true
            }
            None => {
                self.skip_to_end();
                false
            }
        }
    }

    /// Consume the rest of the line.
    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }

    /// Skip a quoted literal starting at the cursor. The opening quote must be at the cursor.
    /// Backslash escapes the next character. Returns `true` if the closing quote was found on
    /// this line.
    pub fn skip_quoted(&mut self, quote: char) -> bool {
        if self.peek() != Some(quote) {
            return false;
        }
        self.bump();
        self.skip_quoted_body(quote)
    }

    /// Skip the body of a quoted literal whose opening quote was already consumed.
    pub fn skip_quoted_body(&mut self, quote: char) -> bool {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_bump_are_bounds_checked() {
        let mut cur = LineCursor::new("ab");
        assert_eq!(cur.peek_nth(1), Some('b'));
        assert_eq!(cur.peek_nth(5), None);
        cur.bump_n(10);
        assert!(cur.is_eof());
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.peek(), None);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut cur = LineCursor::new("é=ü");
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.prev(), Some('é'));
        assert!(cur.eat("="));
        assert_eq!(cur.rest(), "ü");
    }

    #[test]
    fn test_skip_quoted_honours_escapes() {
        let mut cur = LineCursor::new(r#""a\"b" tail"#);
        assert!(cur.skip_quoted('"'));
        assert_eq!(cur.rest(), " tail");

        let mut open = LineCursor::new(r#"'never closed"#);
        assert!(!open.skip_quoted('\''));
        assert!(open.is_eof());
    }

    #[test]
    fn test_word_helpers() {
        let mut cur = LineCursor::new("function foo()");
        assert!(cur.starts_with_token("function"));
        assert!(cur.at_word_start());
        assert_eq!(cur.eat_identifier(), Some("function"));
        cur.skip_whitespace();
        assert_eq!(cur.eat_identifier(), Some("foo"));
        assert!(!cur.skip_past("{"));
        assert!(cur.is_eof());
    }
}
