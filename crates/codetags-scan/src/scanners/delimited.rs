//! Selector / declaration region tracking shared by the style sheet scanners.
//!
//! Walks a style sheet character by character and yields every selector written in a rule
//! region, together with the line it starts on. Declaration bodies, quoted strings, comments and
//! at-rules that do not hold nested rule sets are skipped.

use codetags::LineCursor;

/// At-rules whose block holds nested rule sets.
const NESTING_AT_RULES: &[&str] = &[
    "media", "supports", "document", "-moz-document", "container", "layer", "scope",
];

/// One selector of a rule set (`a.b > c` in `a.b > c, d { ... }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Rules,
    Declarations,
    Skip,
}

#[derive(Default)]
struct Regions {
    in_comment: bool,
    blocks: Vec<Block>,
    /// Pieces of the selector list being read.
    pieces: Vec<Selector>,
    current: Option<Selector>,
    /// Inside an at-rule prelude; `true` if its block nests rule sets.
    at_rule: Option<bool>,
    out: Vec<Selector>,
}

/// Collect the selectors of every rule set in `lines`, in source order.
pub(crate) fn selectors<S: AsRef<str>>(lines: &[S]) -> Vec<Selector> {
    let mut regions = Regions::default();
    for (lnum, line) in lines.iter().enumerate() {
        regions.scan_line(lnum, line.as_ref());
        // A selector list may continue on the next line.
        if let Some(current) = regions.current.as_mut() {
            current.text.push(' ');
        }
    }
    if regions.in_comment || !regions.blocks.is_empty() {
        tracing::trace!(
            open_blocks = regions.blocks.len(),
            in_comment = regions.in_comment,
            "style sheet ends inside a block or comment"
        );
    }
    regions.out
}

impl Regions {
    fn block(&self) -> Block {
        self.blocks.last().copied().unwrap_or(Block::Rules)
    }

    fn scan_line(&mut self, lnum: usize, line: &str) {
        let mut cur = LineCursor::new(line);
        while let Some(c) = cur.peek() {
            if self.in_comment {
                if cur.skip_past("*/") {
                    self.in_comment = false;
                }
                continue;
            }
            if cur.eat("/*") {
                self.in_comment = true;
                continue;
            }
            match self.block() {
                Block::Declarations | Block::Skip => match c {
                    '"' | '\'' => {
                        cur.skip_quoted(c);
                    }
                    '{' => {
                        cur.bump();
                        self.blocks.push(Block::Skip);
                    }
                    '}' => {
                        cur.bump();
                        self.blocks.pop();
                    }
                    _ => {
                        cur.bump();
                    }
                },
                Block::Rules => self.rule_char(&mut cur, lnum, c),
            }
        }
    }

    fn rule_char(&mut self, cur: &mut LineCursor<'_>, lnum: usize, c: char) {
        if let Some(nests) = self.at_rule {
            match c {
                '{' => {
                    self.at_rule = None;
                    self.blocks
                        .push(if nests { Block::Rules } else { Block::Skip });
                }
                ';' => self.at_rule = None,
                '"' | '\'' => {
                    cur.skip_quoted(c);
                    return;
                }
                _ => {}
            }
            cur.bump();
            return;
        }
        match c {
            '@' if self.current.is_none() && self.pieces.is_empty() => {
                cur.bump();
                let name = cur.eat_while(|c| c.is_alphanumeric() || c == '-' || c == '_');
                let name = name.to_ascii_lowercase();
                self.at_rule = Some(NESTING_AT_RULES.contains(&name.as_str()));
            }
            '{' => {
                cur.bump();
                self.finish_piece();
                self.out.append(&mut self.pieces);
                self.blocks.push(Block::Declarations);
            }
            '}' => {
                cur.bump();
                self.discard();
                if self.blocks.pop().is_none() {
                    tracing::trace!(line = lnum, "unbalanced closing brace in style sheet");
                }
            }
            ';' => {
                cur.bump();
                self.discard();
            }
            ',' => {
                cur.bump();
                self.finish_piece();
            }
            '"' | '\'' => {
                let start = cur.pos();
                cur.skip_quoted(c);
                let quoted = &cur.line()[start..cur.pos()];
                self.piece(lnum).text.push_str(quoted);
            }
            c if c.is_whitespace() => {
                cur.bump();
                if let Some(current) = self.current.as_mut() {
                    current.text.push(c);
                }
            }
            c => {
                cur.bump();
                self.piece(lnum).text.push(c);
            }
        }
    }

    fn piece(&mut self, lnum: usize) -> &mut Selector {
        self.current.get_or_insert_with(|| Selector {
            text: String::new(),
            line: lnum,
        })
    }

    fn finish_piece(&mut self) {
        if let Some(mut piece) = self.current.take() {
            let trimmed = piece.text.trim();
            if !trimmed.is_empty() {
                piece.text = trimmed.to_string();
                self.pieces.push(piece);
            }
        }
    }

    fn discard(&mut self) {
        self.current = None;
        self.pieces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(lines: &[&str]) -> Vec<(String, usize)> {
        selectors(lines)
            .into_iter()
            .map(|s| (s.text, s.line))
            .collect()
    }

    #[test]
    fn test_selector_lists_and_lines() {
        let found = texts(&[
            "h1, h2 { color: red; }",
            "ul li,",
            "  a[href=\"x,y\"] {",
            "  margin: 0 { nested };",
            "}",
        ]);
        assert_eq!(
            found,
            vec![
                ("h1".to_string(), 0),
                ("h2".to_string(), 0),
                ("ul li".to_string(), 1),
                ("a[href=\"x,y\"]".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_at_rules() {
        let found = texts(&[
            "@import url(\"a.css\");",
            "@media screen and (max-width: 10px) {",
            "  .narrow { width: 1px; }",
            "}",
            "@font-face { font-family: x; }",
            "@keyframes spin { from { top: 0; } to { top: 1px; } }",
            "p { }",
        ]);
        assert_eq!(found, vec![(".narrow".to_string(), 2), ("p".to_string(), 6)]);
    }

    #[test]
    fn test_comments_span_lines() {
        let found = texts(&["/* .hidden {", "} */ .shown /* x */ {", "}", "}", "em {}"]);
        assert_eq!(found, vec![(".shown".to_string(), 1), ("em".to_string(), 4)]);
    }
}
