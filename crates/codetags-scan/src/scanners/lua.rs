//! Lua scanner.
//!
//! Recognizes `function name(`, `local function name(` and `name = function(`. A dotted or
//! colon-qualified name (`function T.name(`, `function T:name(`, `T.name = function(`) is a
//! method of class `T`. Long comments and long strings (`--[==[ ... ]==]`, `[[ ... ]]`) may span
//! lines and hide everything inside them.

use codetags::{Class, Document, Kind, LineCursor, Tag, is_identifier, is_identifier_char};

/// Build the outline of a Lua source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_priority(Kind::Class, 2);
    doc.set_priority(Kind::Function, 1);

    // Level (`=` count) of the open long bracket, if any.
    let mut long_bracket: Option<usize> = None;
    for (lnum, line) in lines.iter().enumerate() {
        let mut cur = LineCursor::new(line.as_ref());
        while let Some(c) = cur.peek() {
            if let Some(level) = long_bracket {
                if cur.skip_past(&format!("]{}]", "=".repeat(level))) {
                    long_bracket = None;
                }
                continue;
            }
            if cur.eat("--") {
                match open_long_bracket(&mut cur) {
                    Some(level) => long_bracket = Some(level),
                    None => cur.skip_to_end(),
                }
                continue;
            }
            match c {
                '"' | '\'' => {
                    cur.skip_quoted(c);
                }
                '[' => match open_long_bracket(&mut cur) {
                    Some(level) => long_bracket = Some(level),
                    None => {
                        cur.bump();
                    }
                },
                c if (c.is_alphabetic() || c == '_') && cur.at_word_start() => {
                    let name = dotted_name(&mut cur);
                    if name == "function" {
                        cur.skip_whitespace();
                        let name = dotted_name(&mut cur);
                        register(&mut doc, name, lnum);
                    } else if assigned_function(&mut cur) {
                        register(&mut doc, name, lnum);
                    }
                }
                _ => {
                    cur.bump();
                }
            }
        }
    }
    if long_bracket.is_some() {
        tracing::trace!("lua: long comment or string left open at end of input");
    }
    doc
}

/// Consume `[`, `=`*, `[` and return the level, or leave the cursor alone.
fn open_long_bracket(cur: &mut LineCursor<'_>) -> Option<usize> {
    if cur.peek() != Some('[') {
        return None;
    }
    let mut level = 0;
    while cur.peek_nth(level + 1) == Some('=') {
        level += 1;
    }
    if cur.peek_nth(level + 1) != Some('[') {
        return None;
    }
    cur.bump_n(level + 2);
    Some(level)
}

/// `a.b:c` style name at the cursor.
fn dotted_name<'a>(cur: &mut LineCursor<'a>) -> &'a str {
    cur.eat_while(|c| is_identifier_char(c) || c == '.' || c == ':')
}

/// After a name: ` = function` (not `==`). Consumes the `function` keyword on success.
fn assigned_function(cur: &mut LineCursor<'_>) -> bool {
    let rest = cur.rest().trim_start();
    let Some(value) = rest.strip_prefix('=') else {
        return false;
    };
    if value.starts_with('=') {
        return false;
    }
    let value = value.trim_start();
    let is_function = value
        .strip_prefix("function")
        .is_some_and(|after| !after.starts_with(is_identifier_char));
    if is_function {
        let offset = cur.rest().len() - value.len() + "function".len();
        cur.bump_n(cur.rest()[..offset].chars().count());
    }
    is_function
}

fn register(doc: &mut Document, name: &str, lnum: usize) {
    match name.rfind(['.', ':']) {
        Some(split) => {
            let (owner, member) = (&name[..split], &name[split + 1..]);
            if owner.is_empty() || !is_identifier(member) {
                return;
            }
            if doc.class_mut(owner).is_none() {
                doc.add_class(Class::new(owner, lnum));
            }
            if let Some(class) = doc.class_mut(owner) {
                class.add_method(Tag::method(member, lnum));
            }
        }
        None if is_identifier(name) => doc.add_function(Tag::function(name, lnum)),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_functions_and_methods() {
        let doc = generate_tags(&[
            "local M = {}",
            "local function helper(x) return x end",
            "function M.new(opts)",
            "  local s = \"function fake()\"",
            "end",
            "function M:update(dt) end",
            "M.draw = function(self) end",
            "callback = function() end",
            "if a == function_value then end",
            "table.sort(t, function(a, b) return a < b end)",
        ]);
        let functions: Vec<(&str, usize)> = doc
            .functions()
            .iter()
            .map(|e| (e.name(), e.line()))
            .collect();
        assert_eq!(functions, vec![("callback", 7), ("helper", 1)]);

        let classes = doc.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!((classes[0].name.as_str(), classes[0].line), ("M", 2));
        let methods: Vec<(&str, usize)> = classes[0]
            .methods()
            .iter()
            .map(|e| (e.name(), e.line()))
            .collect();
        assert_eq!(methods, vec![("draw", 6), ("new", 2), ("update", 5)]);
    }

    #[test]
    fn test_long_comments_and_strings() {
        let doc = generate_tags(&[
            "--[==[",
            "function hidden() end",
            "]] still hidden",
            "]==] function visible() end",
            "local s = [[",
            "function in_string() end",
            "]]",
            "-- function commented() end",
            "--[[ one line ]] function after() end",
        ]);
        let names: Vec<&str> = doc.functions().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["after", "visible"]);
    }
}
