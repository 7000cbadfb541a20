//! Small stateless helpers shared by the scanners.

/// Returns `true` for characters allowed in an identifier: alphanumerics and `_`.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Longest identifier-character prefix of `text`, or `None` if it is empty.
///
/// Digits are accepted anywhere, including the first position; use [`is_identifier`] when the
/// caller needs real identifier syntax.
pub fn get_first_identifier(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|&(_, c)| !is_identifier_char(c))
        .map_or(text.len(), |(idx, _)| idx);
    (end > 0).then(|| &text[..end])
}

/// Returns `true` if `name` is non-empty and made only of identifier characters.
pub fn is_good_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

/// Like [`is_good_name`], but the first character must not be a digit.
pub fn is_identifier(name: &str) -> bool {
    is_good_name(name) && name.chars().next().is_some_and(|c| !c.is_numeric())
}

/// Returns `true` if `token` appears in `line` at byte offset `index` as a whole word.
///
/// The character before `index` (if any) and the character after the token (if any) must be
/// whitespace. An `index` that is out of range or not on a char boundary never matches.
pub fn is_token(line: &str, index: usize, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let Some(rest) = line.get(index..) else {
        return false;
    };
    let Some(after) = rest.strip_prefix(token) else {
        return false;
    };
    let before_ok = line[..index]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    let after_ok = after.chars().next().is_none_or(char::is_whitespace);
    before_ok && after_ok
}

/// If `text` starts with the whole word `keyword`, the remainder with leading whitespace removed.
pub fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    is_token(text, 0, keyword).then(|| text[keyword.len()..].trim_start())
}

/// Width of the leading whitespace of `line`, expanding tabs to multiples of `tab_width`.
pub fn leading_indent(line: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tab_width - width % tab_width,
            c if c.is_whitespace() && c != '\n' && c != '\r' => width += 1,
            _ => break,
        }
    }
    width
}
