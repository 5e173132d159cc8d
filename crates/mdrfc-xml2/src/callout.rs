//! Escaping of code and math literals with callout detection.
//!
//! A callout is a comment marker, optional blanks, the callout prefix and a
//! positive number, closed by the mirrored prefix when the prefix contains
//! brackets:
//!
//! ```text
//! fn main() { // <<1>>
//!             ^^ ^^^^^ comment marker "//", prefix "<<", id 1, closer ">>"
//! ```
//!
//! The whole sequence is replaced by a callout element; everything else is
//! XML-escaped.

use crate::state::{push_escaped, push_escaped_char};

/// Escape `raw` into `out`, replacing callouts.
///
/// Without a prefix or without comment markers this is plain escaping.
pub fn escape_callouts(raw: &str, comments: &[String], prefix: Option<&str>, out: &mut String) {
    let comments: Vec<&str> = comments
        .iter()
        .map(String::as_str)
        .filter(|comment| !comment.is_empty())
        .collect();
    let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) else {
        push_escaped(raw, out);
        return;
    };
    if comments.is_empty() {
        push_escaped(raw, out);
        return;
    }

    let closer = closing_delimiter(prefix);
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        let found = comments
            .iter()
            .find_map(|comment| match_callout(rest, comment, prefix, closer.as_deref()));
        if let Some((id, consumed)) = found {
            write_callout(id, out);
            rest = &rest[consumed..];
        } else {
            push_escaped_char(c, out);
            rest = &rest[c.len_utf8()..];
        }
    }
}

/// Callout element shared by literal blocks and inline callout nodes.
pub(crate) fn write_callout(id: &str, out: &mut String) {
    out.push_str(r#"<spanx style="emph">"#);
    push_escaped(id, out);
    out.push_str("</spanx>");
}

/// Match a callout at the start of `text`. Returns the id and the bytes consumed.
fn match_callout<'a>(
    text: &'a str,
    comment: &str,
    prefix: &str,
    closer: Option<&str>,
) -> Option<(&'a str, usize)> {
    let after_comment = text.strip_prefix(comment)?;
    let after_blank = after_comment.trim_start_matches([' ', '\t']);
    let after_prefix = after_blank.strip_prefix(prefix)?;

    let digits = after_prefix.bytes().take_while(u8::is_ascii_digit).count();
    let id = &after_prefix[..digits];
    if id.is_empty() || id.bytes().all(|b| b == b'0') {
        return None;
    }

    let mut remaining = &after_prefix[digits..];
    if let Some(closer) = closer {
        remaining = remaining.strip_prefix(closer)?;
    }
    Some((id, text.len() - remaining.len()))
}

/// Mirror of a bracketing prefix: `<<` closes with `>>`, `[(` with `)]`.
fn closing_delimiter(prefix: &str) -> Option<String> {
    if !prefix.contains(['<', '(', '[', '{']) {
        return None;
    }
    let closer = prefix
        .chars()
        .rev()
        .map(|c| match c {
            '<' => '>',
            '(' => ')',
            '[' => ']',
            '{' => '}',
            other => other,
        })
        .collect();
    Some(closer)
}
