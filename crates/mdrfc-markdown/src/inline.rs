//! Inline mmark syntax found inside plain text: callouts and index entries.
//!
//! - `<<3>>` becomes a [`NodeKind::Callout`].
//! - `(!item)` and `(!item, subitem)` become a [`NodeKind::Index`];
//!   `(!!item, subitem)` marks the entry as primary.

use mdrfc_ast::{Index, NodeKind, Tree};

/// Replace callouts and index entries in every text node of `tree`.
pub(crate) fn split_inline_text(tree: &mut Tree) {
    for id in tree.descendants(tree.root()) {
        let NodeKind::Text { literal } = tree.kind(id) else {
            continue;
        };
        if !literal.contains("<<") && !literal.contains("(!") {
            continue;
        }
        let parts = split_text(literal);
        if matches!(parts.as_slice(), [NodeKind::Text { .. }]) {
            continue;
        }
        let (Some(parent), Some(position)) = (tree.parent(id), tree.position(id)) else {
            continue;
        };

        let mut parts = parts.into_iter();
        if let Some(first) = parts.next() {
            tree.set_kind(id, first);
        }
        for (offset, kind) in parts.enumerate() {
            tree.insert(parent, position + 1 + offset, kind);
        }
    }
}

/// Split `text` into text, callout and index nodes, in order.
pub(crate) fn split_text(text: &str) -> Vec<NodeKind> {
    let mut parts = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some((kind, consumed)) = match_callout(rest).or_else(|| match_index(rest)) {
            if !plain.is_empty() {
                parts.push(NodeKind::text(std::mem::take(&mut plain)));
            }
            parts.push(kind);
            rest = &rest[consumed..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    if !plain.is_empty() {
        parts.push(NodeKind::text(plain));
    }
    parts
}

fn match_callout(text: &str) -> Option<(NodeKind, usize)> {
    let after = text.strip_prefix("<<")?;
    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    let id = &after[..digits];
    if id.is_empty() || id.bytes().all(|b| b == b'0') {
        return None;
    }
    after[digits..].strip_prefix(">>")?;
    Some((NodeKind::Callout { id: id.to_owned() }, 2 + digits + 2))
}

fn match_index(text: &str) -> Option<(NodeKind, usize)> {
    let after = text.strip_prefix("(!")?;
    let (primary, body) = match after.strip_prefix('!') {
        Some(body) => (true, body),
        None => (false, after),
    };
    let end = body.find(')')?;
    let inner = &body[..end];
    if inner.contains('\n') {
        return None;
    }

    let (item, subitem) = match inner.split_once(',') {
        Some((item, subitem)) => (item.trim(), Some(subitem.trim())),
        None => (inner.trim(), None),
    };
    if item.is_empty() {
        return None;
    }

    let consumed = text.len() - body.len() + end + 1;
    let index = Index {
        item: item.to_owned(),
        subitem: subitem.filter(|s| !s.is_empty()).map(str::to_owned),
        primary,
    };
    Some((NodeKind::Index(index), consumed))
}
