//! Citation syntax: `[@RFC2119]`, `[@!RFC2119]`, `[@-RFC2119]`, `[@a; @b]`.
//!
//! Citations reach the parser as broken shortcut links. The callback below
//! turns them back into links whose destination is the raw reference text,
//! which the tree builder then parses into a [`Citation`].

use mdrfc_ast::{Citation, CitationKind, CitationTarget};
use pulldown_cmark::{BrokenLink, CowStr};

/// Broken-link callback that resolves citation references.
pub(crate) fn citation_link(link: BrokenLink<'_>) -> Option<(CowStr<'_>, CowStr<'_>)> {
    parse_citation(&link.reference)?;
    Some((link.reference, CowStr::Borrowed("")))
}

/// Parse `@anchor` targets separated by `;`. Returns `None` if any target is malformed.
pub(crate) fn parse_citation(reference: &str) -> Option<Citation> {
    let targets = reference
        .split(';')
        .map(|part| parse_target(part.trim()))
        .collect::<Option<Vec<_>>>()?;
    Some(Citation { targets })
}

fn parse_target(part: &str) -> Option<CitationTarget> {
    let rest = part.strip_prefix('@')?;
    let (kind, anchor) = match rest.chars().next()? {
        '!' => (CitationKind::Normative, &rest[1..]),
        '?' => (CitationKind::Informative, &rest[1..]),
        '-' => (CitationKind::Suppressed, &rest[1..]),
        _ => (CitationKind::Informative, rest),
    };
    if anchor.is_empty() || anchor.contains(char::is_whitespace) {
        return None;
    }
    Some(CitationTarget {
        anchor: anchor.to_owned(),
        kind,
    })
}
