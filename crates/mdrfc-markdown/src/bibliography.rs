//! Reference sections built from the citations in a document.

use std::borrow::Cow;
use std::collections::HashMap;

use mdrfc_ast::{BibliographyItem, BibliographyKind, CitationKind, Matter, NodeKind, Tree};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Extract every top-level `<reference anchor="…">` element from an HTML block.
///
/// Returns `(anchor, xml)` pairs. Malformed XML ends the scan; whatever was
/// complete before the error is kept.
pub(crate) fn reference_elements(html: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);

    let mut found = Vec::new();
    let mut open: Option<(String, usize)> = None;
    let mut depth = 0usize;

    loop {
        let start = position(&reader);
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if open.is_some() {
                    depth += 1;
                } else if let Some(anchor) = reference_anchor(&e) {
                    open = Some((anchor, start));
                    depth = 0;
                }
            }
            Ok(Event::Empty(e)) if open.is_none() => {
                if let Some(anchor) = reference_anchor(&e)
                    && let Some(xml) = html.get(start..position(&reader))
                {
                    found.push((anchor, xml.to_owned()));
                }
            }
            Ok(Event::End(_)) if open.is_some() => {
                if depth > 0 {
                    depth -= 1;
                } else if let Some((anchor, begin)) = open.take()
                    && let Some(xml) = html.get(begin..position(&reader))
                {
                    found.push((anchor, xml.to_owned()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::debug!(error = %err, "Stopped scanning malformed reference XML");
                break;
            }
            Ok(_) => {}
        }
    }
    found
}

fn position(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or_default()
}

fn reference_anchor(e: &BytesStart<'_>) -> Option<String> {
    if e.name().as_ref() != b"reference" {
        return None;
    }
    let attr = e.try_get_attribute("anchor").ok().flatten()?;
    attr.unescape_value().ok().map(Cow::into_owned)
}

/// Append normative and informative reference sections for every cited anchor.
///
/// The sections go right after an existing back-matter marker. A document
/// that uses matter markers but has no back matter gets one appended first.
pub(crate) fn append_bibliography(tree: &mut Tree, references: &HashMap<String, String>) {
    let root = tree.root();
    let mut normative: Vec<String> = Vec::new();
    let mut informative: Vec<String> = Vec::new();

    for id in tree.descendants(root) {
        let NodeKind::Citation(citation) = tree.kind(id) else {
            continue;
        };
        for target in &citation.targets {
            let list = match target.kind {
                CitationKind::Normative => &mut normative,
                CitationKind::Informative | CitationKind::Suppressed => &mut informative,
            };
            if !list.contains(&target.anchor) {
                list.push(target.anchor.clone());
            }
        }
    }
    informative.retain(|anchor| !normative.contains(anchor));

    if normative.is_empty() && informative.is_empty() {
        return;
    }

    let (back, main, count) = {
        let children = tree.children(root);
        let matter_at = |matter: Matter| {
            children
                .iter()
                .position(|&child| tree.kind(child) == &NodeKind::DocumentMatter(matter))
        };
        (matter_at(Matter::Back), matter_at(Matter::Main), children.len())
    };
    let mut insert_at = match (back, main) {
        (Some(back), _) => back + 1,
        (None, Some(_)) => {
            tree.append(root, NodeKind::DocumentMatter(Matter::Back));
            count + 1
        }
        (None, None) => count,
    };

    tracing::debug!(
        normative = normative.len(),
        informative = informative.len(),
        "Collected citations"
    );

    for (kind, anchors) in [
        (BibliographyKind::Normative, normative),
        (BibliographyKind::Informative, informative),
    ] {
        if anchors.is_empty() {
            continue;
        }
        let section = tree.insert(root, insert_at, NodeKind::Bibliography(kind));
        insert_at += 1;
        for anchor in anchors {
            let reference = references.get(&anchor).cloned();
            tree.append(
                section,
                NodeKind::BibliographyItem(BibliographyItem { anchor, reference }),
            );
        }
    }
}
