//! Automatic heading anchors.

use mdrfc_ast::{NodeKind, Tree};

/// Convert heading text to an anchor.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, dashes and
/// underscores into a single dash and drops everything else. xml2rfc anchors
/// may not start with a digit, so such slugs get a `section-` prefix.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert_str(0, "section-");
    }
    result
}

/// Give every regular heading without an explicit `{#id}` a slug anchor.
pub(crate) fn assign_heading_ids(tree: &mut Tree) {
    for id in tree.descendants(tree.root()) {
        let NodeKind::Heading(heading) = tree.kind(id) else {
            continue;
        };
        if heading.is_special || heading.id.is_some() {
            continue;
        }
        let slug = slugify(&tree.text_content(id));
        if slug.is_empty() {
            continue;
        }
        if let NodeKind::Heading(heading) = tree.kind_mut(id) {
            heading.id = Some(slug);
        }
    }
}
