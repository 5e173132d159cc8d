//! Block-level mmark conventions that CommonMark parses as plain paragraphs.
//!
//! - `{frontmatter}`, `{mainmatter}` and `{backmatter}` on their own become
//!   document-matter markers.
//! - `.# Title` becomes a special heading (abstract or note).
//! - `Figure: …` or `Table: …` right after a code block or table becomes
//!   the caption of a figure wrapping that block.
//! - A paragraph whose lines start with `A> ` becomes an aside.
//! - A paragraph holding only display math is replaced by the math block.

use mdrfc_ast::{Heading, Matter, NodeId, NodeKind, Tree};

const SPECIAL_HEADING: &str = ".# ";
const ASIDE: &str = "A> ";
const CAPTION_PREFIXES: [&str; 2] = ["Figure:", "Table:"];

/// Apply the block conventions to every paragraph of `tree`.
///
/// With a title block present the title already opens the front matter, so
/// an explicit `{frontmatter}` marker is dropped.
pub(crate) fn rewrite_blocks(tree: &mut Tree, has_title: bool) {
    let root = tree.root();
    let paragraphs: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|&id| matches!(tree.kind(id), NodeKind::Paragraph))
        .collect();

    for id in paragraphs {
        if tree.parent(id) == Some(root)
            && let Some(matter) = matter_marker(tree, id)
        {
            tree.clear_children(id);
            if has_title && matter == Matter::Front {
                tree.detach(id);
            } else {
                tree.set_kind(id, NodeKind::DocumentMatter(matter));
            }
            continue;
        }
        if tree.parent(id) == Some(root) && special_heading(tree, id) {
            continue;
        }
        if caption(tree, id) {
            continue;
        }
        if aside(tree, id) {
            continue;
        }
        display_math(tree, id);
    }
}

fn sole_text(tree: &Tree, id: NodeId) -> Option<&str> {
    match tree.children(id) {
        [only] => match tree.kind(*only) {
            NodeKind::Text { literal } => Some(literal),
            _ => None,
        },
        _ => None,
    }
}

fn first_text(tree: &Tree, id: NodeId) -> Option<(NodeId, &str)> {
    let first = tree.first_child(id)?;
    match tree.kind(first) {
        NodeKind::Text { literal } => Some((first, literal)),
        _ => None,
    }
}

fn matter_marker(tree: &Tree, id: NodeId) -> Option<Matter> {
    match sole_text(tree, id)?.trim() {
        "{frontmatter}" => Some(Matter::Front),
        "{mainmatter}" => Some(Matter::Main),
        "{backmatter}" => Some(Matter::Back),
        _ => None,
    }
}

/// Turn a single-line `.# Title` paragraph into a special heading.
fn special_heading(tree: &mut Tree, id: NodeId) -> bool {
    let Some((text, literal)) = first_text(tree, id) else {
        return false;
    };
    let Some(rest) = literal.strip_prefix(SPECIAL_HEADING) else {
        return false;
    };
    let is_single_line = tree
        .children(id)
        .iter()
        .all(|&child| !matches!(tree.kind(child), NodeKind::Softbreak | NodeKind::Hardbreak));
    if !is_single_line {
        return false;
    }

    let rest = rest.trim_start().to_owned();
    tree.set_kind(text, NodeKind::text(rest));
    let literal = tree.text_content(id).trim().to_owned();
    tree.set_kind(
        id,
        NodeKind::Heading(Heading {
            level: 1,
            id: None,
            literal,
            is_special: true,
        }),
    );
    true
}

/// Wrap the preceding code block or table and this caption paragraph in a figure.
fn caption(tree: &mut Tree, id: NodeId) -> bool {
    let Some(previous) = tree.prev_sibling(id) else {
        return false;
    };
    if !matches!(
        tree.kind(previous),
        NodeKind::CodeBlock(_) | NodeKind::MathBlock { .. } | NodeKind::Table
    ) {
        return false;
    }
    let Some((text, literal)) = first_text(tree, id) else {
        return false;
    };
    let Some(rest) = CAPTION_PREFIXES
        .iter()
        .find_map(|prefix| literal.strip_prefix(*prefix))
    else {
        return false;
    };

    let rest = rest.trim_start().to_owned();
    if rest.is_empty() {
        tree.detach(text);
    } else {
        tree.set_kind(text, NodeKind::text(rest));
    }

    let figure = tree.wrap(previous, NodeKind::CaptionFigure);
    tree.set_kind(id, NodeKind::Caption);
    tree.move_to(id, figure);
    true
}

/// Wrap an `A> ` paragraph in an aside, stripping the marker from every line.
fn aside(tree: &mut Tree, id: NodeId) -> bool {
    let Some((text, literal)) = first_text(tree, id) else {
        return false;
    };
    let Some(rest) = literal.strip_prefix(ASIDE) else {
        return false;
    };
    let rest = rest.to_owned();
    tree.set_kind(text, NodeKind::text(rest));

    let children = tree.children(id).to_vec();
    for pair in children.windows(2) {
        let [previous, line] = [pair[0], pair[1]];
        if matches!(tree.kind(previous), NodeKind::Softbreak)
            && let NodeKind::Text { literal } = tree.kind(line)
            && let Some(rest) = literal.strip_prefix(ASIDE)
        {
            let rest = rest.to_owned();
            tree.set_kind(line, NodeKind::text(rest));
        }
    }

    tree.wrap(id, NodeKind::Aside);
    true
}

/// Lift display math out of its paragraph, or demote it to inline math when mixed with text.
fn display_math(tree: &mut Tree, id: NodeId) {
    let children = tree.children(id).to_vec();
    if !children
        .iter()
        .any(|&child| matches!(tree.kind(child), NodeKind::MathBlock { .. }))
    {
        return;
    }

    let only_math = children.iter().all(|&child| match tree.kind(child) {
        NodeKind::MathBlock { .. } | NodeKind::Softbreak => true,
        NodeKind::Text { literal } => literal.trim().is_empty(),
        _ => false,
    });

    if only_math {
        for &child in &children {
            if !matches!(tree.kind(child), NodeKind::MathBlock { .. }) {
                tree.detach(child);
            }
        }
        tree.unwrap_node(id);
        return;
    }

    for child in children {
        if let NodeKind::MathBlock { literal } = tree.kind(child) {
            let literal = literal.clone();
            tree.set_kind(child, NodeKind::Math { literal });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdrfc_ast::CodeBlock;
    use pretty_assertions::assert_eq;

    fn paragraph(tree: &mut Tree, text: &str) -> NodeId {
        let root = tree.root();
        let para = tree.append(root, NodeKind::Paragraph);
        tree.append(para, NodeKind::text(text));
        para
    }

    fn names(tree: &Tree, id: NodeId) -> Vec<&str> {
        tree.children(id)
            .iter()
            .map(|&child| tree.kind(child).name())
            .collect()
    }

    #[test]
    fn test_matter_markers() {
        let mut tree = Tree::new();
        let front = paragraph(&mut tree, "{frontmatter}");
        let main = paragraph(&mut tree, "{mainmatter}");
        let back = paragraph(&mut tree, " {backmatter} ");
        let text = paragraph(&mut tree, "{other}");

        rewrite_blocks(&mut tree, false);

        assert_eq!(tree.kind(front), &NodeKind::DocumentMatter(Matter::Front));
        assert_eq!(tree.kind(main), &NodeKind::DocumentMatter(Matter::Main));
        assert_eq!(tree.kind(back), &NodeKind::DocumentMatter(Matter::Back));
        assert!(tree.children(main).is_empty());
        assert_eq!(tree.kind(text), &NodeKind::Paragraph);
    }

    #[test]
    fn test_frontmatter_dropped_with_title() {
        let mut tree = Tree::new();
        paragraph(&mut tree, "{frontmatter}");
        paragraph(&mut tree, "{mainmatter}");

        rewrite_blocks(&mut tree, true);

        assert_eq!(names(&tree, tree.root()), vec!["document-matter"]);
    }

    #[test]
    fn test_special_heading() {
        let mut tree = Tree::new();
        let para = paragraph(&mut tree, ".# Abstract");

        rewrite_blocks(&mut tree, false);

        assert_eq!(
            tree.kind(para),
            &NodeKind::Heading(Heading {
                level: 1,
                id: None,
                literal: "Abstract".to_owned(),
                is_special: true,
            })
        );
        assert_eq!(tree.text_content(para), "Abstract");
    }

    #[test]
    fn test_multi_line_special_heading_is_paragraph() {
        let mut tree = Tree::new();
        let para = paragraph(&mut tree, ".# Abstract");
        tree.append(para, NodeKind::Softbreak);
        tree.append(para, NodeKind::text("more"));

        rewrite_blocks(&mut tree, false);

        assert_eq!(tree.kind(para), &NodeKind::Paragraph);
    }

    #[test]
    fn test_code_block_caption() {
        let mut tree = Tree::new();
        let root = tree.root();
        let code = tree.append(root, NodeKind::CodeBlock(CodeBlock::default()));
        let para = paragraph(&mut tree, "Figure: An example");

        rewrite_blocks(&mut tree, false);

        assert_eq!(names(&tree, root), vec!["caption-figure"]);
        let figure = tree.children(root)[0];
        assert_eq!(tree.children(figure), &[code, para]);
        assert_eq!(tree.kind(para), &NodeKind::Caption);
        assert_eq!(tree.text_content(para), "An example");
    }

    #[test]
    fn test_caption_needs_preceding_block() {
        let mut tree = Tree::new();
        let para = paragraph(&mut tree, "Table: orphan");

        rewrite_blocks(&mut tree, false);

        assert_eq!(tree.kind(para), &NodeKind::Paragraph);
    }

    #[test]
    fn test_aside_strips_every_line() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = paragraph(&mut tree, "A> first");
        tree.append(para, NodeKind::Softbreak);
        tree.append(para, NodeKind::text("A> second"));

        rewrite_blocks(&mut tree, false);

        assert_eq!(names(&tree, root), vec!["aside"]);
        assert_eq!(tree.text_content(para), "first second");
    }

    #[test]
    fn test_display_math_only() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.append(root, NodeKind::Paragraph);
        let math = tree.append(
            para,
            NodeKind::MathBlock {
                literal: "x^2".to_owned(),
            },
        );

        rewrite_blocks(&mut tree, false);

        assert_eq!(tree.children(root), &[math]);
    }

    #[test]
    fn test_display_math_mixed_with_text() {
        let mut tree = Tree::new();
        let para = paragraph(&mut tree, "where ");
        let math = tree.append(
            para,
            NodeKind::MathBlock {
                literal: "x".to_owned(),
            },
        );

        rewrite_blocks(&mut tree, false);

        assert_eq!(
            tree.kind(math),
            &NodeKind::Math {
                literal: "x".to_owned()
            }
        );
    }
}
