//! Caption extraction for figures and tables.
//!
//! xml2rfc v2 carries captions in a `title` attribute, so the caption subtree
//! of a [`NodeKind::CaptionFigure`] is rendered out of band as plain escaped
//! text. The caption node is then recorded as consumed and the dispatcher
//! skips it when the walk reaches it; the tree itself is never mutated.

use std::collections::{HashMap, HashSet};

use mdrfc_ast::{NodeId, NodeKind, Tree};

use crate::state::escape_xml;

#[derive(Debug, Default)]
pub(crate) struct CaptionRewriter {
    consumed: HashSet<NodeId>,
    table_titles: HashMap<NodeId, String>,
}

impl CaptionRewriter {
    /// Title attribute value for `figure`, taken from its first direct caption child.
    ///
    /// Returns `None` when the figure has no caption child.
    pub fn extract(&mut self, tree: &Tree, figure: NodeId) -> Option<String> {
        let caption = tree
            .children(figure)
            .iter()
            .copied()
            .find(|&child| matches!(tree.kind(child), NodeKind::Caption))?;
        self.consumed.insert(caption);
        Some(escape_xml(tree.text_content(caption).trim()))
    }

    /// Extract the caption of a table figure and hold it until the table is entered.
    pub fn hold_for_table(&mut self, tree: &Tree, figure: NodeId) {
        if let Some(title) = self.extract(tree, figure) {
            self.table_titles.insert(figure, title);
        }
    }

    pub fn take_table_title(&mut self, figure: NodeId) -> Option<String> {
        self.table_titles.remove(&figure)
    }

    pub fn is_consumed(&self, caption: NodeId) -> bool {
        self.consumed.contains(&caption)
    }

    pub fn reset(&mut self) {
        self.consumed.clear();
        self.table_titles.clear();
    }
}

/// Whether a caption figure wraps a table. Such figures emit no markup of their own.
pub(crate) fn holds_table(tree: &Tree, figure: NodeId) -> bool {
    tree.children(figure)
        .iter()
        .any(|&child| matches!(tree.kind(child), NodeKind::Table))
}

/// The caption figure directly containing `id`, if any.
pub(crate) fn parent_figure(tree: &Tree, id: NodeId) -> Option<NodeId> {
    tree.parent(id)
        .filter(|&parent| matches!(tree.kind(parent), NodeKind::CaptionFigure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdrfc_ast::CodeBlock;

    fn figure_with_caption(caption: &str) -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let figure = tree.append(tree.root(), NodeKind::CaptionFigure);
        tree.append(figure, NodeKind::CodeBlock(CodeBlock::default()));
        let node = tree.append(figure, NodeKind::Caption);
        tree.append(node, NodeKind::text(caption));
        (tree, figure, node)
    }

    #[test]
    fn test_extract_marks_consumed() {
        let (tree, figure, caption) = figure_with_caption(" A <b> & c ");
        let mut rewriter = CaptionRewriter::default();
        assert!(!rewriter.is_consumed(caption));

        let title = rewriter.extract(&tree, figure);
        assert_eq!(title.as_deref(), Some("A &lt;b&gt; &amp; c"));
        assert!(rewriter.is_consumed(caption));

        rewriter.reset();
        assert!(!rewriter.is_consumed(caption));
    }

    #[test]
    fn test_extract_without_caption() {
        let mut tree = Tree::new();
        let figure = tree.append(tree.root(), NodeKind::CaptionFigure);
        tree.append(figure, NodeKind::CodeBlock(CodeBlock::default()));
        let mut rewriter = CaptionRewriter::default();
        assert_eq!(rewriter.extract(&tree, figure), None);
    }

    #[test]
    fn test_nested_caption_is_not_extracted() {
        let mut tree = Tree::new();
        let figure = tree.append(tree.root(), NodeKind::CaptionFigure);
        let quote = tree.append(figure, NodeKind::BlockQuote);
        let caption = tree.append(quote, NodeKind::Caption);
        tree.append(caption, NodeKind::text("deep"));

        let mut rewriter = CaptionRewriter::default();
        assert_eq!(rewriter.extract(&tree, figure), None);
        assert!(!rewriter.is_consumed(caption));
    }

    #[test]
    fn test_table_title_is_held_until_taken() {
        let mut tree = Tree::new();
        let figure = tree.append(tree.root(), NodeKind::CaptionFigure);
        let caption = tree.append(figure, NodeKind::Caption);
        tree.append(caption, NodeKind::text("Results"));
        tree.append(figure, NodeKind::Table);

        let mut rewriter = CaptionRewriter::default();
        rewriter.hold_for_table(&tree, figure);
        assert!(rewriter.is_consumed(caption));
        assert_eq!(rewriter.take_table_title(figure).as_deref(), Some("Results"));
        assert_eq!(rewriter.take_table_title(figure), None);
    }

    #[test]
    fn test_holds_table_and_parent_figure() {
        let mut tree = Tree::new();
        let figure = tree.append(tree.root(), NodeKind::CaptionFigure);
        let table = tree.append(figure, NodeKind::Table);
        let loose = tree.append(tree.root(), NodeKind::Table);

        assert!(holds_table(&tree, figure));
        assert_eq!(parent_figure(&tree, table), Some(figure));
        assert_eq!(parent_figure(&tree, loose), None);
    }
}
