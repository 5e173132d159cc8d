//! Arena storage for document nodes.

use crate::kind::NodeKind;

/// Index of a node inside its [`Tree`].
///
/// Ids are only meaningful for the tree that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node: its variant, its children and a non-owning parent link.
#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Document tree. The root is always a [`NodeKind::Document`].
///
/// Detached nodes stay in the arena; they are simply unreachable from the root.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only the document root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Replace the variant of a node, keeping its position and children.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of `id` among its parent's children.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let pos = self.position(id)?;
        pos.checked_sub(1).map(|prev| self.children(parent)[prev])
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let pos = self.position(id)?;
        self.children(parent).get(pos + 1).copied()
    }

    /// Add a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Add a new node as child number `index` of `parent`.
    ///
    /// Indexes past the end append.
    pub fn insert(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind, Some(parent));
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Move an existing node (and its subtree) to the end of `parent`.
    pub fn move_to(&mut self, id: NodeId, parent: NodeId) {
        self.detach(id);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
    }

    /// Put a new node of `kind` in the place of `id` and move `id` under it.
    pub fn wrap(&mut self, id: NodeId, kind: NodeKind) -> NodeId {
        let parent = self.parent(id);
        let index = self.position(id).unwrap_or(0);
        let wrapper = match parent {
            Some(parent) => self.insert(parent, index, kind),
            None => self.alloc(kind, None),
        };
        self.move_to(id, wrapper);
        wrapper
    }

    /// Replace a node by its children in its parent's child list.
    pub fn unwrap_node(&mut self, id: NodeId) {
        let (Some(parent), Some(index)) = (self.parent(id), self.position(id)) else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[id.0].parent = None;
        let siblings = &mut self.nodes[parent.0].children;
        siblings.remove(index);
        for (offset, child) in children.into_iter().enumerate() {
            siblings.insert(index + offset, child);
        }
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Pre-order list of `id` and every node reachable below it.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    /// Plain text below `id`: text, code and math literals, breaks as spaces.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Text { literal }
                | NodeKind::Code { literal }
                | NodeKind::Math { literal } => text.push_str(literal),
                NodeKind::Softbreak | NodeKind::Hardbreak => text.push(' '),
                NodeKind::Callout { id } => text.push_str(id),
                _ => {}
            }
        }
        text
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph_with(tree: &mut Tree, words: &[&str]) -> NodeId {
        let para = tree.append(tree.root(), NodeKind::Paragraph);
        for word in words {
            tree.append(para, NodeKind::text(*word));
        }
        para
    }

    #[test]
    fn test_new_tree_has_document_root() {
        let tree = Tree::new();
        assert_eq!(tree.kind(tree.root()), &NodeKind::Document);
        assert_eq!(tree.len(), 1);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn test_siblings() {
        let mut tree = Tree::new();
        let para = paragraph_with(&mut tree, &["a", "b", "c"]);
        let [a, b, c] = [0, 1, 2].map(|i| tree.children(para)[i]);

        assert_eq!(tree.prev_sibling(a), None);
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(c), Some(b));
        assert_eq!(tree.next_sibling(c), None);
        assert_eq!(tree.first_child(para), Some(a));
        assert_eq!(tree.last_child(para), Some(c));
        assert_eq!(tree.parent(b), Some(para));
    }

    #[test]
    fn test_insert_and_detach() {
        let mut tree = Tree::new();
        let para = paragraph_with(&mut tree, &["a", "c"]);
        let b = tree.insert(para, 1, NodeKind::text("b"));
        assert_eq!(tree.text_content(para), "abc");

        tree.detach(b);
        assert_eq!(tree.text_content(para), "ac");
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_wrap_keeps_position() {
        let mut tree = Tree::new();
        let first = tree.append(tree.root(), NodeKind::Paragraph);
        let code = tree.append(tree.root(), NodeKind::CodeBlock(Default::default()));
        let last = tree.append(tree.root(), NodeKind::Paragraph);

        let figure = tree.wrap(code, NodeKind::CaptionFigure);
        assert_eq!(tree.children(tree.root()), &[first, figure, last]);
        assert_eq!(tree.children(figure), &[code]);
        assert_eq!(tree.parent(code), Some(figure));
    }

    #[test]
    fn test_unwrap_node() {
        let mut tree = Tree::new();
        let before = tree.append(tree.root(), NodeKind::Paragraph);
        let para = paragraph_with(&mut tree, &["x", "y"]);
        let [x, y] = [0, 1].map(|i| tree.children(para)[i]);

        tree.unwrap_node(para);
        assert_eq!(tree.children(tree.root()), &[before, x, y]);
        assert_eq!(tree.parent(x), Some(tree.root()));
        assert_eq!(tree.parent(para), None);
    }

    #[test]
    fn test_text_content_includes_code_and_breaks() {
        let mut tree = Tree::new();
        let para = tree.append(tree.root(), NodeKind::Paragraph);
        tree.append(para, NodeKind::text("Install"));
        tree.append(para, NodeKind::Softbreak);
        let emph = tree.append(para, NodeKind::Emph);
        tree.append(
            emph,
            NodeKind::Code {
                literal: "npm".to_owned(),
            },
        );
        assert_eq!(tree.text_content(para), "Install npm");
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut tree = Tree::new();
        let para = paragraph_with(&mut tree, &["a"]);
        let a = tree.children(para)[0];
        let second = tree.append(tree.root(), NodeKind::Paragraph);
        assert_eq!(tree.descendants(tree.root()), vec![tree.root(), para, a, second]);
    }
}
