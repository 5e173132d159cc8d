//! Markdown document tree consumed by the mdrfc renderers.
//!
//! The tree is an arena: a [`Tree`] owns every node and hands out plain
//! [`NodeId`] indices. Parent and sibling relations are answered by the tree
//! and never own anything, so nodes can be looked up from any position
//! without reference counting.
//!
//! [`walk`] drives a pre-order traversal. Container nodes are visited twice
//! (entering and exiting), leaf nodes once.
//!
//! # Example
//!
//! ```
//! use mdrfc_ast::{NodeKind, Tree, WalkStatus, walk};
//!
//! let mut tree = Tree::new();
//! let para = tree.append(tree.root(), NodeKind::Paragraph);
//! tree.append(para, NodeKind::text("hello"));
//!
//! let mut visits = 0;
//! walk(&tree, tree.root(), &mut |_, _| {
//!     visits += 1;
//!     Ok::<_, ()>(WalkStatus::GoToNext)
//! })
//! .unwrap();
//! // document enter/exit, paragraph enter/exit, text once
//! assert_eq!(visits, 5);
//! ```

mod kind;
mod title;
mod tree;
mod walk;

pub use kind::{
    Alignment, BibliographyItem, BibliographyKind, Citation, CitationKind, CitationTarget,
    CodeBlock, Heading, Index, Link, List, ListFlags, ListItem, Matter, NodeKind, TableCell,
};
pub use title::{Address, Author, Postal, TitleBlock, TitleDate};
pub use tree::{Node, NodeId, Tree};
pub use walk::{WalkStatus, walk};
