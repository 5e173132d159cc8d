//! Markdown (mmark dialect) to document tree adapter.
//!
//! [`parse`] runs pulldown-cmark over a document and builds an
//! [`mdrfc_ast::Tree`], then applies the mmark conventions that CommonMark
//! knows nothing about:
//!
//! - a leading `%%%` TOML title block becomes a `Title` node;
//! - `{frontmatter}`, `{mainmatter}` and `{backmatter}` paragraphs become
//!   document-matter markers;
//! - `.# Abstract` becomes a special heading;
//! - `Figure:` and `Table:` captions wrap the preceding block in a figure;
//! - `A> ` paragraphs become asides;
//! - `[@RFC2119]` citations, `(!item)` index entries and `<<1>>` callouts
//!   become their own nodes;
//! - cited anchors are collected into reference sections.
//!
//! # Example
//!
//! ```
//! use mdrfc_ast::NodeKind;
//! use mdrfc_markdown::{ParseOptions, parse};
//!
//! let tree = parse("# Introduction\n\nSee [@RFC2119].\n", &ParseOptions::default()).unwrap();
//! let kinds: Vec<_> = tree
//!     .children(tree.root())
//!     .iter()
//!     .map(|&id| tree.kind(id).name())
//!     .collect();
//! assert_eq!(kinds, ["heading", "paragraph", "bibliography"]);
//! ```

mod bibliography;
mod blocks;
mod builder;
mod citation;
mod error;
mod inline;
mod slug;
mod title;

use mdrfc_ast::{NodeKind, Tree};
use pulldown_cmark::{Options, Parser};

pub use error::ParseError;
pub use slug::slugify;

use crate::bibliography::append_bibliography;
use crate::blocks::rewrite_blocks;
use crate::builder::TreeBuilder;
use crate::citation::citation_link;
use crate::inline::split_inline_text;
use crate::slug::assign_heading_ids;
use crate::title::split_title_block;

/// Markdown parsing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Give headings without an explicit `{#id}` a slug anchor.
    pub auto_heading_ids: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            auto_heading_ids: true,
        }
    }
}

/// Parse an mmark document into a tree.
///
/// # Errors
///
/// Returns [`ParseError`] if the title block is not terminated or is not
/// valid TOML.
pub fn parse(markdown: &str, options: &ParseOptions) -> Result<Tree, ParseError> {
    let (title, body) = split_title_block(markdown)?;

    let mut builder = TreeBuilder::new();
    for event in Parser::new_with_broken_link_callback(body, parser_options(), Some(citation_link))
    {
        builder.push(event);
    }
    let (mut tree, references) = builder.finish();

    rewrite_blocks(&mut tree, title.is_some());
    split_inline_text(&mut tree);
    if options.auto_heading_ids {
        assign_heading_ids(&mut tree);
    }
    if let Some(title) = title {
        let root = tree.root();
        tree.insert(root, 0, NodeKind::Title(Box::new(title)));
    }
    append_bibliography(&mut tree, &references);

    tracing::debug!(nodes = tree.len(), "Parsed markdown");
    Ok(tree)
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_MATH
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_FOOTNOTES
}
