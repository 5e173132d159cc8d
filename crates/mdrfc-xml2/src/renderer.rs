//! Stateful xml2rfc v2 renderer.
//!
//! [`Xml2Renderer`] is driven by [`mdrfc_ast::walk`]: every enter and exit
//! visit lands in [`Xml2Renderer::render_node`], which writes the fragment for
//! that node and keeps the section, matter and anchor state in sync.
//!
//! # Example
//!
//! ```
//! use mdrfc_ast::{Heading, Matter, NodeKind, Tree};
//! use mdrfc_xml2::{RendererOptions, Xml2Renderer};
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! tree.append(root, NodeKind::DocumentMatter(Matter::Main));
//! let heading = tree.append(
//!     root,
//!     NodeKind::Heading(Heading {
//!         level: 1,
//!         id: Some("intro".to_owned()),
//!         ..Heading::default()
//!     }),
//! );
//! tree.append(heading, NodeKind::text("Introduction"));
//!
//! let options = RendererOptions {
//!     fragment: true,
//!     ..RendererOptions::default()
//! };
//! let result = Xml2Renderer::new(options).render(&tree).unwrap();
//! assert!(result.xml.contains(r#"<section anchor="intro" title="Introduction">"#));
//! assert_eq!(result.anchors, vec!["intro"]);
//! ```

use std::fmt::Write;

use mdrfc_ast::{
    BibliographyItem, CitationKind, CodeBlock, Heading, Index, Link, List, ListItem, Matter,
    NodeId, NodeKind, TableCell, TitleBlock, Tree, WalkStatus, walk,
};

use crate::callout::{escape_callouts, write_callout};
use crate::caption::{CaptionRewriter, holds_table, parent_figure};
use crate::error::RenderError;
use crate::options::{NodeHook, RendererOptions};
use crate::state::{
    HeadingIds, MatterState, SectionKind, SectionState, cr, is_abstract, is_bcp14, push_attr,
    push_escaped,
};
use crate::title::{write_bibliography_item, write_front, write_rfc_open};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const GENERATOR: &str = r#"<!-- name="GENERATOR" content="mdrfc markdown processor" -->"#;
const DOCTYPE: &str = "<!DOCTYPE rfc SYSTEM 'rfc2629.dtd' []>";

/// Result of rendering one document tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered XML.
    pub xml: String,
    /// Document title from the title block, if the tree has one.
    pub title: Option<String>,
    /// Section anchors in document order, after collision resolution.
    pub anchors: Vec<String>,
    /// Recoverable problems found while rendering.
    pub warnings: Vec<String>,
}

/// xml2rfc v2 renderer.
///
/// One renderer can render any number of trees; all per-document state is
/// reset at the start of [`render`](Self::render).
pub struct Xml2Renderer {
    opts: RendererOptions,
    hook: Option<Box<dyn NodeHook>>,
    matter: MatterState,
    section: SectionState,
    heading_ids: HeadingIds,
    captions: CaptionRewriter,
    title: Option<String>,
    anchors: Vec<String>,
    warnings: Vec<String>,
}

impl Xml2Renderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(opts: RendererOptions) -> Self {
        Self {
            opts,
            hook: None,
            matter: MatterState::default(),
            section: SectionState::default(),
            heading_ids: HeadingIds::new(),
            captions: CaptionRewriter::default(),
            title: None,
            anchors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Install a hook that runs before the default handling of every node.
    #[must_use]
    pub fn with_hook(mut self, hook: impl NodeHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn options(&self) -> &RendererOptions {
        &self.opts
    }

    /// Render a whole document tree.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownNode`] when the tree contains a node the
    /// renderer (and the hook, if any) cannot handle. Output produced before
    /// the failure is discarded.
    pub fn render(&mut self, tree: &Tree) -> Result<RenderResult, RenderError> {
        self.reset();

        let mut out = String::new();
        self.render_header(&mut out);
        walk(tree, tree.root(), &mut |id, entering| {
            self.render_node(tree, id, entering, &mut out)
        })?;
        self.render_footer(&mut out);

        tracing::debug!(
            bytes = out.len(),
            anchors = self.anchors.len(),
            warnings = self.warnings.len(),
            "Rendered document"
        );

        Ok(RenderResult {
            xml: out,
            title: self.title.take(),
            anchors: std::mem::take(&mut self.anchors),
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    /// Write the XML declaration, generator comment and DOCTYPE.
    ///
    /// Writes nothing in fragment mode.
    pub fn render_header(&mut self, out: &mut String) {
        if self.opts.fragment {
            return;
        }
        for line in [XML_DECLARATION, GENERATOR, DOCTYPE] {
            out.push_str(line);
            cr(out);
        }
    }

    /// Close the open section, the open matter region and the root element.
    pub fn render_footer(&mut self, out: &mut String) {
        self.section.close(out);
        self.matter.finish(out);
        if self.title.is_some() && !self.opts.fragment {
            cr(out);
            out.push_str("</rfc>");
            cr(out);
        }
    }

    /// Render one visit of one node.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownNode`] for [`NodeKind::Extension`] nodes
    /// the hook did not handle.
    #[allow(clippy::too_many_lines)]
    pub fn render_node(
        &mut self,
        tree: &Tree,
        id: NodeId,
        entering: bool,
        out: &mut String,
    ) -> Result<WalkStatus, RenderError> {
        if let Some(hook) = self.hook.as_mut()
            && let Some(status) = hook.render_node(tree, id, entering, out)
        {
            return Ok(status);
        }

        let status = match tree.kind(id) {
            NodeKind::Document
            | NodeKind::TableHeader
            | NodeKind::TableBody
            | NodeKind::TableFooter
            | NodeKind::TableRow
            | NodeKind::HtmlBlock { .. } => WalkStatus::GoToNext,
            NodeKind::DocumentMatter(matter) => {
                self.section.close(out);
                self.matter.enter(*matter, out);
                WalkStatus::GoToNext
            }
            NodeKind::Title(block) => {
                self.title_block(block, out);
                WalkStatus::GoToNext
            }
            NodeKind::Heading(heading) => self.heading(tree, id, heading, entering, out),
            NodeKind::Paragraph => {
                paragraph(tree, id, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::List(list) => {
                self::list(tree, id, list, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::ListItem(item) => {
                list_item(item, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::CodeBlock(block) => {
                self.code_block(tree, id, block, out);
                WalkStatus::GoToNext
            }
            NodeKind::MathBlock { literal } => {
                out.push_str("<artwork type=\"math\">\n");
                self.escape_literal(literal, out);
                out.push_str("</artwork>");
                cr(out);
                WalkStatus::GoToNext
            }
            NodeKind::Table => {
                self.table(tree, id, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::TableCell(cell) => {
                table_cell(tree, id, cell, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::CaptionFigure => {
                self.caption_figure(tree, id, entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::Caption => self.caption(id, entering, out),
            NodeKind::BlockQuote => {
                block_tag("blockquote", entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::Aside => {
                block_tag("aside", entering, out);
                WalkStatus::GoToNext
            }
            NodeKind::HtmlSpan { literal } => {
                if !self.opts.skip_html {
                    out.push_str(literal);
                }
                WalkStatus::GoToNext
            }
            NodeKind::Text { literal } => {
                push_escaped(literal, out);
                WalkStatus::GoToNext
            }
            NodeKind::Softbreak => {
                out.push('\n');
                WalkStatus::GoToNext
            }
            NodeKind::Hardbreak => {
                out.push_str("<vspace />");
                cr(out);
                WalkStatus::GoToNext
            }
            NodeKind::Emph => {
                out.push_str(if entering {
                    r#"<spanx style="emph">"#
                } else {
                    "</spanx>"
                });
                WalkStatus::GoToNext
            }
            NodeKind::Strong => {
                if !first_child_is_bcp14(tree, id) {
                    out.push_str(if entering {
                        r#"<spanx style="strong">"#
                    } else {
                        "</spanx>"
                    });
                }
                WalkStatus::GoToNext
            }
            NodeKind::Del => {
                out.push_str(if entering { "<del>" } else { "</del>" });
                WalkStatus::GoToNext
            }
            NodeKind::Code { literal } | NodeKind::Math { literal } => {
                out.push_str(r#"<spanx style="verb">"#);
                push_escaped(literal, out);
                out.push_str("</spanx>");
                WalkStatus::GoToNext
            }
            NodeKind::Link(link) => {
                if entering {
                    out.push_str("<eref");
                    push_attr(out, "target", &link.destination);
                    out.push('>');
                } else {
                    out.push_str("</eref>");
                }
                WalkStatus::GoToNext
            }
            NodeKind::Image(image) => self.image(image, entering, out),
            NodeKind::CrossReference { destination } => {
                if entering {
                    out.push_str("<xref");
                    push_attr(out, "target", destination);
                    out.push('>');
                } else {
                    out.push_str("</xref>");
                }
                WalkStatus::GoToNext
            }
            NodeKind::Citation(citation) => {
                for target in citation.targets.iter().filter(|t| t.kind != CitationKind::Suppressed) {
                    out.push_str("<xref");
                    push_attr(out, "target", &target.anchor);
                    out.push_str("></xref>");
                }
                WalkStatus::GoToNext
            }
            NodeKind::Index(index) => {
                write_index(index, out);
                WalkStatus::GoToNext
            }
            NodeKind::Callout { id: callout } => {
                write_callout(callout, out);
                WalkStatus::GoToNext
            }
            NodeKind::Bibliography(kind) => {
                if entering {
                    cr(out);
                    out.push_str("<references");
                    push_attr(out, "title", kind.title());
                    out.push('>');
                } else {
                    cr(out);
                    out.push_str("</references>");
                }
                cr(out);
                WalkStatus::GoToNext
            }
            NodeKind::BibliographyItem(item) => {
                self.bibliography_item(item, out);
                WalkStatus::GoToNext
            }
            NodeKind::Extension { name } => {
                return Err(RenderError::UnknownNode {
                    name: name.clone(),
                    node: id,
                });
            }
        };
        Ok(status)
    }

    fn reset(&mut self) {
        self.matter = MatterState::default();
        self.section = SectionState::default();
        self.heading_ids = HeadingIds::new();
        self.captions.reset();
        self.title = None;
        self.anchors.clear();
        self.warnings.clear();

        if self.opts.callout.is_none() && !self.opts.comments.is_empty() {
            self.warn(
                "comment markers are configured without a callout prefix; callouts are not detected"
                    .to_owned(),
            );
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!(%message, "Render warning");
        self.warnings.push(message);
    }

    fn title_block(&mut self, block: &TitleBlock, out: &mut String) {
        if !self.opts.fragment {
            write_rfc_open(block, out);
        }
        if self.matter.current().is_none() {
            self.matter.enter(Matter::Front, out);
        }
        write_front(block, out);
        self.title = Some(block.title.clone());
    }

    fn heading(
        &mut self,
        tree: &Tree,
        id: NodeId,
        heading: &Heading,
        entering: bool,
        out: &mut String,
    ) -> WalkStatus {
        if !entering {
            cr(out);
            return WalkStatus::GoToNext;
        }

        if let Some(open) = self.section.current() {
            tracing::trace!(from = open.level, to = heading.level, "Closing section");
        }
        self.section.close(out);
        cr(out);

        let mut title = tree.text_content(id);
        if title.trim().is_empty() {
            title.clone_from(&heading.literal);
        }
        let title = title.trim();

        let kind = if !heading.is_special {
            SectionKind::Section
        } else if is_abstract(title) || is_abstract(&heading.literal) {
            SectionKind::Abstract
        } else {
            SectionKind::Note
        };

        match kind {
            SectionKind::Abstract => out.push_str("<abstract>"),
            SectionKind::Note | SectionKind::Section => {
                out.push_str(if kind == SectionKind::Note {
                    "<note"
                } else {
                    "<section"
                });
                if let Some(candidate) = heading.id.as_deref().filter(|id| !id.is_empty()) {
                    let anchor = self.heading_ids.allocate(candidate);
                    push_attr(out, "anchor", &anchor);
                    self.anchors.push(anchor);
                }
                push_attr(out, "title", title);
                out.push('>');
            }
        }
        self.section.open(kind, heading.level);

        WalkStatus::SkipChildren
    }

    fn code_block(&mut self, tree: &Tree, id: NodeId, block: &CodeBlock, out: &mut String) {
        let in_figure = parent_figure(tree, id).is_some();

        cr(out);
        out.push_str(if in_figure { "<artwork" } else { "<figure><artwork" });
        if let Some(language) = block.language() {
            push_attr(out, "type", language);
        }
        out.push('>');
        self.escape_literal(&block.literal, out);
        out.push_str(if in_figure {
            "</artwork>"
        } else {
            "</artwork></figure>"
        });
        cr(out);
    }

    fn escape_literal(&self, literal: &str, out: &mut String) {
        escape_callouts(
            literal,
            &self.opts.comments,
            self.opts.callout.as_deref(),
            out,
        );
    }

    fn caption_figure(&mut self, tree: &Tree, id: NodeId, entering: bool, out: &mut String) {
        // xml2rfc v2 has no figure around tables; the table carries the caption.
        if holds_table(tree, id) {
            if entering {
                self.captions.hold_for_table(tree, id);
            }
            return;
        }

        if !entering {
            cr(out);
            out.push_str("</figure>");
            cr(out);
            return;
        }

        cr(out);
        out.push_str("<figure");
        if let Some(title) = self.captions.extract(tree, id) {
            write!(out, r#" title="{title}""#).unwrap();
        }
        out.push('>');
    }

    fn table(&mut self, tree: &Tree, id: NodeId, entering: bool, out: &mut String) {
        cr(out);
        if !entering {
            out.push_str("</texttable>");
            cr(out);
            return;
        }

        out.push_str("<texttable");
        if let Some(figure) = parent_figure(tree, id)
            && let Some(title) = self.captions.take_table_title(figure)
        {
            write!(out, r#" title="{title}""#).unwrap();
        }
        out.push('>');
    }

    fn caption(&mut self, id: NodeId, entering: bool, out: &mut String) -> WalkStatus {
        if self.captions.is_consumed(id) {
            return WalkStatus::SkipChildren;
        }

        if entering {
            self.warn(format!(
                "caption node {} is not inside a figure; rendered as a paragraph",
                id.index()
            ));
            cr(out);
            out.push_str("<t>");
        } else {
            out.push_str("</t>");
            cr(out);
        }
        WalkStatus::GoToNext
    }

    fn image(&self, image: &Link, entering: bool, out: &mut String) -> WalkStatus {
        if self.opts.skip_images {
            return WalkStatus::SkipChildren;
        }

        if entering {
            out.push_str("<img");
            push_attr(out, "src", &image.destination);
            out.push_str(r#" alt=""#);
        } else {
            if !image.title.is_empty() {
                out.push_str(r#"" name=""#);
                push_escaped(&image.title, out);
            }
            out.push_str(r#"" />"#);
        }
        WalkStatus::GoToNext
    }

    fn bibliography_item(&mut self, item: &BibliographyItem, out: &mut String) {
        if !write_bibliography_item(item, out) {
            self.warn(format!(
                "reference `{}` has no XML and is neither an RFC nor an Internet-Draft",
                item.anchor
            ));
        }
    }
}

impl std::fmt::Debug for Xml2Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Xml2Renderer")
            .field("opts", &self.opts)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

fn paragraph(tree: &Tree, id: NodeId, entering: bool, out: &mut String) {
    let in_item = tree
        .parent(id)
        .is_some_and(|parent| matches!(tree.kind(parent), NodeKind::ListItem(_)));

    if in_item {
        // No <t> inside list items; later paragraphs are separated by a line break.
        if entering && tree.prev_sibling(id).is_some() {
            out.push_str("<vspace />");
            cr(out);
        }
        return;
    }

    if entering {
        cr(out);
        out.push_str("<t>");
    } else {
        out.push_str("</t>");
        cr(out);
    }
}

fn list(tree: &Tree, id: NodeId, list: &List, entering: bool, out: &mut String) {
    let in_item = tree
        .parent(id)
        .is_some_and(|parent| matches!(tree.kind(parent), NodeKind::ListItem(_)));

    if entering {
        cr(out);
        if !in_item {
            out.push_str("<t>");
            cr(out);
        }

        let style = if list.flags.definition {
            "hanging"
        } else if list.flags.ordered {
            "numbers"
        } else {
            "symbols"
        };
        out.push_str("<list");
        push_attr(out, "style", style);
        if list.flags.ordered && !list.flags.definition && list.start > 1 {
            write!(out, r#" start="{}""#, list.start).unwrap();
        }
        out.push('>');
        cr(out);
        return;
    }

    out.push_str("</list>");
    if !in_item || tree.next_sibling(id).is_some() {
        cr(out);
    }
    if !in_item {
        out.push_str("</t>");
        cr(out);
    }
}

fn list_item(item: &ListItem, entering: bool, out: &mut String) {
    if entering {
        out.push_str(if item.flags.term {
            r#"<t hangText=""#
        } else if item.flags.definition {
            "<vspace />"
        } else {
            "<t>"
        });
    } else {
        out.push_str(if item.flags.term { r#"">"# } else { "</t>" });
        cr(out);
    }
}

fn table_cell(tree: &Tree, id: NodeId, cell: &TableCell, entering: bool, out: &mut String) {
    if !entering {
        out.push_str(if cell.is_header { "</ttcol>" } else { "</c>" });
        cr(out);
        return;
    }

    if tree.prev_sibling(id).is_none() {
        cr(out);
    }
    if cell.is_header {
        out.push_str("<ttcol");
        if let Some(align) = cell.align.as_str() {
            push_attr(out, "align", align);
        }
        out.push('>');
    } else {
        out.push_str("<c>");
    }
}

fn block_tag(name: &str, entering: bool, out: &mut String) {
    cr(out);
    if entering {
        write!(out, "<{name}>").unwrap();
    } else {
        write!(out, "</{name}>").unwrap();
    }
    cr(out);
}

fn write_index(index: &Index, out: &mut String) {
    out.push_str("<iref");
    push_attr(out, "item", &index.item);
    if index.primary {
        out.push_str(r#" primary="true""#);
    }
    if let Some(subitem) = index.subitem.as_deref().filter(|s| !s.is_empty()) {
        push_attr(out, "subitem", subitem);
    }
    out.push_str("></iref>");
}

/// `**MUST**` is written as plain text: xml2rfc v2 has no BCP 14 markup.
fn first_child_is_bcp14(tree: &Tree, id: NodeId) -> bool {
    tree.first_child(id)
        .is_some_and(|child| matches!(tree.kind(child), NodeKind::Text { literal } if is_bcp14(literal)))
}
