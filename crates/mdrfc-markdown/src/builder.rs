//! Tree construction from pulldown-cmark events.

use std::collections::HashMap;

use mdrfc_ast::{
    Alignment, CodeBlock, Heading, Link, List, ListFlags, ListItem, NodeId, NodeKind, TableCell,
    Tree,
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};

use crate::bibliography::reference_elements;
use crate::citation::parse_citation;

/// Builds a [`Tree`] from a stream of parser events.
pub(crate) struct TreeBuilder {
    tree: Tree,
    stack: Vec<NodeId>,
    /// Nesting depth inside a construct that is represented by a single extension node.
    skip_depth: usize,
    code: Option<CodeBlock>,
    html: Option<String>,
    in_citation: bool,
    alignments: Vec<pulldown_cmark::Alignment>,
    references: HashMap<String, String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let tree = Tree::new();
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
            skip_depth: 0,
            code: None,
            html: None,
            in_citation: false,
            alignments: Vec::new(),
            references: HashMap::new(),
        }
    }

    /// The finished tree and the raw `<reference>` XML found in HTML blocks.
    pub fn finish(self) -> (Tree, HashMap<String, String>) {
        (self.tree, self.references)
    }

    pub fn push(&mut self, event: Event<'_>) {
        if self.skip_depth > 0 {
            match event {
                Event::Start(_) => self.skip_depth += 1,
                Event::End(_) => self.skip_depth -= 1,
                _ => {}
            }
            return;
        }

        if self.in_citation {
            if matches!(event, Event::End(TagEnd::Link)) {
                self.in_citation = false;
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.leaf(NodeKind::Code {
                literal: code.into_string(),
            }),
            Event::InlineMath(math) => self.leaf(NodeKind::Math {
                literal: math.into_string(),
            }),
            Event::DisplayMath(math) => self.leaf(NodeKind::MathBlock {
                literal: math.into_string(),
            }),
            Event::Html(html) => {
                if let Some(buffer) = &mut self.html {
                    buffer.push_str(&html);
                } else {
                    self.leaf(NodeKind::HtmlBlock {
                        literal: html.into_string(),
                    });
                }
            }
            Event::InlineHtml(html) => self.leaf(NodeKind::HtmlSpan {
                literal: html.into_string(),
            }),
            Event::SoftBreak => self.leaf(NodeKind::Softbreak),
            Event::HardBreak => self.leaf(NodeKind::Hardbreak),
            Event::Rule => self.extension("horizontal-rule"),
            Event::FootnoteReference(_) => self.extension("footnote-reference"),
            Event::TaskListMarker(_) => self.extension("task-list-marker"),
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn open(&mut self, kind: NodeKind) {
        let id = self.tree.append(self.current(), kind);
        self.stack.push(id);
    }

    fn close(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.tree.append(self.current(), kind);
    }

    /// Represent an unsupported construct by a single extension node.
    fn extension(&mut self, name: &str) {
        tracing::debug!(construct = name, "Unsupported markdown construct");
        self.leaf(NodeKind::Extension {
            name: name.to_owned(),
        });
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.literal.push_str(text);
            return;
        }
        if let Some(buffer) = &mut self.html {
            buffer.push_str(text);
            return;
        }

        // The parser splits text at every potential delimiter; inline
        // extensions are matched on whole runs.
        let parent = self.current();
        if let Some(last) = self.tree.last_child(parent)
            && let NodeKind::Text { literal } = self.tree.kind_mut(last)
        {
            literal.push_str(text);
            return;
        }
        self.leaf(NodeKind::text(text));
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(NodeKind::Paragraph),
            Tag::Heading { level, id, .. } => self.open(NodeKind::Heading(Heading {
                level: heading_level(level),
                id: id.map(CowStr::into_string),
                literal: String::new(),
                is_special: false,
            })),
            Tag::BlockQuote(_) => self.open(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock {
                    literal: String::new(),
                    info,
                });
            }
            Tag::HtmlBlock => self.html = Some(String::new()),
            Tag::List(start) => self.open(NodeKind::List(List {
                flags: ListFlags {
                    ordered: start.is_some(),
                    ..ListFlags::default()
                },
                start: start.unwrap_or_default(),
                is_footnotes: false,
            })),
            Tag::Item => {
                let flags = match self.tree.kind(self.current()) {
                    NodeKind::List(list) => list.flags,
                    _ => ListFlags::default(),
                };
                self.open(NodeKind::ListItem(ListItem { flags }));
            }
            Tag::DefinitionList => self.open(NodeKind::List(List {
                flags: ListFlags {
                    definition: true,
                    ..ListFlags::default()
                },
                ..List::default()
            })),
            Tag::DefinitionListTitle => self.open(NodeKind::ListItem(ListItem {
                flags: ListFlags {
                    definition: true,
                    term: true,
                    ..ListFlags::default()
                },
            })),
            Tag::DefinitionListDefinition => self.open(NodeKind::ListItem(ListItem {
                flags: ListFlags {
                    definition: true,
                    ..ListFlags::default()
                },
            })),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.open(NodeKind::Table);
            }
            Tag::TableHead => {
                self.open(NodeKind::TableHeader);
                self.open(NodeKind::TableRow);
            }
            Tag::TableRow => {
                if matches!(self.tree.kind(self.current()), NodeKind::Table) {
                    self.open(NodeKind::TableBody);
                }
                self.open(NodeKind::TableRow);
            }
            Tag::TableCell => {
                let row = self.current();
                let is_header = self
                    .tree
                    .parent(row)
                    .is_some_and(|section| matches!(self.tree.kind(section), NodeKind::TableHeader));
                let column = self.tree.children(row).len();
                let align = self
                    .alignments
                    .get(column)
                    .map_or(Alignment::None, |&align| convert_alignment(align));
                self.open(NodeKind::TableCell(TableCell { is_header, align }));
            }
            Tag::Emphasis => self.open(NodeKind::Emph),
            Tag::Strong => self.open(NodeKind::Strong),
            Tag::Strikethrough => self.open(NodeKind::Del),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                if is_unresolved(link_type)
                    && let Some(citation) = parse_citation(&dest_url)
                {
                    self.leaf(NodeKind::Citation(citation));
                    self.in_citation = true;
                } else if let Some(anchor) = dest_url.strip_prefix('#') {
                    self.open(NodeKind::CrossReference {
                        destination: anchor.to_owned(),
                    });
                } else {
                    self.open(NodeKind::Link(Link {
                        destination: dest_url.into_string(),
                        title: title.into_string(),
                    }));
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => self.open(NodeKind::Image(Link {
                destination: dest_url.into_string(),
                title: title.into_string(),
            })),
            Tag::FootnoteDefinition(_) => self.skip("footnote-definition"),
            Tag::Superscript => self.skip("superscript"),
            Tag::Subscript => self.skip("subscript"),
            Tag::MetadataBlock(_) => self.skip("metadata-block"),
        }
    }

    /// Emit an extension node and drop everything until the matching end tag.
    fn skip(&mut self, name: &str) {
        self.extension(name);
        self.skip_depth = 1;
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.leaf(NodeKind::CodeBlock(code));
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(html) = self.html.take() {
                    for (anchor, xml) in reference_elements(&html) {
                        tracing::debug!(%anchor, "Found reference XML");
                        self.references.insert(anchor, xml);
                    }
                    self.leaf(NodeKind::HtmlBlock { literal: html });
                }
            }
            TagEnd::TableHead => {
                self.close();
                self.close();
            }
            TagEnd::Table => {
                if matches!(self.tree.kind(self.current()), NodeKind::TableBody) {
                    self.close();
                }
                self.close();
            }
            TagEnd::Heading(_) => {
                let heading = self.current();
                let text = self.tree.text_content(heading);
                if let NodeKind::Heading(heading) = self.tree.kind_mut(heading) {
                    heading.literal = text.trim().to_owned();
                }
                self.close();
            }
            _ => self.close(),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn convert_alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

/// Links produced by the broken-link callback.
fn is_unresolved(link_type: LinkType) -> bool {
    matches!(
        link_type,
        LinkType::ShortcutUnknown | LinkType::CollapsedUnknown | LinkType::ReferenceUnknown
    )
}
