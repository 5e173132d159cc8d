//! Node variants and their payloads.

use crate::title::TitleBlock;

/// Document-matter region of an RFC document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Matter {
    /// Metadata, abstract and notes.
    Front,
    /// Document body.
    Main,
    /// Appendices and references.
    Back,
}

/// Heading payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Anchor candidate. Empty or `None` means the heading carries no anchor.
    pub id: Option<String>,
    /// Plain text of the heading.
    pub literal: String,
    /// Special headings (`.# Abstract`) become `<abstract>` or `<note>`.
    pub is_special: bool,
}

/// List type flags shared by lists and their items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ListFlags {
    /// Numbered list.
    pub ordered: bool,
    /// Definition list, or a definition inside one.
    pub definition: bool,
    /// Term of a definition list.
    pub term: bool,
}

/// List payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct List {
    pub flags: ListFlags,
    /// First number of an ordered list.
    pub start: u64,
    pub is_footnotes: bool,
}

/// List item payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    pub flags: ListFlags,
}

/// Fenced or indented code block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// Raw block content.
    pub literal: String,
    /// Fence info string (`rust,ignore`, `c title=x`).
    pub info: String,
}

impl CodeBlock {
    /// Language from the fence info string, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .map(|lang| lang.trim_matches(|c| matches!(c, '{' | '}' | '.')))
            .filter(|lang| !lang.is_empty())
    }
}

/// Column alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Attribute value for the alignment, `None` when unaligned.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

/// Table cell payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCell {
    pub is_header: bool,
    pub align: Alignment,
}

/// Link or image payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub destination: String,
    pub title: String,
}

/// How a citation contributes to the bibliography.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CitationKind {
    /// `[@ref]` or `[@?ref]`.
    #[default]
    Informative,
    /// `[@!ref]`.
    Normative,
    /// `[@-ref]`: listed in the references but not shown in the text.
    Suppressed,
}

/// One cited anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationTarget {
    pub anchor: String,
    pub kind: CitationKind,
}

/// Citation payload (`[@RFC2119; @!RFC8174]`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Citation {
    pub targets: Vec<CitationTarget>,
}

/// Index entry payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    pub item: String,
    pub subitem: Option<String>,
    pub primary: bool,
}

/// Reference section kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BibliographyKind {
    Normative,
    Informative,
}

impl BibliographyKind {
    /// Title of the generated `<references>` section.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Normative => "Normative References",
            Self::Informative => "Informative References",
        }
    }
}

/// Reference entry payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BibliographyItem {
    /// Anchor used by citations.
    pub anchor: String,
    /// Raw `<reference>` XML supplied by the document, if any.
    pub reference: Option<String>,
}

/// Closed set of node variants.
///
/// `Extension` carries vocabulary that the tree producer knows but the
/// renderers do not; rendering it is an error unless a hook handles it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    DocumentMatter(Matter),
    Title(Box<TitleBlock>),
    Heading(Heading),
    Paragraph,
    List(List),
    ListItem(ListItem),
    CodeBlock(CodeBlock),
    MathBlock { literal: String },
    Table,
    TableHeader,
    TableBody,
    TableFooter,
    TableRow,
    TableCell(TableCell),
    CaptionFigure,
    Caption,
    BlockQuote,
    Aside,
    HtmlBlock { literal: String },
    HtmlSpan { literal: String },
    Text { literal: String },
    Softbreak,
    Hardbreak,
    Emph,
    Strong,
    Del,
    Code { literal: String },
    Math { literal: String },
    Link(Link),
    Image(Link),
    CrossReference { destination: String },
    Citation(Citation),
    Index(Index),
    Callout { id: String },
    Bibliography(BibliographyKind),
    BibliographyItem(BibliographyItem),
    Extension { name: String },
}

impl NodeKind {
    /// Shorthand for a text node.
    pub fn text(literal: impl Into<String>) -> Self {
        Self::Text {
            literal: literal.into(),
        }
    }

    /// Leaf nodes are visited once by [`walk`](crate::walk) and never descended into.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Text { .. }
                | Self::Softbreak
                | Self::Hardbreak
                | Self::Code { .. }
                | Self::Math { .. }
                | Self::CodeBlock(_)
                | Self::MathBlock { .. }
                | Self::HtmlBlock { .. }
                | Self::HtmlSpan { .. }
                | Self::DocumentMatter(_)
                | Self::Title(_)
                | Self::Citation(_)
                | Self::Index(_)
                | Self::Callout { .. }
                | Self::BibliographyItem(_)
                | Self::Extension { .. }
        )
    }

    /// Short variant name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::DocumentMatter(_) => "document-matter",
            Self::Title(_) => "title",
            Self::Heading(_) => "heading",
            Self::Paragraph => "paragraph",
            Self::List(_) => "list",
            Self::ListItem(_) => "list-item",
            Self::CodeBlock(_) => "code-block",
            Self::MathBlock { .. } => "math-block",
            Self::Table => "table",
            Self::TableHeader => "table-header",
            Self::TableBody => "table-body",
            Self::TableFooter => "table-footer",
            Self::TableRow => "table-row",
            Self::TableCell(_) => "table-cell",
            Self::CaptionFigure => "caption-figure",
            Self::Caption => "caption",
            Self::BlockQuote => "block-quote",
            Self::Aside => "aside",
            Self::HtmlBlock { .. } => "html-block",
            Self::HtmlSpan { .. } => "html-span",
            Self::Text { .. } => "text",
            Self::Softbreak => "softbreak",
            Self::Hardbreak => "hardbreak",
            Self::Emph => "emph",
            Self::Strong => "strong",
            Self::Del => "del",
            Self::Code { .. } => "code",
            Self::Math { .. } => "math",
            Self::Link(_) => "link",
            Self::Image(_) => "image",
            Self::CrossReference { .. } => "cross-reference",
            Self::Citation(_) => "citation",
            Self::Index(_) => "index",
            Self::Callout { .. } => "callout",
            Self::Bibliography(_) => "bibliography",
            Self::BibliographyItem(_) => "bibliography-item",
            Self::Extension { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_language() {
        let block = |info: &str| CodeBlock {
            literal: String::new(),
            info: info.to_owned(),
        };
        assert_eq!(block("rust").language(), Some("rust"));
        assert_eq!(block("rust,ignore").language(), Some("rust"));
        assert_eq!(block("c title=x").language(), Some("c"));
        assert_eq!(block("{.go}").language(), Some("go"));
        assert_eq!(block("").language(), None);
    }

    #[test]
    fn test_alignment_as_str() {
        assert_eq!(Alignment::None.as_str(), None);
        assert_eq!(Alignment::Center.as_str(), Some("center"));
    }

    #[test]
    fn test_leaf_kinds() {
        assert!(NodeKind::text("x").is_leaf());
        assert!(NodeKind::DocumentMatter(Matter::Main).is_leaf());
        assert!(!NodeKind::Paragraph.is_leaf());
        assert!(!NodeKind::Caption.is_leaf());
    }

    #[test]
    fn test_extension_name() {
        let kind = NodeKind::Extension {
            name: "horizontal-rule".to_owned(),
        };
        assert_eq!(kind.name(), "horizontal-rule");
    }
}
