//! Renderer configuration and the node override hook.

use mdrfc_ast::{NodeId, Tree, WalkStatus};

/// Options for one renderer.
///
/// Passed explicitly to [`Xml2Renderer::new`](crate::Xml2Renderer::new); the
/// renderer keeps no process-wide state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RendererOptions {
    /// Omit the XML declaration, DOCTYPE and the `<rfc>` root element.
    pub fragment: bool,
    /// Drop inline raw HTML. HTML blocks are always dropped.
    pub skip_html: bool,
    /// Drop images together with their alt text.
    pub skip_images: bool,
    /// Prefix marking callouts inside code and math blocks (e.g. `<<`).
    pub callout: Option<String>,
    /// Comment markers after which a callout may appear (e.g. `//`, `#`).
    pub comments: Vec<String>,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            fragment: false,
            skip_html: false,
            skip_images: true,
            callout: None,
            comments: Vec::new(),
        }
    }
}

/// Override for the rendering of individual nodes.
///
/// The hook runs before the default handling on every visit. Returning
/// `Some(status)` means the hook wrote whatever it wanted to `out` and the
/// default handling is skipped; `None` falls through to the renderer.
///
/// A hook is also the way to render [`NodeKind::Extension`] nodes, which the
/// renderer otherwise rejects.
///
/// [`NodeKind::Extension`]: mdrfc_ast::NodeKind::Extension
///
/// # Example
///
/// ```
/// use mdrfc_ast::{NodeId, NodeKind, Tree, WalkStatus};
/// use mdrfc_xml2::{NodeHook, RendererOptions, Xml2Renderer};
///
/// struct RuleHook;
///
/// impl NodeHook for RuleHook {
///     fn render_node(
///         &mut self,
///         tree: &Tree,
///         id: NodeId,
///         _entering: bool,
///         out: &mut String,
///     ) -> Option<WalkStatus> {
///         match tree.kind(id) {
///             NodeKind::Extension { name } if name == "horizontal-rule" => {
///                 out.push_str("<vspace blankLines=\"1\" />");
///                 Some(WalkStatus::GoToNext)
///             }
///             _ => None,
///         }
///     }
/// }
///
/// let renderer = Xml2Renderer::new(RendererOptions::default()).with_hook(RuleHook);
/// ```
pub trait NodeHook {
    fn render_node(
        &mut self,
        tree: &Tree,
        id: NodeId,
        entering: bool,
        out: &mut String,
    ) -> Option<WalkStatus>;
}

impl<F> NodeHook for F
where
    F: FnMut(&Tree, NodeId, bool, &mut String) -> Option<WalkStatus>,
{
    fn render_node(
        &mut self,
        tree: &Tree,
        id: NodeId,
        entering: bool,
        out: &mut String,
    ) -> Option<WalkStatus> {
        self(tree, id, entering, out)
    }
}
