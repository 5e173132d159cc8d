//! Error types for XML rendering.

use mdrfc_ast::NodeId;

/// Fatal rendering error. Recoverable problems are reported as warnings instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The tree contains a node the renderer has no mapping for.
    #[error("unknown node `{name}`: no xml2rfc mapping exists for it")]
    UnknownNode {
        /// Variant name reported by the tree producer.
        name: String,
        /// Offending node.
        node: NodeId,
    },
}
