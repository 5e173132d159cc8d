//! Pre-order tree walk with enter/exit visits.

use crate::tree::{NodeId, Tree};

/// What the walk should do after a visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    /// Continue with the children, then the next node.
    GoToNext,
    /// Do not descend; the exit visit of a container still happens.
    SkipChildren,
    /// Stop the walk. An entered container still gets its exit visit.
    Terminate,
}

/// Walk the subtree rooted at `id` in document order.
///
/// The visitor is called with `entering = true` before a node's children and
/// with `entering = false` after them. Leaf nodes (see
/// [`NodeKind::is_leaf`](crate::NodeKind::is_leaf)) are visited once, entering.
///
/// An error from the visitor aborts the walk immediately and is returned as-is.
pub fn walk<E, F>(tree: &Tree, id: NodeId, visitor: &mut F) -> Result<WalkStatus, E>
where
    F: FnMut(NodeId, bool) -> Result<WalkStatus, E>,
{
    let is_container = !tree.kind(id).is_leaf();
    let status = visitor(id, true)?;

    if status == WalkStatus::Terminate {
        if is_container {
            visitor(id, false)?;
        }
        return Ok(WalkStatus::Terminate);
    }

    if !is_container {
        return Ok(WalkStatus::GoToNext);
    }

    if status != WalkStatus::SkipChildren {
        for &child in tree.children(id) {
            if walk(tree, child, visitor)? == WalkStatus::Terminate {
                visitor(id, false)?;
                return Ok(WalkStatus::Terminate);
            }
        }
    }

    if visitor(id, false)? == WalkStatus::Terminate {
        return Ok(WalkStatus::Terminate);
    }
    Ok(WalkStatus::GoToNext)
}
