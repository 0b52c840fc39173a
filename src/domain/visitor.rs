//! Double-dispatch visitors over the two node variants.
//!
//! [`TreeArena::accept`](crate::domain::arena::TreeArena::accept)
//! recovers the receiver's concrete variant and forwards to exactly
//! one of the trait methods below. Operations that only make sense
//! for one variant live in a visitor instead of on the shared node
//! surface, so adding an operation never touches the node types.

use tracing::trace;

use crate::domain::arena::{BranchMut, LeafRef, NodeId};
use crate::domain::error::TreeResult;

/// One entry point per concrete node variant.
///
/// The method invoked is decided by the dispatch receiver alone; the
/// payload rides along untouched. Implementations may carry
/// accumulating state between dispatches.
pub trait NodeVisitor {
    type Output;

    /// Called when the receiver is a leaf.
    fn visit_leaf(&mut self, leaf: LeafRef<'_>, payload: NodeId) -> TreeResult<Self::Output>;

    /// Called when the receiver is a branch.
    fn visit_branch(&mut self, branch: BranchMut<'_>, payload: NodeId)
        -> TreeResult<Self::Output>;
}

/// Attaches the payload as the receiver's last child.
///
/// A leaf cannot take children, so a leaf receiver absorbs the request
/// silently: no error, no mutation. Callers that need to know whether
/// an attachment happened inspect the structure afterwards.
#[derive(Debug, Default)]
pub struct AttachVisitor;

impl NodeVisitor for AttachVisitor {
    type Output = ();

    fn visit_leaf(&mut self, leaf: LeafRef<'_>, payload: NodeId) -> TreeResult<()> {
        trace!(leaf = leaf.value(), ?payload, "attach request on leaf ignored");
        Ok(())
    }

    fn visit_branch(&mut self, mut branch: BranchMut<'_>, payload: NodeId) -> TreeResult<()> {
        branch.push_child(payload)
    }
}

/// Counts dispatches per receiver variant.
#[derive(Debug, Default)]
pub struct CountVisitor {
    pub leaves: usize,
    pub branches: usize,
}

impl NodeVisitor for CountVisitor {
    type Output = ();

    fn visit_leaf(&mut self, _leaf: LeafRef<'_>, _payload: NodeId) -> TreeResult<()> {
        self.leaves += 1;
        Ok(())
    }

    fn visit_branch(&mut self, _branch: BranchMut<'_>, _payload: NodeId) -> TreeResult<()> {
        self.branches += 1;
        Ok(())
    }
}
