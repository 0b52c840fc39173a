//! Terminal tree diagrams via termtree

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};

/// Render the subtree at `root` as a termtree diagram.
///
/// Recursion depth here equals tree depth; diagrams are for human
/// eyes, so the display path accepts that bound while traversal
/// proper stays iterative.
#[instrument(level = "debug", skip(arena))]
pub fn diagram(arena: &TreeArena, root: NodeId) -> Tree<String> {
    match arena.node(root) {
        Ok(node) => {
            let leaves: Vec<_> = node
                .children()
                .iter()
                .map(|&child| diagram(arena, child))
                .collect();
            Tree::new(node.value().to_string()).with_leaves(leaves)
        }
        Err(_) => Tree::new("<missing>".to_string()),
    }
}
