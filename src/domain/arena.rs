use std::io::{self, Write};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::visitor::NodeVisitor;

/// Handle to a node stored in a [`TreeArena`].
///
/// Generational indices stay cheap to copy and catch stale handles:
/// a handle from another arena resolves to nothing instead of to a
/// random node.
pub type NodeId = Index;

/// The two concrete node variants. The set is closed: dispatch code
/// can match exhaustively and the compiler tracks new variants.
#[derive(Debug)]
pub enum NodeKind {
    /// Terminal node, never has children
    Leaf,
    /// Interior node owning an ordered child sequence
    Branch { children: Vec<NodeId> },
}

/// Tree node in the arena-based hierarchy structure.
///
/// The child sequence must not be reachable for mutation outside the
/// dispatch protocol, so the node surface offers value access and
/// read-only structure only.
#[derive(Debug)]
pub struct TreeNode {
    /// Payload value for this node
    value: i64,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<NodeId>,
    /// Concrete variant with its structural data
    kind: NodeKind,
}

impl TreeNode {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    /// Children in attachment order; always empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Branch { children } => children,
        }
    }
}

/// Arena-based forest structure for efficient hierarchy management.
///
/// Uses generational arena for memory-safe node references and O(1)
/// lookups. One arena may hold several trees; nodes without a parent
/// are the forest roots.
///
/// Structural mutation happens exclusively through [`TreeArena::accept`]:
/// the dispatch resolves the receiver's concrete variant and only a
/// branch receiver hands out [`BranchMut`], the one type that can grow
/// a child sequence. Nothing else in the crate can attach nodes, so a
/// leaf can never be given children.
#[derive(Debug, Default)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    nodes: Arena<TreeNode>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Allocate a detached leaf; it starts out as a root of its own.
    #[instrument(level = "trace", skip(self))]
    pub fn alloc_leaf(&mut self, value: i64) -> NodeId {
        self.nodes.insert(TreeNode {
            value,
            parent: None,
            kind: NodeKind::Leaf,
        })
    }

    /// Allocate a detached branch with an empty child sequence.
    #[instrument(level = "trace", skip(self))]
    pub fn alloc_branch(&mut self, value: i64) -> NodeId {
        self.nodes.insert(TreeNode {
            value,
            parent: None,
            kind: NodeKind::Branch {
                children: Vec::new(),
            },
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: NodeId) -> TreeResult<&TreeNode> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Value stored at `id`.
    pub fn value(&self, id: NodeId) -> TreeResult<i64> {
        Ok(self.node(id)?.value)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Roots (parentless nodes) in allocation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    /// First root carrying `value`, scanning allocation order.
    #[instrument(level = "trace", skip(self))]
    pub fn find_root(&self, value: i64) -> Option<NodeId> {
        self.roots().find(|&id| self.nodes[id].value == value)
    }

    /// Double-dispatch entry point.
    ///
    /// Resolves the concrete variant of `target` and forwards to the
    /// visitor method for that variant, handing the payload through
    /// untouched. Which method runs depends on the receiver alone,
    /// never on the payload or on the caller's idea of the type.
    ///
    /// Both handles are validated up front, so visitor methods can
    /// rely on them resolving.
    #[instrument(level = "debug", skip(self, visitor))]
    pub fn accept<V: NodeVisitor>(
        &mut self,
        target: NodeId,
        visitor: &mut V,
        payload: NodeId,
    ) -> TreeResult<V::Output> {
        if !self.nodes.contains(payload) {
            return Err(TreeError::NodeNotFound(payload));
        }
        let is_branch = self.node(target)?.is_branch();
        if is_branch {
            visitor.visit_branch(BranchMut { arena: self, id: target }, payload)
        } else {
            visitor.visit_leaf(LeafRef { arena: self, id: target }, payload)
        }
    }

    /// Pre-order iterator over the subtree at `root`: a node before
    /// its children, children in attachment order.
    #[instrument(level = "trace", skip(self))]
    pub fn preorder(&self, root: NodeId) -> PreOrderIter {
        PreOrderIter {
            arena: self,
            stack: vec![root],
        }
    }

    /// Post-order iterator over the subtree at `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn postorder(&self, root: NodeId) -> PostOrderIter {
        PostOrderIter {
            arena: self,
            stack: vec![(root, false)],
        }
    }

    /// Pre-order values of the subtree at `root`.
    pub fn preorder_values(&self, root: NodeId) -> Vec<i64> {
        self.preorder(root).map(|(_, node)| node.value).collect()
    }

    /// Write the pre-order value sequence of the subtree at `root` to
    /// `out`, with `separator` between consecutive values. The caller
    /// owns the line ending convention.
    #[instrument(level = "debug", skip(self, out))]
    pub fn write_preorder(
        &self,
        root: NodeId,
        separator: &str,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let mut first = true;
        for (_, node) in self.preorder(root) {
            if !first {
                out.write_all(separator.as_bytes())?;
            }
            write!(out, "{}", node.value)?;
            first = false;
        }
        Ok(())
    }

    /// Depth of the subtree at `root`; a lone node has depth 1 and a
    /// missing root depth 0. Iterative, so chain-shaped trees cannot
    /// exhaust the call stack.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, root: NodeId) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(root, 1)]; // (node, depth)

        while let Some((current, depth)) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                if depth > max_depth {
                    max_depth = depth;
                }
                for &child in node.children() {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Collects values of all childless nodes in the subtree at `root`,
    /// in traversal order. Every leaf is childless; a branch that never
    /// received children counts too.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_values(&self, root: NodeId) -> Vec<i64> {
        self.preorder(root)
            .filter(|(_, node)| node.children().is_empty())
            .map(|(_, node)| node.value)
            .collect()
    }

    /// Root-to-leaf value paths of the subtree at `root`, one per
    /// childless node, in traversal order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self, root: NodeId) -> Vec<Vec<i64>> {
        let mut paths = Vec::new();
        let root_value = match self.nodes.get(root) {
            Some(node) => node.value,
            None => return paths,
        };
        let mut stack = vec![(root, vec![root_value])];

        while let Some((current, path)) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                if node.children().is_empty() {
                    paths.push(path);
                } else {
                    for &child in node.children().iter().rev() {
                        let mut next = path.clone();
                        if let Some(child_node) = self.nodes.get(child) {
                            next.push(child_node.value);
                        }
                        stack.push((child, next));
                    }
                }
            }
        }

        paths
    }
}

/// Read-only view of a leaf receiver during a dispatch.
///
/// A leaf has no structural capability, so none is exposed here; the
/// compiler rejects any attempt to attach through a leaf.
#[derive(Debug)]
pub struct LeafRef<'a> {
    arena: &'a TreeArena,
    id: NodeId,
}

impl LeafRef<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> i64 {
        self.arena.nodes[self.id].value
    }
}

/// Mutable view of a branch receiver during a dispatch.
///
/// This is the only type that can grow a child sequence. It is
/// constructed exclusively inside [`TreeArena::accept`] once the
/// receiver's variant is known to be a branch.
#[derive(Debug)]
pub struct BranchMut<'a> {
    arena: &'a mut TreeArena,
    id: NodeId,
}

impl BranchMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> i64 {
        self.arena.nodes[self.id].value
    }

    pub fn child_count(&self) -> usize {
        self.arena.nodes[self.id].children().len()
    }

    /// Append `child` to the end of the child sequence.
    ///
    /// Rejections keep the forest a forest: a child that already has a
    /// parent (`AlreadyAttached`), and a child that is the receiver
    /// itself or one of its ancestors (`CycleDetected`). On error the
    /// arena is left untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn push_child(&mut self, child: NodeId) -> TreeResult<()> {
        let child_value = self.arena.node(child)?.value;
        if self.arena.nodes[child].parent.is_some() {
            return Err(TreeError::AlreadyAttached(child_value));
        }

        // Walk receiver's ancestor chain; finding the child there means
        // the attachment would close a loop.
        let mut cursor = Some(self.id);
        while let Some(current) = cursor {
            if current == child {
                return Err(TreeError::CycleDetected(child_value));
            }
            cursor = self.arena.nodes[current].parent;
        }

        self.arena.nodes[child].parent = Some(self.id);
        match &mut self.arena.nodes[self.id].kind {
            NodeKind::Branch { children } => children.push(child),
            NodeKind::Leaf => unreachable!("BranchMut only ever wraps a branch"),
        }
        Ok(())
    }
}

pub struct PreOrderIter<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.nodes.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIter<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            if let Some(node) = self.arena.nodes.get(current) {
                if !expanded {
                    self.stack.push((current, true));
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
