//! Forest builder: turns outline declarations into arena trees.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::outline::ForestOutline;
use crate::domain::visitor::AttachVisitor;

/// Constructs arena forests from outline declarations.
///
/// Roots are the declared parents that never appear as a child, plus
/// the standalone leaves. Children attach in declaration order, and
/// every attachment runs through the dispatch protocol, so the builder
/// is bound by the same structural rules as any other caller.
#[derive(Debug, Default)]
pub struct ForestBuilder {
    visited: HashSet<i64>,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and build an outline file.
    #[instrument(level = "debug", skip(self))]
    pub fn build_from_path(&mut self, path: &Path) -> TreeResult<TreeArena> {
        let content = std::fs::read_to_string(path)?;
        let outline = ForestOutline::parse(&content)?;
        self.build(&outline)
    }

    /// Build a forest from a parsed outline.
    #[instrument(level = "debug", skip(self, outline))]
    pub fn build(&mut self, outline: &ForestOutline) -> TreeResult<TreeArena> {
        // Reset state for a fresh build
        self.visited.clear();

        let children_of: HashMap<i64, &[i64]> = outline
            .branches
            .iter()
            .map(|decl| (decl.parent, decl.children.as_slice()))
            .collect();
        let child_values: HashSet<i64> = outline
            .branches
            .iter()
            .flat_map(|decl| decl.children.iter().copied())
            .collect();
        let singles: HashSet<i64> = outline.singles.iter().copied().collect();

        // Roots: parents that are nobody's child, then standalone leaves
        let mut root_values: Vec<i64> = outline
            .branches
            .iter()
            .map(|decl| decl.parent)
            .filter(|parent| !child_values.contains(parent))
            .collect();
        root_values.extend(outline.singles.iter().copied());

        // Cycle detection: declarations present but every one is somebody's child
        if root_values.is_empty() && !outline.branches.is_empty() {
            return Err(TreeError::CycleDetected(outline.branches[0].parent));
        }

        let mut arena = TreeArena::new();
        let mut attach = AttachVisitor;
        let mut ids: HashMap<i64, NodeId> = HashMap::new();

        for &root in &root_values {
            self.grow(&mut arena, &mut attach, &mut ids, &children_of, &singles, root)?;
        }

        // Declarations never reached from any root sit on a detached loop
        for decl in &outline.branches {
            if !self.visited.contains(&decl.parent) {
                return Err(TreeError::CycleDetected(decl.parent));
            }
        }

        debug!(nodes = arena.len(), roots = root_values.len(), "forest built");
        Ok(arena)
    }

    /// Instantiate and attach the tree below `root` with an explicit
    /// work stack.
    fn grow(
        &mut self,
        arena: &mut TreeArena,
        attach: &mut AttachVisitor,
        ids: &mut HashMap<i64, NodeId>,
        children_of: &HashMap<i64, &[i64]>,
        singles: &HashSet<i64>,
        root: i64,
    ) -> TreeResult<()> {
        let mut stack: Vec<(i64, Option<NodeId>)> = vec![(root, None)];

        while let Some((value, parent)) = stack.pop() {
            let id = match ids.get(&value) {
                Some(&existing) => existing,
                None => {
                    let id = if children_of.contains_key(&value) {
                        arena.alloc_branch(value)
                    } else {
                        arena.alloc_leaf(value)
                    };
                    ids.insert(value, id);
                    id
                }
            };

            if let Some(parent_id) = parent {
                // A value reached a second time already carries a
                // parent, so back edges and double attachments surface
                // here as AlreadyAttached.
                arena.accept(parent_id, attach, id)?;
            }
            self.visited.insert(value);

            // Children reversed so they attach in declaration order
            if let Some(children) = children_of.get(&value) {
                for &child in children.iter().rev() {
                    if singles.contains(&child) {
                        return Err(TreeError::DuplicateDeclaration(child));
                    }
                    stack.push((child, Some(id)));
                }
            }
        }

        Ok(())
    }
}
