//! Domain layer: arena forest, dispatch protocol, outline building
//!
//! This layer is independent of external concerns (no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod outline;
pub mod render;
pub mod visitor;

pub use arena::{BranchMut, LeafRef, NodeId, NodeKind, TreeArena, TreeNode};
pub use builder::ForestBuilder;
pub use error::{TreeError, TreeResult};
pub use outline::{BranchDecl, ForestOutline};
pub use render::diagram;
pub use visitor::{AttachVisitor, CountVisitor, NodeVisitor};
