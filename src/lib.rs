//! Composite tree toolkit: arena-backed hierarchies with
//! visitor-driven structural extension.
//!
//! Nodes come in two closed variants, leaves and branches, sharing a
//! surface of value access and traversal that carries no attach
//! operation. Attachment is recovered through the visitor
//! protocol: [`TreeArena::accept`](domain::TreeArena::accept) resolves
//! the receiver's concrete variant and only branch receivers are
//! handed [`BranchMut`](domain::BranchMut), the one type that can grow
//! a child sequence. Sending an attach request to a leaf is absorbed
//! silently instead of failing.
//!
//! Forests are described textually in outline files and built by
//! [`ForestBuilder`](domain::ForestBuilder); the `rstree` binary adds
//! traversal, diagram and inspection commands on top.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use config::Settings;
pub use domain::{
    diagram, AttachVisitor, BranchMut, CountVisitor, ForestBuilder, ForestOutline, LeafRef,
    NodeId, NodeKind, NodeVisitor, TreeArena, TreeError, TreeNode, TreeResult,
};
