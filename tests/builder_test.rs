//! Tests for ForestBuilder

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rstree::domain::{ForestBuilder, ForestOutline, TreeError};
use rstree::util::testing;

fn create_outline(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write outline file");
    path
}

// ============================================================
// Building Tests
// ============================================================

#[test]
fn given_outline_file_when_building_then_creates_forest() {
    testing::init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_outline(&temp, "demo.txt", "1: 2 3 4\n2: 5 6\n3: 7\n");

    // Act
    let mut builder = ForestBuilder::new();
    let arena = builder.build_from_path(&path).unwrap();

    // Assert
    assert_eq!(arena.len(), 7);
    let root = arena.find_root(1).unwrap();
    assert_eq!(arena.preorder_values(root), vec![1, 2, 5, 6, 3, 7, 4]);
}

#[test]
fn given_outline_with_multiple_roots_when_building_then_creates_all() {
    testing::init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_outline(&temp, "forest.txt", "1: 2\n3: 4\n9\n");

    // Act
    let mut builder = ForestBuilder::new();
    let arena = builder.build_from_path(&path).unwrap();

    // Assert
    let root_values: Vec<i64> = arena
        .roots()
        .map(|id| arena.value(id).unwrap())
        .collect();
    assert_eq!(root_values, vec![1, 3, 9]);
    assert_eq!(arena.len(), 5);
}

#[test]
fn given_children_in_declaration_order_when_building_then_order_survives() {
    testing::init_test_setup();
    let outline = ForestOutline::parse("1: 4 2 3\n").unwrap();

    let arena = ForestBuilder::new().build(&outline).unwrap();

    let root = arena.find_root(1).unwrap();
    assert_eq!(arena.preorder_values(root), vec![1, 4, 2, 3]);
}

#[test]
fn given_child_declared_as_branch_when_building_then_becomes_branch() {
    testing::init_test_setup();
    let outline = ForestOutline::parse("1: 2 3\n2:\n").unwrap();

    let arena = ForestBuilder::new().build(&outline).unwrap();

    let root = arena.find_root(1).unwrap();
    let kinds: Vec<(i64, bool)> = arena
        .preorder(root)
        .map(|(_, n)| (n.value(), n.is_branch()))
        .collect();
    // 2 is declared with an (empty) child list, 3 is not
    assert_eq!(kinds, vec![(1, true), (2, true), (3, false)]);
}

#[test]
fn given_empty_outline_when_building_then_arena_is_empty() {
    testing::init_test_setup();
    let outline = ForestOutline::parse("# no declarations\n").unwrap();

    let arena = ForestBuilder::new().build(&outline).unwrap();

    assert!(arena.is_empty());
    assert_eq!(arena.roots().count(), 0);
}

// ============================================================
// Rejection Tests
// ============================================================

#[test]
fn given_self_referencing_line_when_building_then_cycle_detected() {
    testing::init_test_setup();
    let outline = ForestOutline::parse("1: 1\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::CycleDetected(1))));
}

#[test]
fn given_mutual_references_when_building_then_cycle_detected() {
    testing::init_test_setup();
    // Every declared value is someone's child, so no root exists
    let outline = ForestOutline::parse("1: 2\n2: 1\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::CycleDetected(1))));
}

#[test]
fn given_back_edge_when_building_then_second_attachment_rejected() {
    testing::init_test_setup();
    // 1 is a valid root, but growing 1 -> 2 -> 3 -> 2 reaches 2 twice
    let outline = ForestOutline::parse("1: 2\n2: 3\n3: 2\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::AlreadyAttached(2))));
}

#[test]
fn given_shared_child_when_building_then_second_attachment_rejected() {
    testing::init_test_setup();
    let outline = ForestOutline::parse("1: 2 3\n4: 3\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::AlreadyAttached(3))));
}

#[test]
fn given_detached_loop_when_building_then_cycle_detected() {
    testing::init_test_setup();
    // 1: 2 builds fine; 3 and 4 feed each other and are never reached
    let outline = ForestOutline::parse("1: 2\n3: 4\n4: 3\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::CycleDetected(3))));
}

#[test]
fn given_single_listed_as_child_when_building_then_rejected() {
    testing::init_test_setup();
    // 5 declared standalone cannot also hang under 1
    let outline = ForestOutline::parse("5\n1: 5\n").unwrap();

    let result = ForestBuilder::new().build(&outline);

    assert!(matches!(result, Err(TreeError::DuplicateDeclaration(5))));
}

#[test]
fn given_nonexistent_path_when_building_then_errors() {
    testing::init_test_setup();
    // Arrange
    let mut builder = ForestBuilder::new();

    // Act
    let result = builder.build_from_path(Path::new("/nonexistent/outline.txt"));

    // Assert
    assert!(matches!(result, Err(TreeError::OutlineRead(_))));
}

// ============================================================
// Fixture Tests
// ============================================================

#[test]
fn given_bundled_demo_outline_when_building_then_matches_expected_traversal() {
    testing::init_test_setup();
    let path = Path::new("tests/resources/outlines/demo.txt");

    let arena = ForestBuilder::new().build_from_path(path).unwrap();

    let root = arena.find_root(1).unwrap();
    let mut out = Vec::new();
    arena.write_preorder(root, " ", &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1 2 5 6 3 7 4");
}

#[test]
fn given_deep_chain_outline_when_building_then_does_not_overflow() {
    testing::init_test_setup();
    // Arrange: 0: 1, 1: 2, ... one long chain
    let depth: i64 = 5_000;
    let mut content = String::new();
    for value in 0..depth - 1 {
        content.push_str(&format!("{}: {}\n", value, value + 1));
    }
    let outline = ForestOutline::parse(&content).unwrap();

    // Act
    let arena = ForestBuilder::new().build(&outline).unwrap();

    // Assert
    let root = arena.find_root(0).unwrap();
    assert_eq!(arena.depth(root) as i64, depth);
    assert_eq!(arena.preorder_values(root).len() as i64, depth);
}

#[test]
fn given_bundled_orchard_outline_when_building_then_all_roots_grow() {
    testing::init_test_setup();
    let path = Path::new("tests/resources/outlines/orchard.txt");

    let arena = ForestBuilder::new().build_from_path(path).unwrap();

    assert_eq!(arena.roots().count(), 3);
    let root = arena.find_root(10).unwrap();
    assert_eq!(arena.depth(root), 3);
}
