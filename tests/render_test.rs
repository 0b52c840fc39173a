//! Tests for termtree diagram rendering

use std::path::Path;

use rstree::domain::{diagram, ForestBuilder, TreeArena};
use rstree::util::testing;

#[test]
fn given_demo_forest_when_rendering_then_draws_nested_diagram() {
    testing::init_test_setup();
    let expected = "1
├── 2
│   ├── 5
│   └── 6
├── 3
│   └── 7
└── 4\n";

    let path = Path::new("tests/resources/outlines/demo.txt");
    let arena = ForestBuilder::new().build_from_path(path).unwrap();
    let root = arena.find_root(1).unwrap();

    let rendered = diagram(&arena, root).to_string();

    assert_eq!(rendered, expected);
}

#[test]
fn given_single_node_when_rendering_then_draws_bare_value() {
    testing::init_test_setup();
    let mut arena = TreeArena::new();
    let leaf = arena.alloc_leaf(42);

    assert_eq!(diagram(&arena, leaf).to_string(), "42\n");
}

#[test]
fn given_foreign_handle_when_rendering_then_marks_missing() {
    testing::init_test_setup();
    let mut other = TreeArena::new();
    let foreign = other.alloc_leaf(1);

    let arena = TreeArena::new();

    assert_eq!(diagram(&arena, foreign).to_string(), "<missing>\n");
}
