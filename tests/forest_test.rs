//! Tests for the copy-on-path forest operations

use std::sync::Arc;

use rstest::{fixture, rstest};

use assetree::domain::{matches_term, EquipmentNode, Forest, NodeKind, Sector};

fn node(id: &str, name: &str) -> EquipmentNode {
    EquipmentNode::new(id, name, NodeKind::Component, Sector::Injection)
}

/// A -> B -> C
#[fixture]
fn chain() -> Forest {
    Forest::new(vec![node("A", "A").with_children(vec![
        node("B", "B").with_children(vec![node("C", "C")]),
    ])])
}

/// Two machines with two subassemblies each.
#[fixture]
fn plant() -> Forest {
    Forest::new(vec![
        EquipmentNode::new("INJ-01", "Injector 01", NodeKind::Machine, Sector::Injection)
            .with_children(vec![
                node("INJ-01-HYD", "Hydraulic unit")
                    .with_children(vec![node("INJ-01-PUMP", "Main pump")]),
                node("INJ-01-MOLD", "Mold clamp"),
            ]),
        EquipmentNode::new("PRT-01", "Printer 01", NodeKind::Machine, Sector::Printing)
            .with_children(vec![
                node("PRT-01-HEAD", "Print head"),
                node("PRT-01-FEED", "Feeder").with_children(vec![node("PRT-01-BELT", "Belt")]),
            ]),
    ])
}

fn ids(forest: &Forest) -> Vec<String> {
    forest.iter().map(|(_, n)| n.id.clone()).collect()
}

// ============================================================
// Example scenario
// ============================================================

#[rstest]
fn given_chain_when_deleting_middle_then_root_loses_subtree(chain: Forest) {
    let result = chain.delete_node("B");

    assert_eq!(result, Forest::new(vec![node("A", "A")]));
}

#[rstest]
fn given_chain_when_adding_below_root_then_appends_after_existing_child(chain: Forest) {
    let result = chain.add_node(Some("A"), node("D", "D"));

    let expected = Forest::new(vec![node("A", "A").with_children(vec![
        node("B", "B").with_children(vec![node("C", "C")]),
        node("D", "D"),
    ])]);
    assert_eq!(result, expected);
}

#[rstest]
fn given_chain_when_editing_with_empty_children_then_children_survive(chain: Forest) {
    let result = chain.edit_node("B", node("B", "B2"));

    let expected = Forest::new(vec![node("A", "A").with_children(vec![
        node("B", "B2").with_children(vec![node("C", "C")]),
    ])]);
    assert_eq!(result, expected);
}

#[rstest]
fn given_chain_when_filtering_for_leaf_then_keeps_full_path(chain: Forest) {
    let result = chain.filter_tree(|n| n.id == "C");

    assert_eq!(result, chain);
}

// ============================================================
// Identity isolation
// ============================================================

#[rstest]
fn given_plant_when_adding_deep_then_untouched_subtrees_share_identity(plant: Forest) {
    let result = plant.add_node(Some("INJ-01-PUMP"), node("INJ-01-SEAL", "Seal"));

    // Other root untouched
    assert!(Arc::ptr_eq(&plant.roots()[1], &result.roots()[1]));
    // Sibling of the path untouched
    assert!(Arc::ptr_eq(
        &plant.roots()[0].children[1],
        &result.roots()[0].children[1]
    ));
    // Path rebuilt
    assert!(!Arc::ptr_eq(&plant.roots()[0], &result.roots()[0]));
    assert!(!Arc::ptr_eq(
        &plant.roots()[0].children[0],
        &result.roots()[0].children[0]
    ));
}

#[rstest]
fn given_plant_when_editing_then_untouched_subtrees_share_identity(plant: Forest) {
    let result = plant.edit_node("PRT-01-HEAD", node("PRT-01-HEAD", "Print head v2"));

    assert!(Arc::ptr_eq(&plant.roots()[0], &result.roots()[0]));
    assert!(Arc::ptr_eq(
        &plant.roots()[1].children[1],
        &result.roots()[1].children[1]
    ));
    assert_eq!(result.roots()[1].children[0].name, "Print head v2");
}

#[rstest]
fn given_plant_when_deleting_then_untouched_subtrees_share_identity(plant: Forest) {
    let result = plant.delete_node("PRT-01-BELT");

    assert!(Arc::ptr_eq(&plant.roots()[0], &result.roots()[0]));
    assert!(Arc::ptr_eq(
        &plant.roots()[1].children[0],
        &result.roots()[1].children[0]
    ));
}

#[rstest]
fn given_plant_when_mutating_then_old_snapshot_is_unchanged(plant: Forest) {
    let before = plant.clone();

    let _ = plant.add_node(Some("INJ-01"), node("X", "X"));
    let _ = plant.edit_node("INJ-01", node("INJ-01", "Renamed"));
    let _ = plant.delete_node("PRT-01");

    assert_eq!(plant, before);
}

// ============================================================
// No-op on miss
// ============================================================

#[rstest]
fn given_unknown_id_when_mutating_then_returns_equal_forest(plant: Forest) {
    assert_eq!(plant.add_node(Some("NOPE"), node("X", "X")), plant);
    assert_eq!(plant.edit_node("NOPE", node("NOPE", "X")), plant);
    assert_eq!(plant.delete_node("NOPE"), plant);
}

#[rstest]
fn given_unknown_id_when_deleting_then_roots_keep_identity(plant: Forest) {
    let result = plant.delete_node("NOPE");

    for (old, new) in plant.roots().iter().zip(result.roots()) {
        assert!(Arc::ptr_eq(old, new));
    }
}

// ============================================================
// Edit, delete, add specifics
// ============================================================

#[rstest]
fn given_replacement_with_children_when_editing_then_keeps_existing_children(plant: Forest) {
    let original_children = plant.roots()[0].children.clone();
    let replacement =
        EquipmentNode::new("INJ-01", "Injector 01A", NodeKind::Machine, Sector::Injection)
            .with_children(vec![node("BOGUS", "Bogus")]);

    let result = plant.edit_node("INJ-01", replacement);

    assert_eq!(result.roots()[0].children, original_children);
    assert!(!result.contains("BOGUS"));
}

#[rstest]
fn given_node_with_descendants_when_deleting_then_none_remain(plant: Forest) {
    let result = plant.delete_node("INJ-01-HYD");

    assert!(!result.contains("INJ-01-HYD"));
    assert!(!result.contains("INJ-01-PUMP"));
    assert!(result.contains("INJ-01-MOLD"));
    assert_eq!(result.node_count(), plant.node_count() - 2);
}

#[test]
fn given_duplicate_ids_when_deleting_then_removes_all_carriers() {
    let forest = Forest::new(vec![
        node("R1", "Root 1").with_children(vec![node("DUP", "first")]),
        node("R2", "Root 2").with_children(vec![node("DUP", "second")]),
    ]);

    let result = forest.delete_node("DUP");

    assert!(!result.contains("DUP"));
    assert_eq!(ids(&result), vec!["R1", "R2"]);
}

#[test]
fn given_duplicate_ids_when_adding_then_only_first_match_receives_child() {
    let forest = Forest::new(vec![
        node("R1", "Root 1").with_children(vec![node("DUP", "first")]),
        node("R2", "Root 2").with_children(vec![node("DUP", "second")]),
    ]);

    let result = forest.add_node(Some("DUP"), node("NEW", "New"));

    assert_eq!(result.roots()[0].children[0].children.len(), 1);
    assert!(result.roots()[1].children[0].is_leaf());
    assert!(Arc::ptr_eq(&forest.roots()[1], &result.roots()[1]));
}

#[test]
fn given_duplicate_ids_when_editing_then_only_first_match_changes() {
    let forest = Forest::new(vec![node("DUP", "first"), node("DUP", "second")]);

    let result = forest.edit_node("DUP", node("DUP", "edited"));

    assert_eq!(result.roots()[0].name, "edited");
    assert_eq!(result.roots()[1].name, "second");
}

#[rstest]
fn given_no_parent_when_adding_then_appends_root_in_order(plant: Forest) {
    let result = plant.add_node(None, node("NEW", "New machine"));

    assert_eq!(result.len(), 3);
    assert_eq!(result.roots()[2].id, "NEW");
    assert!(Arc::ptr_eq(&plant.roots()[0], &result.roots()[0]));
    assert!(Arc::ptr_eq(&plant.roots()[1], &result.roots()[1]));
}

#[test]
fn given_empty_forest_when_adding_root_then_contains_single_root() {
    let result = Forest::default().add_node(None, node("A", "A"));

    assert_eq!(ids(&result), vec!["A"]);
}

// ============================================================
// Filter
// ============================================================

#[rstest]
fn given_deep_match_when_filtering_then_ancestors_kept_and_siblings_dropped(plant: Forest) {
    let result = plant.filter_tree(matches_term("pump"));

    assert_eq!(ids(&result), vec!["INJ-01", "INJ-01-HYD", "INJ-01-PUMP"]);
}

#[rstest]
fn given_matching_parent_when_filtering_then_non_matching_children_dropped(plant: Forest) {
    let result = plant.filter_tree(|n| n.id == "PRT-01");

    assert_eq!(ids(&result), vec!["PRT-01"]);
}

#[rstest]
fn given_predicate_matching_nothing_when_filtering_then_empty(plant: Forest) {
    let result = plant.filter_tree(|_| false);

    assert!(result.is_empty());
}

#[rstest]
#[case("INJECTOR", 1)]
#[case("inj-01", 4)]
#[case("prt-01-b", 3)]
#[case("belt", 3)]
fn given_term_when_matching_then_case_insensitive_on_name_or_id(
    plant: Forest,
    #[case] term: &str,
    #[case] expected_nodes: usize,
) {
    let result = plant.filter_tree(matches_term(term));

    assert_eq!(result.node_count(), expected_nodes);
}

// ============================================================
// Queries
// ============================================================

#[rstest]
fn given_plant_when_flattening_then_preorder_with_depth(plant: Forest) {
    let flat = plant.flatten();

    let rows: Vec<(&str, usize)> = flat.iter().map(|e| (e.id.as_str(), e.depth)).collect();
    assert_eq!(
        rows,
        vec![
            ("INJ-01", 0),
            ("INJ-01-HYD", 1),
            ("INJ-01-PUMP", 2),
            ("INJ-01-MOLD", 1),
            ("PRT-01", 0),
            ("PRT-01-HEAD", 1),
            ("PRT-01-FEED", 1),
            ("PRT-01-BELT", 2),
        ]
    );
}

#[rstest]
fn given_plant_when_querying_structure_then_reports_counts(plant: Forest) {
    assert_eq!(plant.node_count(), 8);
    assert_eq!(plant.depth(), 3);
    assert_eq!(
        plant.leaf_ids(),
        vec!["INJ-01-PUMP", "INJ-01-MOLD", "PRT-01-HEAD", "PRT-01-BELT"]
    );
    assert_eq!(plant.subtree_size("INJ-01"), 4);
    assert_eq!(plant.subtree_size("NOPE"), 0);
    assert!(plant.duplicate_ids().is_empty());
}

#[rstest]
fn given_plant_when_retaining_sector_then_only_roots_are_checked(plant: Forest) {
    let result = plant.retain_sector(Sector::Printing);

    assert_eq!(result.len(), 1);
    assert_eq!(result.roots()[0].id, "PRT-01");
    // Children keep their own sector values and come along unchanged
    assert!(Arc::ptr_eq(&plant.roots()[1], &result.roots()[0]));
}

#[test]
fn given_forest_json_when_roundtripping_then_children_omitted_for_leaves() {
    let forest = Forest::new(vec![node("A", "A").with_children(vec![node("B", "B")])]);

    let json = serde_json::to_string(&forest).unwrap();
    let back: Forest = serde_json::from_str(&json).unwrap();

    assert_eq!(back, forest);
    assert_eq!(json.matches("children").count(), 1);
}
