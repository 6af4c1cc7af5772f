//! Tree rendering for terminal output.

use termtree::Tree;

use crate::domain::{EquipmentNode, Forest};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for EquipmentNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(node_label(self)).with_leaves(leaves)
    }
}

/// `Name [ID] (kind, status)` plus the criticality class when set.
pub fn node_label(node: &EquipmentNode) -> String {
    match node.criticality_class {
        Some(class) => format!("{} ({}, {}, class {})", node, node.kind, node.status, class),
        None => format!("{} ({}, {})", node, node.kind, node.status),
    }
}

/// One termtree per root.
pub fn render_forest(forest: &Forest) -> Vec<Tree<String>> {
    forest.roots().iter().map(|root| root.to_tree_string()).collect()
}
