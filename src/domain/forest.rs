//! The equipment forest and its copy-on-path operations.
//!
//! A `Forest` is an immutable snapshot. Every mutation returns a new value in
//! which only the nodes on the path from a root to the affected node are
//! rebuilt; all other subtrees are the same `Arc` as in the input. A missed
//! id is not an error: the operation hands back an identical snapshot.

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::node::{CriticalityClass, EquipmentNode, Sector};

/// Ordered sequence of root equipment nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<Arc<EquipmentNode>>,
}

/// One row of the flattened hierarchy (asset pickers, plain listings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub criticality_class: Option<CriticalityClass>,
}

impl FromIterator<EquipmentNode> for Forest {
    fn from_iter<I: IntoIterator<Item = EquipmentNode>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl Forest {
    pub fn new(roots: Vec<EquipmentNode>) -> Self {
        roots.into_iter().collect()
    }

    pub fn roots(&self) -> &[Arc<EquipmentNode>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Append `node` below the first node (preorder, sibling order) whose id
    /// is `parent_id`, or as a new last root when `parent_id` is `None`.
    ///
    /// Exactly one node receives the child even if the id occurs twice.
    #[instrument(level = "debug", skip(self, node), fields(node_id = %node.id))]
    pub fn add_node(&self, parent_id: Option<&str>, node: EquipmentNode) -> Forest {
        let node = Arc::new(node);
        let Some(parent_id) = parent_id else {
            let mut roots = self.roots.clone();
            roots.push(node);
            return Forest { roots };
        };

        match add_below(&self.roots, parent_id, &node) {
            Some(roots) => Forest { roots },
            None => {
                debug!("parent not found, forest unchanged");
                self.clone()
            }
        }
    }

    /// Overwrite the fields of the first node with `target_id` by those of
    /// `replacement`, keeping the existing children.
    ///
    /// Whatever children `replacement` carries are ignored: edit never
    /// changes subtree membership.
    #[instrument(level = "debug", skip(self, replacement))]
    pub fn edit_node(&self, target_id: &str, replacement: EquipmentNode) -> Forest {
        match edit_in(&self.roots, target_id, &replacement) {
            Some(roots) => Forest { roots },
            None => {
                debug!("target not found, forest unchanged");
                self.clone()
            }
        }
    }

    /// Remove every node with `target_id` together with its subtree.
    ///
    /// With unique ids this removes at most one node. If ids collide, all
    /// carriers of the id are removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&self, target_id: &str) -> Forest {
        match delete_in(&self.roots, target_id) {
            Some(roots) => Forest { roots },
            None => {
                debug!("target not found, forest unchanged");
                self.clone()
            }
        }
    }

    /// Prune to the nodes matching `predicate` plus the full ancestor path of
    /// every match.
    ///
    /// A kept node's children are the filtered children, so a matching node
    /// also loses descendants that neither match nor lead to a match.
    pub fn filter_tree<P>(&self, predicate: P) -> Forest
    where
        P: Fn(&EquipmentNode) -> bool,
    {
        Forest {
            roots: filter_nodes(&self.roots, &predicate),
        }
    }

    /// Keep only the roots located in `sector`. Descendants are not inspected.
    pub fn retain_sector(&self, sector: Sector) -> Forest {
        Forest {
            roots: self
                .roots
                .iter()
                .filter(|root| root.sector == sector)
                .cloned()
                .collect(),
        }
    }

    /// First node with `id` in preorder.
    pub fn find(&self, id: &str) -> Option<&Arc<EquipmentNode>> {
        fn find_in<'a>(
            nodes: &'a [Arc<EquipmentNode>],
            id: &str,
        ) -> Option<&'a Arc<EquipmentNode>> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = find_in(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of nodes `delete_node(id)` would remove, 0 if `id` is unknown.
    pub fn subtree_size(&self, id: &str) -> usize {
        self.iter()
            .filter(|(_, node)| node.id == id)
            .map(|(_, node)| node.subtree_size())
            .sum()
    }

    /// Preorder traversal yielding `(depth, node)`, roots at depth 0.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder::new(self)
    }

    pub fn flatten(&self) -> Vec<FlatEntry> {
        self.iter()
            .map(|(depth, node)| FlatEntry {
                id: node.id.clone(),
                name: node.name.clone(),
                depth,
                criticality_class: node.criticality_class,
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Height of the tallest tree, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    /// Ids carried by more than one node, in order of first repetition.
    pub fn duplicate_ids(&self) -> Vec<String> {
        self.iter()
            .map(|(_, node)| node.id.as_str())
            .duplicates()
            .map(str::to_string)
            .collect()
    }
}

/// Case-insensitive substring match against a node's name or id.
pub fn matches_term(term: &str) -> impl Fn(&EquipmentNode) -> bool {
    let term = term.to_lowercase();
    move |node: &EquipmentNode| {
        node.name.to_lowercase().contains(&term) || node.id.to_lowercase().contains(&term)
    }
}

fn add_below(
    nodes: &[Arc<EquipmentNode>],
    parent_id: &str,
    child: &Arc<EquipmentNode>,
) -> Option<Vec<Arc<EquipmentNode>>> {
    for (idx, node) in nodes.iter().enumerate() {
        let rebuilt = if node.id == parent_id {
            let mut children = node.children.clone();
            children.push(Arc::clone(child));
            node.rebuilt_with(children)
        } else if let Some(children) = add_below(&node.children, parent_id, child) {
            node.rebuilt_with(children)
        } else {
            continue;
        };
        let mut out = nodes.to_vec();
        out[idx] = rebuilt;
        return Some(out);
    }
    None
}

fn edit_in(
    nodes: &[Arc<EquipmentNode>],
    target_id: &str,
    replacement: &EquipmentNode,
) -> Option<Vec<Arc<EquipmentNode>>> {
    for (idx, node) in nodes.iter().enumerate() {
        let rebuilt = if node.id == target_id {
            replacement.rebuilt_with(node.children.clone())
        } else if let Some(children) = edit_in(&node.children, target_id, replacement) {
            node.rebuilt_with(children)
        } else {
            continue;
        };
        let mut out = nodes.to_vec();
        out[idx] = rebuilt;
        return Some(out);
    }
    None
}

/// `None` when nothing at or below `nodes` carries `target_id`.
fn delete_in(nodes: &[Arc<EquipmentNode>], target_id: &str) -> Option<Vec<Arc<EquipmentNode>>> {
    let mut changed = false;
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if node.id == target_id {
            changed = true;
            continue;
        }
        match delete_in(&node.children, target_id) {
            Some(children) => {
                changed = true;
                out.push(node.rebuilt_with(children));
            }
            None => out.push(Arc::clone(node)),
        }
    }
    changed.then_some(out)
}

fn filter_nodes<P>(nodes: &[Arc<EquipmentNode>], predicate: &P) -> Vec<Arc<EquipmentNode>>
where
    P: Fn(&EquipmentNode) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| {
            let children = filter_nodes(&node.children, predicate);
            (predicate(node) || !children.is_empty()).then(|| node.rebuilt_with(children))
        })
        .collect()
}

pub struct Preorder<'a> {
    stack: Vec<(usize, &'a EquipmentNode)>,
}

impl<'a> Preorder<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Reverse push for left-to-right traversal
        let stack = forest
            .roots
            .iter()
            .rev()
            .map(|root| (0, root.as_ref()))
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a EquipmentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child.as_ref()));
        }
        Some((depth, node))
    }
}
