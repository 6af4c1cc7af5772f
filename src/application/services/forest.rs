//! Equipment hierarchy service
//!
//! Loads and saves forest snapshots, turns drafts and updates into forest
//! operations, and enforces the checks the pure forest leaves open (parent
//! existence, id uniqueness, delete confirmation).

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::application::store::{load_json, save_json};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    matches_term, DomainError, EquipmentNode, Forest, NodeDraft, NodeKind, NodeUpdate, Placement,
    Sector,
};
use crate::infrastructure::traits::{Confirmer, FileSystem};

/// How many random ids are tried before giving up.
pub const MAX_ID_ATTEMPTS: usize = 100;

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The node and `removed - 1` descendants are gone.
    Deleted { forest: Forest, removed: usize },
    /// The user declined; nothing changed.
    Cancelled,
    /// No node carries the id; nothing changed.
    NotFound,
}

/// Structural summary of a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestReport {
    pub roots: usize,
    pub nodes: usize,
    pub depth: usize,
    pub leaves: usize,
    pub duplicate_ids: Vec<String>,
}

impl ForestReport {
    pub fn is_consistent(&self) -> bool {
        self.duplicate_ids.is_empty()
    }
}

/// Service for reading and changing the equipment hierarchy.
pub struct ForestService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ForestService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Forest> {
        let forest: Forest = load_json(self.fs.as_ref(), path)?;
        debug!("load: {} roots", forest.len());
        Ok(forest)
    }

    pub fn save(&self, path: &Path, forest: &Forest) -> ApplicationResult<()> {
        save_json(self.fs.as_ref(), path, forest)
    }

    /// Sector filter on roots first, then the path-preserving text search.
    /// A blank term means no text filter.
    pub fn view(&self, forest: &Forest, sector: Option<Sector>, term: Option<&str>) -> Forest {
        let scoped = match sector {
            Some(sector) => forest.retain_sector(sector),
            None => forest.clone(),
        };
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => scoped.filter_tree(matches_term(term)),
            None => scoped,
        }
    }

    /// Validate `draft` and attach it below `parent_id` (or as a new root).
    ///
    /// Returns the new snapshot together with the node that was added.
    #[instrument(level = "debug", skip(self, forest, draft), fields(name = %draft.name))]
    pub fn add(
        &self,
        forest: &Forest,
        parent_id: Option<&str>,
        draft: NodeDraft,
    ) -> ApplicationResult<(Forest, EquipmentNode)> {
        let placement = match parent_id {
            Some(parent_id) => {
                let parent = forest
                    .find(parent_id)
                    .ok_or_else(|| DomainError::NotFound(parent_id.to_string()))?;
                Placement::Child {
                    parent_sector: parent.sector,
                }
            }
            None => Placement::Root {
                default_sector: self.settings.default_sector,
            },
        };

        let id = match draft.explicit_id()? {
            Some(id) if forest.contains(&id) => return Err(DomainError::DuplicateId(id).into()),
            Some(id) => id,
            None => generate_id(forest, draft.resolved_kind(placement))?,
        };

        let node = draft.into_node(id, placement)?;
        info!("add: {} below {:?}", node, parent_id);
        Ok((forest.add_node(parent_id, node.clone()), node))
    }

    /// Apply `update` to the node `target_id`. Children are kept.
    #[instrument(level = "debug", skip(self, forest, update))]
    pub fn edit(
        &self,
        forest: &Forest,
        target_id: &str,
        update: &NodeUpdate,
    ) -> ApplicationResult<(Forest, EquipmentNode)> {
        let current = forest
            .find(target_id)
            .ok_or_else(|| DomainError::NotFound(target_id.to_string()))?;
        let replacement = update.apply_to(current)?;
        if replacement.id != target_id && forest.contains(&replacement.id) {
            return Err(DomainError::DuplicateId(replacement.id).into());
        }

        info!("edit: {} -> {}", target_id, replacement);
        Ok((
            forest.edit_node(target_id, replacement.clone()),
            replacement,
        ))
    }

    /// Delete `target_id` with its subtree after confirmation.
    ///
    /// Confirmation is skipped when `confirm_delete` is off in the settings.
    #[instrument(level = "debug", skip(self, forest, confirmer))]
    pub fn delete(
        &self,
        forest: &Forest,
        target_id: &str,
        confirmer: &dyn Confirmer,
    ) -> ApplicationResult<DeleteOutcome> {
        let Some(node) = forest.find(target_id) else {
            warn!("delete: {} not found", target_id);
            return Ok(DeleteOutcome::NotFound);
        };
        let removed = forest.subtree_size(target_id);

        if self.settings.confirm_delete {
            let question = format!(
                "Delete {} and {} descendant(s)?",
                node,
                removed.saturating_sub(1)
            );
            let confirmed = confirmer
                .confirm(&question)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: "read confirmation".to_string(),
                    source: Box::new(e),
                })?;
            if !confirmed {
                info!("delete: {} cancelled", target_id);
                return Ok(DeleteOutcome::Cancelled);
            }
        }

        info!("delete: {} ({} nodes)", target_id, removed);
        Ok(DeleteOutcome::Deleted {
            forest: forest.delete_node(target_id),
            removed,
        })
    }

    pub fn check(&self, forest: &Forest) -> ForestReport {
        ForestReport {
            roots: forest.len(),
            nodes: forest.node_count(),
            depth: forest.depth(),
            leaves: forest.leaf_ids().len(),
            duplicate_ids: forest.duplicate_ids(),
        }
    }
}

/// Random `{PREFIX}-{n}` id not yet present in `forest`.
pub fn generate_id(forest: &Forest, kind: NodeKind) -> ApplicationResult<String> {
    let prefix = kind.id_prefix();
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = format!("{}-{}", prefix, rng.gen_range(0..10_000));
        if !forest.contains(&candidate) {
            return Ok(candidate);
        }
        debug!("generate_id: {} taken, retrying", candidate);
    }
    Err(DomainError::IdGenerationExhausted {
        prefix: prefix.to_string(),
        attempts: MAX_ID_ATTEMPTS,
    }
    .into())
}
