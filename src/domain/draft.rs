//! Input validation at the boundary of the forest.
//!
//! The forest accepts any node it is handed. Drafts and updates are where
//! user input gets checked and defaulted before it reaches `add_node` or
//! `edit_node`.

use crate::domain::error::DomainError;
use crate::domain::node::{CriticalityClass, EquipmentNode, NodeKind, NodeStatus, Sector};

/// Raw input for a new node, as collected from a form or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDraft {
    pub id: Option<String>,
    pub name: String,
    pub kind: Option<NodeKind>,
    pub sector: Option<Sector>,
    pub status: Option<NodeStatus>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub criticality_class: Option<CriticalityClass>,
}

/// Where a draft is going to be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Root { default_sector: Sector },
    Child { parent_sector: Sector },
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl NodeDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Kind the node will get: explicit, else Subassembly below a parent and
    /// Machine at root level.
    pub fn resolved_kind(&self, placement: Placement) -> NodeKind {
        self.kind.unwrap_or(match placement {
            Placement::Root { .. } => NodeKind::Machine,
            Placement::Child { .. } => NodeKind::Subassembly,
        })
    }

    /// Explicit id, trimmed. `Ok(None)` means the caller has to generate one.
    pub fn explicit_id(&self) -> Result<Option<String>, DomainError> {
        match &self.id {
            None => Ok(None),
            Some(id) if id.trim().is_empty() => Err(DomainError::EmptyId),
            Some(id) => Ok(Some(id.trim().to_string())),
        }
    }

    /// Validate and build the node. A child always takes its parent's sector.
    pub fn into_node(self, id: String, placement: Placement) -> Result<EquipmentNode, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        if id.trim().is_empty() {
            return Err(DomainError::EmptyId);
        }
        let kind = self.resolved_kind(placement);
        let sector = match placement {
            Placement::Child { parent_sector } => parent_sector,
            Placement::Root { default_sector } => self.sector.unwrap_or(default_sector),
        };

        let mut node = EquipmentNode::new(id.trim(), name, kind, sector)
            .with_status(self.status.unwrap_or(NodeStatus::Running));
        node.model = non_blank(self.model.as_deref());
        node.serial = non_blank(self.serial.as_deref());
        node.criticality_class = self.criticality_class;
        Ok(node)
    }
}

/// Partial change to an existing node. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<NodeKind>,
    pub sector: Option<Sector>,
    pub status: Option<NodeStatus>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub criticality_class: Option<CriticalityClass>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build the replacement for `current`. Its children are left empty:
    /// the forest reattaches the current children on edit.
    pub fn apply_to(&self, current: &EquipmentNode) -> Result<EquipmentNode, DomainError> {
        let id = match &self.id {
            Some(id) if id.trim().is_empty() => return Err(DomainError::EmptyId),
            Some(id) => id.trim().to_string(),
            None => current.id.clone(),
        };
        let name = match &self.name {
            Some(name) if name.trim().is_empty() => return Err(DomainError::EmptyName),
            Some(name) => name.trim().to_string(),
            None => current.name.clone(),
        };

        Ok(EquipmentNode {
            id,
            name,
            kind: self.kind.unwrap_or(current.kind),
            sector: self.sector.unwrap_or(current.sector),
            status: self.status.unwrap_or(current.status),
            children: Vec::new(),
            // An explicit blank value clears the field
            model: match &self.model {
                Some(model) => non_blank(Some(model.as_str())),
                None => current.model.clone(),
            },
            serial: match &self.serial {
                Some(serial) => non_blank(Some(serial.as_str())),
                None => current.serial.clone(),
            },
            installation_date: current.installation_date.clone(),
            criticality_class: self.criticality_class.or(current.criticality_class),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_name_when_building_node_then_rejects() {
        let draft = NodeDraft::named("   ");
        let result = draft.into_node(
            "X-1".into(),
            Placement::Root {
                default_sector: Sector::Injection,
            },
        );
        assert_eq!(result, Err(DomainError::EmptyName));
    }

    #[test]
    fn given_child_placement_when_building_node_then_inherits_parent_sector_and_kind() {
        let draft = NodeDraft {
            sector: Some(Sector::Printing),
            ..NodeDraft::named(" Belt ")
        };
        let node = draft
            .into_node(
                "SUB-1".into(),
                Placement::Child {
                    parent_sector: Sector::Decoration,
                },
            )
            .unwrap();

        assert_eq!(node.name, "Belt");
        assert_eq!(node.sector, Sector::Decoration);
        assert_eq!(node.kind, NodeKind::Subassembly);
        assert_eq!(node.status, NodeStatus::Running);
    }

    #[test]
    fn given_blank_explicit_id_when_reading_then_rejects() {
        let draft = NodeDraft {
            id: Some("  ".into()),
            ..NodeDraft::named("Motor")
        };
        assert_eq!(draft.explicit_id(), Err(DomainError::EmptyId));
    }

    #[test]
    fn given_partial_update_when_applied_then_keeps_untouched_fields() {
        let mut current =
            EquipmentNode::new("M-1", "Motor", NodeKind::Component, Sector::Injection);
        current.model = Some("X100".into());
        let update = NodeUpdate {
            name: Some("Main motor".into()),
            model: Some(String::new()),
            ..NodeUpdate::default()
        };

        let replacement = update.apply_to(&current).unwrap();

        assert_eq!(replacement.id, "M-1");
        assert_eq!(replacement.name, "Main motor");
        assert_eq!(replacement.kind, NodeKind::Component);
        assert_eq!(replacement.model, None);
    }
}
