//! Equipment nodes: one asset record in the plant hierarchy.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// Lowercase and unify separators so `Under Maintenance`, `under-maintenance`
/// and `under_maintenance` parse the same.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Level of the asset in its machine breakdown. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[serde(alias = "Máquina")]
    Machine,
    #[serde(alias = "Subconjunto")]
    Subassembly,
    #[serde(alias = "Componente")]
    Component,
    Item,
}

impl NodeKind {
    /// Prefix used for generated ids, e.g. `MAC-4711`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Machine => "MAC",
            NodeKind::Subassembly => "SUB",
            NodeKind::Component => "COM",
            NodeKind::Item => "ITE",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Machine => "Machine",
            NodeKind::Subassembly => "Subassembly",
            NodeKind::Component => "Component",
            NodeKind::Item => "Item",
        };
        write!(f, "{label}")
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "machine" | "máquina" | "maquina" => Ok(NodeKind::Machine),
            "subassembly" | "subconjunto" => Ok(NodeKind::Subassembly),
            "component" | "componente" => Ok(NodeKind::Component),
            "item" => Ok(NodeKind::Item),
            _ => Err(DomainError::UnknownValue {
                kind: "node kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Plant area an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    #[serde(alias = "Injeção")]
    Injection,
    #[serde(alias = "Impressão")]
    Printing,
    #[serde(alias = "Decoração")]
    Decoration,
    #[serde(alias = "Contratos")]
    Contracts,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::Injection,
        Sector::Printing,
        Sector::Decoration,
        Sector::Contracts,
    ];
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sector::Injection => "Injection",
            Sector::Printing => "Printing",
            Sector::Decoration => "Decoration",
            Sector::Contracts => "Contracts",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Sector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "injection" | "injeção" | "injecao" => Ok(Sector::Injection),
            "printing" | "impressão" | "impressao" => Ok(Sector::Printing),
            "decoration" | "decoração" | "decoracao" => Ok(Sector::Decoration),
            "contracts" | "contratos" => Ok(Sector::Contracts),
            _ => Err(DomainError::UnknownValue {
                kind: "sector",
                value: s.to_string(),
            }),
        }
    }
}

/// Operational state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[serde(alias = "Operando")]
    Running,
    #[serde(alias = "Parado")]
    Stopped,
    #[serde(alias = "Alerta")]
    Alert,
    #[serde(alias = "Manutenção")]
    UnderMaintenance,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeStatus::Running => "Running",
            NodeStatus::Stopped => "Stopped",
            NodeStatus::Alert => "Alert",
            NodeStatus::UnderMaintenance => "Under maintenance",
        };
        write!(f, "{label}")
    }
}

impl FromStr for NodeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "running" | "operando" => Ok(NodeStatus::Running),
            "stopped" | "parado" => Ok(NodeStatus::Stopped),
            "alert" | "alerta" => Ok(NodeStatus::Alert),
            "under_maintenance" | "maintenance" | "manutenção" | "manutencao" => {
                Ok(NodeStatus::UnderMaintenance)
            }
            _ => Err(DomainError::UnknownValue {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Asset criticality class (AA is the most critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CriticalityClass {
    #[serde(rename = "AA")]
    DoubleA,
    A,
    B,
    C,
}

impl fmt::Display for CriticalityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CriticalityClass::DoubleA => "AA",
            CriticalityClass::A => "A",
            CriticalityClass::B => "B",
            CriticalityClass::C => "C",
        };
        write!(f, "{label}")
    }
}

impl FromStr for CriticalityClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AA" => Ok(CriticalityClass::DoubleA),
            "A" => Ok(CriticalityClass::A),
            "B" => Ok(CriticalityClass::B),
            "C" => Ok(CriticalityClass::C),
            _ => Err(DomainError::UnknownValue {
                kind: "criticality class",
                value: s.to_string(),
            }),
        }
    }
}

/// One equipment record, possibly with children.
///
/// Children are owned through `Arc` so that snapshots produced by the
/// forest operations can share every subtree they did not touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentNode {
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: NodeKind,
    pub sector: Sector,
    pub status: NodeStatus,
    #[serde(
        default,
        deserialize_with = "children_or_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Arc<EquipmentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criticality_class: Option<CriticalityClass>,
}

/// Absent and `null` children both mean "leaf".
fn children_or_empty<'de, D>(deserializer: D) -> Result<Vec<Arc<EquipmentNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Arc<EquipmentNode>>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EquipmentNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        sector: Sector,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            sector,
            status: NodeStatus::Running,
            children: Vec::new(),
            model: None,
            serial: None,
            installation_date: None,
            criticality_class: None,
        }
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_children(mut self, children: Vec<EquipmentNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this node's own fields on top of a new child list.
    pub(crate) fn rebuilt_with(&self, children: Vec<Arc<EquipmentNode>>) -> Arc<EquipmentNode> {
        Arc::new(EquipmentNode {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            sector: self.sector,
            status: self.status,
            children,
            model: self.model.clone(),
            serial: self.serial.clone(),
            installation_date: self.installation_date.clone(),
            criticality_class: self.criticality_class,
        })
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_size())
            .sum::<usize>()
    }
}

impl fmt::Display for EquipmentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}
