//! Work orders raised from the equipment hierarchy.
//!
//! A work order starts life as a service request against one node and is
//! then planned by merging partial updates into it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::draft::non_blank;
use crate::domain::error::DomainError;
use crate::domain::node::{normalize_token, EquipmentNode, Sector};
use crate::domain::records::Keyed;

/// Title used when a service request comes in without one.
pub const DEFAULT_REQUEST_TITLE: &str = "New service request";

/// Code in front of a legacy `"C010 - Corretiva Imediata"` label.
fn leading_code(s: &str) -> String {
    s.split(" - ").next().unwrap_or(s).trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkOrderType {
    /// Immediate corrective
    #[default]
    #[serde(rename = "C010", alias = "C010 - Corretiva Imediata")]
    C010,
    /// Deferred corrective
    #[serde(rename = "C020", alias = "C020 - Corretiva Diferida")]
    C020,
    /// Systematic preventive
    #[serde(rename = "P010", alias = "P010 - Preventiva Sistemática")]
    P010,
    /// Sensory inspection
    #[serde(rename = "P030", alias = "P030 - Inspeção / Sensitiva")]
    P030,
    /// Predictive
    #[serde(rename = "P050", alias = "P050 - Preditiva")]
    P050,
    /// Condition-based preventive
    #[serde(rename = "P060", alias = "P060 - Preventiva Condicional")]
    P060,
    /// Improvement or overhaul
    #[serde(rename = "I010", alias = "I010 - Melhoria / Reforma")]
    I010,
}

impl fmt::Display for WorkOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkOrderType::C010 => "C010 Immediate corrective",
            WorkOrderType::C020 => "C020 Deferred corrective",
            WorkOrderType::P010 => "P010 Systematic preventive",
            WorkOrderType::P030 => "P030 Sensory inspection",
            WorkOrderType::P050 => "P050 Predictive",
            WorkOrderType::P060 => "P060 Condition-based preventive",
            WorkOrderType::I010 => "I010 Improvement",
        };
        write!(f, "{label}")
    }
}

impl FromStr for WorkOrderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match leading_code(s).as_str() {
            "C010" => Ok(WorkOrderType::C010),
            "C020" => Ok(WorkOrderType::C020),
            "P010" => Ok(WorkOrderType::P010),
            "P030" => Ok(WorkOrderType::P030),
            "P050" => Ok(WorkOrderType::P050),
            "P060" => Ok(WorkOrderType::P060),
            "I010" => Ok(WorkOrderType::I010),
            _ => Err(DomainError::UnknownValue {
                kind: "work order type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkOrderCategory {
    /// Corrective maintenance
    #[default]
    #[serde(rename = "MC", alias = "MC - Manutenção Corretiva")]
    Mc,
    /// Preventive maintenance
    #[serde(rename = "MT", alias = "MT - Manutenção Preventiva")]
    Mt,
    /// Inspection and measurement
    #[serde(rename = "IM", alias = "IM - Inspeção e Medição")]
    Im,
    /// Condition-based maintenance
    #[serde(rename = "MD", alias = "MD - Manutenção por Condição")]
    Md,
    /// Predictive inspection
    #[serde(rename = "IP", alias = "IP - Inspeção Preditiva")]
    Ip,
    /// Improvements
    #[serde(rename = "ML", alias = "ML - Melhorias")]
    Ml,
    /// Overhaul
    #[serde(rename = "RE", alias = "RE - Reforma")]
    Re,
}

impl fmt::Display for WorkOrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkOrderCategory::Mc => "MC Corrective",
            WorkOrderCategory::Mt => "MT Preventive",
            WorkOrderCategory::Im => "IM Inspection and measurement",
            WorkOrderCategory::Md => "MD Condition-based",
            WorkOrderCategory::Ip => "IP Predictive inspection",
            WorkOrderCategory::Ml => "ML Improvement",
            WorkOrderCategory::Re => "RE Overhaul",
        };
        write!(f, "{label}")
    }
}

impl FromStr for WorkOrderCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match leading_code(s).as_str() {
            "MC" => Ok(WorkOrderCategory::Mc),
            "MT" => Ok(WorkOrderCategory::Mt),
            "IM" => Ok(WorkOrderCategory::Im),
            "MD" => Ok(WorkOrderCategory::Md),
            "IP" => Ok(WorkOrderCategory::Ip),
            "ML" => Ok(WorkOrderCategory::Ml),
            "RE" => Ok(WorkOrderCategory::Re),
            _ => Err(DomainError::UnknownValue {
                kind: "work order category",
                value: s.to_string(),
            }),
        }
    }
}

/// Scheduling priority. `A` is the most urgent, `Z` is the reserve backlog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Priority {
    #[serde(alias = "A - Urgência (24h)")]
    A,
    #[serde(alias = "B - Data Fixa (72h)")]
    B,
    #[default]
    #[serde(alias = "C - Baixa/Rotina")]
    C,
    #[serde(alias = "Z - Carteira Reserva")]
    Z,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::A => "A urgent (24h)",
            Priority::B => "B fixed date (72h)",
            Priority::C => "C routine",
            Priority::Z => "Z reserve",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match leading_code(s).as_str() {
            "A" => Ok(Priority::A),
            "B" => Ok(Priority::B),
            "C" => Ok(Priority::C),
            "Z" => Ok(Priority::Z),
            _ => Err(DomainError::UnknownValue {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Planning state of a work order, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    #[serde(alias = "Backlog (Aguardando Planejamento)")]
    Backlog,
    #[serde(alias = "Em Planejamento")]
    Planning,
    #[serde(alias = "Aguardando Material")]
    WaitingMaterial,
    #[serde(alias = "Liberado para Programação")]
    Ready,
    #[serde(alias = "Programado")]
    Programmed,
    #[serde(alias = "Em Execução")]
    Executing,
    #[serde(alias = "Encerrado")]
    Finished,
    #[serde(alias = "Cancelado")]
    Canceled,
}

impl WorkOrderStatus {
    /// Finished and canceled orders take no further planning.
    pub fn is_closed(&self) -> bool {
        matches!(self, WorkOrderStatus::Finished | WorkOrderStatus::Canceled)
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkOrderStatus::Backlog => "Backlog",
            WorkOrderStatus::Planning => "Planning",
            WorkOrderStatus::WaitingMaterial => "Waiting for material",
            WorkOrderStatus::Ready => "Ready for scheduling",
            WorkOrderStatus::Programmed => "Programmed",
            WorkOrderStatus::Executing => "Executing",
            WorkOrderStatus::Finished => "Finished",
            WorkOrderStatus::Canceled => "Canceled",
        };
        write!(f, "{label}")
    }
}

impl FromStr for WorkOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "backlog" => Ok(WorkOrderStatus::Backlog),
            "planning" => Ok(WorkOrderStatus::Planning),
            "waiting_material" | "waiting_for_material" => Ok(WorkOrderStatus::WaitingMaterial),
            "ready" => Ok(WorkOrderStatus::Ready),
            "programmed" | "scheduled" => Ok(WorkOrderStatus::Programmed),
            "executing" => Ok(WorkOrderStatus::Executing),
            "finished" | "closed" => Ok(WorkOrderStatus::Finished),
            "canceled" | "cancelled" => Ok(WorkOrderStatus::Canceled),
            _ => Err(DomainError::UnknownValue {
                kind: "work order status",
                value: s.to_string(),
            }),
        }
    }
}

/// One step of the job plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTask {
    pub id: String,
    pub sequence: u32,
    pub description: String,
    pub duration_minutes: u32,
    pub people_required: u32,
    /// Trade, e.g. mechanic or electrician
    pub specialty: String,
}

/// Spare part or consumable reserved for the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMaterial {
    pub id: String,
    pub code: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub stock_status: String,
    #[serde(default)]
    pub requisition_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requisition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSafety {
    pub loto_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loto_points: Vec<String>,
    #[serde(default)]
    pub permits_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub service_request_id: String,
    pub title: String,
    pub machine_name: String,
    pub sector: Sector,
    #[serde(default)]
    pub work_center: String,
    #[serde(rename = "type")]
    pub kind: WorkOrderType,
    pub category: WorkOrderCategory,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub creation_date: String,
    pub base_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_date: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Responsible planner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub tasks: Vec<OrderTask>,
    #[serde(default)]
    pub materials: Vec<OrderMaterial>,
    #[serde(default)]
    pub safety: OrderSafety,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<f64>,
}

impl WorkOrder {
    /// A fresh service request against `node`: immediate corrective,
    /// routine priority, waiting in the backlog. Created and based on `date`.
    pub fn service_request(
        id: impl Into<String>,
        service_request_id: impl Into<String>,
        node: &EquipmentNode,
        title: &str,
        description: &str,
        date: impl Into<String>,
    ) -> Self {
        let date = date.into();
        Self {
            id: id.into(),
            service_request_id: service_request_id.into(),
            title: non_blank(Some(title)).unwrap_or_else(|| DEFAULT_REQUEST_TITLE.to_string()),
            machine_name: node.name.clone(),
            sector: node.sector,
            work_center: String::new(),
            kind: WorkOrderType::C010,
            category: WorkOrderCategory::Mc,
            priority: Priority::C,
            status: WorkOrderStatus::Backlog,
            creation_date: date.clone(),
            base_date: date,
            limit_date: None,
            description: description.trim().to_string(),
            assigned_to: None,
            tasks: Vec::new(),
            materials: Vec::new(),
            safety: OrderSafety::default(),
            total_estimated_time: None,
            total_estimated_cost: None,
        }
    }

    /// Planned duration: the stored total, or the sum over tasks.
    pub fn estimated_minutes(&self) -> u32 {
        self.total_estimated_time
            .unwrap_or_else(|| self.tasks.iter().map(|t| t.duration_minutes).sum())
    }
}

impl Keyed for WorkOrder {
    fn key(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for WorkOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.title)
    }
}

/// Fields a planner may change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderUpdate {
    pub title: Option<String>,
    pub work_center: Option<String>,
    pub kind: Option<WorkOrderType>,
    pub category: Option<WorkOrderCategory>,
    pub priority: Option<Priority>,
    pub status: Option<WorkOrderStatus>,
    pub base_date: Option<String>,
    pub limit_date: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

impl WorkOrderUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `current`. Id, request id, machine and job plan are kept.
    pub fn apply_to(&self, current: &WorkOrder) -> Result<WorkOrder, DomainError> {
        let title = match &self.title {
            Some(title) if title.trim().is_empty() => return Err(DomainError::EmptyName),
            Some(title) => title.trim().to_string(),
            None => current.title.clone(),
        };
        Ok(WorkOrder {
            title,
            work_center: self
                .work_center
                .as_ref()
                .map(|w| w.trim().to_string())
                .unwrap_or_else(|| current.work_center.clone()),
            kind: self.kind.unwrap_or(current.kind),
            category: self.category.unwrap_or(current.category),
            priority: self.priority.unwrap_or(current.priority),
            status: self.status.unwrap_or(current.status),
            base_date: self
                .base_date
                .clone()
                .unwrap_or_else(|| current.base_date.clone()),
            // An explicit blank value clears these
            limit_date: match &self.limit_date {
                Some(date) => non_blank(Some(date.as_str())),
                None => current.limit_date.clone(),
            },
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            assigned_to: match &self.assigned_to {
                Some(who) => non_blank(Some(who.as_str())),
                None => current.assigned_to.clone(),
            },
            ..current.clone()
        })
    }
}
