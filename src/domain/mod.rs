//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod analysis;
pub mod breakdown;
pub mod classification;
pub mod draft;
pub mod error;
pub mod forest;
pub mod lifespan;
pub mod node;
pub mod preventive;
pub mod records;
pub mod work_order;

pub use analysis::{AnalysisRequest, RootCauseReport};
pub use breakdown::{AnalysisStatus, BreakdownRecord, BreakdownUpdate};
pub use classification::{
    classify, lean_color, LeanColor, Level, PlanTask, StandardCode, TaskClassification,
};
pub use draft::{NodeDraft, NodeUpdate, Placement};
pub use error::DomainError;
pub use forest::{matches_term, FlatEntry, Forest};
pub use lifespan::{lifespan_status, ComponentLifespan, LifespanStatus, LifespanThresholds};
pub use node::{CriticalityClass, EquipmentNode, NodeKind, NodeStatus, Sector};
pub use preventive::{Frequency, Month, PreventiveStatus, PreventiveTask};
pub use records::Keyed;
pub use work_order::{
    OrderMaterial, OrderSafety, OrderTask, Priority, WorkOrder, WorkOrderCategory,
    WorkOrderStatus, WorkOrderType, WorkOrderUpdate,
};
