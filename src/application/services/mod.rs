//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, Confirmer)
//! but are themselves concrete structs, not traits.

mod analysis;
mod breakdown;
mod forest;
mod lifespan;
mod plan;
mod schedule;
mod work_order;

pub use analysis::AnalysisService;
pub use breakdown::BreakdownService;
pub use forest::{generate_id, DeleteOutcome, ForestReport, ForestService, MAX_ID_ATTEMPTS};
pub use lifespan::{LifespanService, LifespanSummary, LifespanView, READING_DATE_FORMAT};
pub use plan::PlanService;
pub use schedule::ScheduleService;
pub use work_order::{generate_order_id, WorkOrderService};
