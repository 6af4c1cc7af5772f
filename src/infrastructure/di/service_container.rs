//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    AnalysisService, BreakdownService, ForestService, LifespanService, PlanService,
    ScheduleService, WorkOrderService,
};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, Confirmer, FileSystem, RealCommandRunner, RealFileSystem, TerminalConfirmer,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Asks before destructive operations unless `--yes` is given
    pub confirmer: Arc<dyn Confirmer>,

    pub forest: ForestService,
    pub plan: PlanService,
    pub lifespan: LifespanService,
    pub analysis: Arc<AnalysisService>,
    pub breakdown: BreakdownService,
    pub work_orders: WorkOrderService,
    pub schedule: ScheduleService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(TerminalConfirmer),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let settings = Arc::new(settings);
        let analysis = Arc::new(AnalysisService::new(cmd, settings.clone()));

        Self {
            forest: ForestService::new(fs.clone(), settings.clone()),
            plan: PlanService::new(settings.clone()),
            lifespan: LifespanService::new(fs.clone(), settings.clone()),
            breakdown: BreakdownService::new(fs.clone(), analysis.clone()),
            work_orders: WorkOrderService::new(fs.clone()),
            schedule: ScheduleService::new(fs),
            analysis,
            settings,
            confirmer,
        }
    }
}
