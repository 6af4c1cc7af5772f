//! Preventive schedule: per-month status of each planned task.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::store::{load_json, save_json};
use crate::application::ApplicationResult;
use crate::domain::records::{find_by_key, update_by_key};
use crate::domain::{DomainError, Month, PreventiveStatus, PreventiveTask, Sector};
use crate::infrastructure::traits::FileSystem;

pub struct ScheduleService {
    fs: Arc<dyn FileSystem>,
}

impl ScheduleService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<PreventiveTask>> {
        load_json(self.fs.as_ref(), path)
    }

    pub fn save(&self, path: &Path, tasks: &[PreventiveTask]) -> ApplicationResult<()> {
        save_json(self.fs.as_ref(), path, tasks)
    }

    pub fn view(
        &self,
        tasks: &[PreventiveTask],
        sector: Option<Sector>,
        term: Option<&str>,
    ) -> Vec<PreventiveTask> {
        let term = term.unwrap_or("");
        tasks
            .iter()
            .filter(|t| t.matches(sector, term))
            .cloned()
            .collect()
    }

    #[instrument(level = "debug", skip(self, tasks))]
    pub fn set_status(
        &self,
        tasks: &[PreventiveTask],
        id: &str,
        month: Month,
        status: PreventiveStatus,
    ) -> ApplicationResult<Vec<PreventiveTask>> {
        if find_by_key(tasks, id).is_none() {
            return Err(DomainError::NotFound(id.to_string()).into());
        }
        info!("set_status: {} {} = {}", id, month, status);
        Ok(update_by_key(tasks, id, |task| task.with_status(month, status)))
    }

    /// Step the cell to its next status and report the new one.
    pub fn cycle_status(
        &self,
        tasks: &[PreventiveTask],
        id: &str,
        month: Month,
    ) -> ApplicationResult<(Vec<PreventiveTask>, PreventiveStatus)> {
        let task = find_by_key(tasks, id).ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        let next = task.status_in(month).next();
        Ok((self.set_status(tasks, id, month, next)?, next))
    }
}
