//! Component lifespan readings and alerts.

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::application::store::{load_json, save_json};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::records::{find_by_key, update_by_key};
use crate::domain::{ComponentLifespan, DomainError, LifespanStatus};
use crate::infrastructure::traits::FileSystem;

/// Reading dates are stored as `dd/mm/YYYY`.
pub const READING_DATE_FORMAT: &str = "%d/%m/%Y";

/// A component together with its computed state.
#[derive(Debug, Clone, PartialEq)]
pub struct LifespanView {
    pub component: ComponentLifespan,
    pub status: LifespanStatus,
    pub usage_percent: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifespanSummary {
    pub warning: usize,
    pub critical: usize,
    pub exceeded: usize,
}

impl LifespanSummary {
    /// Components that need action now.
    pub fn alerts(&self) -> usize {
        self.critical + self.exceeded
    }
}

pub struct LifespanService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl LifespanService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<ComponentLifespan>> {
        load_json(self.fs.as_ref(), path)
    }

    pub fn save(&self, path: &Path, records: &[ComponentLifespan]) -> ApplicationResult<()> {
        save_json(self.fs.as_ref(), path, records)
    }

    pub fn list(&self, records: &[ComponentLifespan]) -> Vec<LifespanView> {
        let thresholds = &self.settings.lifespan;
        records
            .iter()
            .map(|component| LifespanView {
                status: component.status(thresholds),
                usage_percent: component.usage_percent(),
                remaining: component.remaining(),
                component: component.clone(),
            })
            .collect()
    }

    pub fn summary(&self, records: &[ComponentLifespan]) -> LifespanSummary {
        self.list(records)
            .iter()
            .fold(LifespanSummary::default(), |mut acc, view| {
                match view.status {
                    LifespanStatus::Warning => acc.warning += 1,
                    LifespanStatus::Critical => acc.critical += 1,
                    LifespanStatus::Exceeded => acc.exceeded += 1,
                    LifespanStatus::Ok => {}
                }
                acc
            })
    }

    /// Record a new reading taken today.
    pub fn record_reading(
        &self,
        records: &[ComponentLifespan],
        id: &str,
        value: f64,
    ) -> ApplicationResult<Vec<ComponentLifespan>> {
        self.record_reading_on(records, id, value, Local::now().date_naive())
    }

    /// Readings must be finite and non-negative. A rejected reading leaves
    /// the records untouched.
    #[instrument(level = "debug", skip(self, records))]
    pub fn record_reading_on(
        &self,
        records: &[ComponentLifespan],
        id: &str,
        value: f64,
        date: NaiveDate,
    ) -> ApplicationResult<Vec<ComponentLifespan>> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidReading(value.to_string()).into());
        }
        if find_by_key(records, id).is_none() {
            return Err(DomainError::NotFound(id.to_string()).into());
        }
        let date = date.format(READING_DATE_FORMAT).to_string();
        info!("record_reading: {} = {} on {}", id, value, date);
        Ok(update_by_key(records, id, |component| {
            component.with_reading(value, date.clone())
        }))
    }
}
