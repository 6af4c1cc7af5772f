//! Maintenance plan tasks: lean color and written standard codes.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{classify, DomainError, Level, PlanTask, StandardCode, TaskClassification};

pub struct PlanService {
    settings: Arc<Settings>,
}

impl PlanService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn classify(
        &self,
        criticality: Level,
        frequency: Level,
        complexity: Level,
    ) -> TaskClassification {
        classify(criticality, frequency, complexity)
    }

    /// Fresh standard code from the configured area and service codes,
    /// sequence in 1000..=9999.
    pub fn standard_code(&self) -> StandardCode {
        StandardCode {
            area: self.settings.standards.area_code.clone(),
            service: self.settings.standards.service_code.clone(),
            sequence: rand::thread_rng().gen_range(1000..=9999),
        }
    }

    /// Classify and build a plan task. Red tasks get a standard code.
    #[instrument(level = "debug", skip(self, description))]
    pub fn build_task(
        &self,
        sequence: u32,
        description: &str,
        criticality: Level,
        frequency: Level,
        complexity: Level,
    ) -> ApplicationResult<PlanTask> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        let classification = self.classify(criticality, frequency, complexity);
        let standard_code = classification
            .standard_required
            .then(|| self.standard_code().to_string());
        debug!("build_task: {:?} standard={:?}", classification.color, standard_code);

        Ok(PlanTask {
            id: format!("TASK-{sequence:04}"),
            sequence,
            description: description.to_string(),
            criticality,
            frequency,
            complexity,
            lean_color: classification.color,
            standard_code,
            checklist_required: classification.checklist_required,
        })
    }
}
