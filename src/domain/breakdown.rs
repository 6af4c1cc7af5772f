//! Breakdown records and their root-cause analysis status.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{AnalysisRequest, RootCauseReport};
use crate::domain::error::DomainError;
use crate::domain::node::Sector;
use crate::domain::records::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    #[serde(alias = "Pendente")]
    Pending,
    #[serde(alias = "Concluída")]
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRecord {
    #[serde(alias = "codigo")]
    pub code: String,
    #[serde(alias = "setor")]
    pub sector: Sector,
    #[serde(alias = "maquina")]
    pub machine: String,
    /// Failure type or macro reason
    #[serde(alias = "motivo")]
    pub reason: String,
    #[serde(alias = "inicio")]
    pub started_at: String,
    #[serde(alias = "fim")]
    pub ended_at: String,
    #[serde(alias = "duracaoMin")]
    pub duration_min: u32,
    #[serde(alias = "servicoSolicitado")]
    pub requested_service: String,
    #[serde(default, alias = "servicoExecutado")]
    pub executed_service: String,
    #[serde(default, alias = "conjunto")]
    pub assembly: String,
    #[serde(default, alias = "executante")]
    pub technician: String,
    #[serde(default, alias = "aiAnalysis", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<RootCauseReport>,
    #[serde(default, alias = "statusAQF")]
    pub analysis_status: AnalysisStatus,
}

impl BreakdownRecord {
    pub fn analysis_request(&self) -> AnalysisRequest {
        let context = format!(
            "Reason: {}. Assembly: {}. Executed service: {}. Duration: {} min.",
            self.reason, self.assembly, self.executed_service, self.duration_min
        );
        AnalysisRequest::new(&self.machine, &self.requested_service, context)
    }

    pub fn with_analysis(&self, report: RootCauseReport) -> Self {
        Self {
            analysis: Some(report),
            analysis_status: AnalysisStatus::Completed,
            ..self.clone()
        }
    }
}

impl Keyed for BreakdownRecord {
    fn key(&self) -> &str {
        &self.code
    }
}

/// Partial correction of a recorded breakdown. `None` keeps the current value.
///
/// The code and any attached analysis are never changed by an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownUpdate {
    pub sector: Option<Sector>,
    pub machine: Option<String>,
    pub reason: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub duration_min: Option<u32>,
    pub requested_service: Option<String>,
    pub executed_service: Option<String>,
    pub assembly: Option<String>,
    pub technician: Option<String>,
}

impl BreakdownUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, current: &BreakdownRecord) -> Result<BreakdownRecord, DomainError> {
        let machine = match &self.machine {
            Some(machine) if machine.trim().is_empty() => return Err(DomainError::EmptyName),
            Some(machine) => machine.trim().to_string(),
            None => current.machine.clone(),
        };
        let pick =
            |value: &Option<String>, old: &String| value.clone().unwrap_or_else(|| old.clone());
        Ok(BreakdownRecord {
            code: current.code.clone(),
            sector: self.sector.unwrap_or(current.sector),
            machine,
            reason: pick(&self.reason, &current.reason),
            started_at: pick(&self.started_at, &current.started_at),
            ended_at: pick(&self.ended_at, &current.ended_at),
            duration_min: self.duration_min.unwrap_or(current.duration_min),
            requested_service: pick(&self.requested_service, &current.requested_service),
            executed_service: pick(&self.executed_service, &current.executed_service),
            assembly: pick(&self.assembly, &current.assembly),
            technician: pick(&self.technician, &current.technician),
            analysis: current.analysis.clone(),
            analysis_status: current.analysis_status,
        })
    }
}
