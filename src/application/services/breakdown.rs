//! Breakdown records and their analyses.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::services::AnalysisService;
use crate::application::store::{load_json, save_json};
use crate::application::ApplicationResult;
use crate::domain::records::{find_by_key, prepend, remove_by_key, replace_by_key};
use crate::domain::{BreakdownRecord, BreakdownUpdate, DomainError, RootCauseReport};
use crate::infrastructure::traits::FileSystem;

pub struct BreakdownService {
    fs: Arc<dyn FileSystem>,
    analysis: Arc<AnalysisService>,
}

impl BreakdownService {
    pub fn new(fs: Arc<dyn FileSystem>, analysis: Arc<AnalysisService>) -> Self {
        Self { fs, analysis }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<BreakdownRecord>> {
        load_json(self.fs.as_ref(), path)
    }

    pub fn save(&self, path: &Path, records: &[BreakdownRecord]) -> ApplicationResult<()> {
        save_json(self.fs.as_ref(), path, records)
    }

    /// Newest record first. Codes must be unique.
    pub fn add(
        &self,
        records: &[BreakdownRecord],
        record: BreakdownRecord,
    ) -> ApplicationResult<Vec<BreakdownRecord>> {
        if find_by_key(records, &record.code).is_some() {
            return Err(DomainError::DuplicateId(record.code).into());
        }
        info!("add breakdown: {}", record.code);
        Ok(prepend(records, record))
    }

    /// Replace the record with the same code, keeping its position.
    pub fn edit(
        &self,
        records: &[BreakdownRecord],
        record: BreakdownRecord,
    ) -> ApplicationResult<Vec<BreakdownRecord>> {
        if find_by_key(records, &record.code).is_none() {
            return Err(DomainError::NotFound(record.code).into());
        }
        info!("edit breakdown: {}", record.code);
        Ok(replace_by_key(records, record))
    }

    /// Merge `update` into the record `code`.
    pub fn update(
        &self,
        records: &[BreakdownRecord],
        code: &str,
        update: &BreakdownUpdate,
    ) -> ApplicationResult<(Vec<BreakdownRecord>, BreakdownRecord)> {
        let current =
            find_by_key(records, code).ok_or_else(|| DomainError::NotFound(code.to_string()))?;
        let edited = update.apply_to(current)?;
        Ok((self.edit(records, edited.clone())?, edited))
    }

    /// Unknown codes leave the list unchanged.
    pub fn delete(&self, records: &[BreakdownRecord], code: &str) -> Vec<BreakdownRecord> {
        remove_by_key(records, code)
    }

    /// Analyze the record `code`, attach the report and mark it completed.
    #[instrument(level = "debug", skip(self, records))]
    pub fn analyze(
        &self,
        records: &[BreakdownRecord],
        code: &str,
    ) -> ApplicationResult<(Vec<BreakdownRecord>, RootCauseReport)> {
        let record =
            find_by_key(records, code).ok_or_else(|| DomainError::NotFound(code.to_string()))?;
        let report = self.analysis.analyze(&record.analysis_request());
        let analyzed = record.with_analysis(report.clone());
        Ok((replace_by_key(records, analyzed), report))
    }
}
