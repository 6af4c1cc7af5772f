//! Root-cause analysis through an external analyzer command.
//!
//! The analyzer reads the prompt on stdin and prints one JSON report on
//! stdout. Whatever goes wrong, callers always get a well-formed report.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::config::Settings;
use crate::domain::{AnalysisRequest, RootCauseReport};
use crate::infrastructure::traits::CommandRunner;

pub struct AnalysisService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl AnalysisService {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Sample report without a configured command, fallback report on any
    /// failure of the command.
    #[instrument(level = "debug", skip(self, request), fields(machine = %request.machine))]
    pub fn analyze(&self, request: &AnalysisRequest) -> RootCauseReport {
        let Some(command) = self.settings.analyzer.command.as_deref() else {
            warn!("no analyzer command configured, returning sample report");
            return RootCauseReport::sample();
        };

        match self.run_analyzer(command, &request.prompt()) {
            Ok(report) => report.normalized(),
            Err(message) => {
                error!("analysis failed: {}", message);
                RootCauseReport::fallback()
            }
        }
    }

    fn run_analyzer(&self, command: &str, prompt: &str) -> Result<RootCauseReport, String> {
        let args: Vec<&str> = self.settings.analyzer.args.iter().map(String::as_str).collect();
        debug!("run_analyzer: {} {:?}", command, args);

        let output = self
            .cmd
            .run_with_stdin(command, &args, prompt)
            .map_err(|e| format!("spawn {command}: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{command} exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let body = stdout.trim();
        if body.is_empty() {
            return Err(format!("{command} produced no output"));
        }
        serde_json::from_str(body).map_err(|e| format!("unexpected report shape: {e}"))
    }
}
