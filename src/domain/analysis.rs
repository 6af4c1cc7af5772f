//! Root-cause report for breakdowns (fishbone, five whys, action plan).

use serde::{Deserialize, Serialize};

/// Upper bound for the causal chain of one why-path.
pub const MAX_WHYS: usize = 5;

/// Causes grouped by the fishbone categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fishbone {
    #[serde(alias = "metodo")]
    pub method: String,
    pub material: String,
    #[serde(alias = "maoDeObra")]
    pub manpower: String,
    #[serde(alias = "meioAmbiente")]
    pub environment: String,
    #[serde(alias = "maquina")]
    pub machine: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhyPath {
    pub title: String,
    #[serde(default)]
    pub whys: Vec<String>,
    pub root_cause: String,
}

impl WhyPath {
    fn new(title: &str, whys: &[&str], root_cause: &str) -> Self {
        Self {
            title: title.to_string(),
            whys: whys.iter().map(|w| w.to_string()).collect(),
            root_cause: root_cause.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhyAnalysis {
    pub path1: WhyPath,
    pub path2: WhyPath,
    pub path3: WhyPath,
}

impl WhyAnalysis {
    pub fn paths(&self) -> [&WhyPath; 3] {
        [&self.path1, &self.path2, &self.path3]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub what: String,
    pub who: String,
    pub when: String,
    pub status: String,
}

impl ActionItem {
    fn new(what: &str, who: &str, when: &str, status: &str) -> Self {
        Self {
            what: what.to_string(),
            who: who.to_string(),
            when: when.to_string(),
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseReport {
    #[serde(alias = "ishikawa")]
    pub fishbone: Fishbone,
    pub why_analysis: WhyAnalysis,
    pub conclusion: String,
    #[serde(default)]
    pub action_plan: Vec<ActionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_score: Option<u8>,
}

impl RootCauseReport {
    /// Empty but well-formed report returned whenever an analysis fails.
    pub fn fallback() -> Self {
        Self {
            conclusion: "Analysis could not be generated. Please try again.".to_string(),
            ..Self::default()
        }
    }

    /// Deterministic report used when no analyzer is configured.
    pub fn sample() -> Self {
        Self {
            fishbone: Fishbone {
                method: "Tension and alignment likely incorrect; the operating procedure did not require a measurement.".into(),
                material: "Belt exposed to fatigue from frequent cycles; aftermarket specification uncertain.".into(),
                manpower: "Adjustment made without a tension gauge; acceptance criterion not documented.".into(),
                environment: "No influence (no excessive dust or oil).".into(),
                machine: "Shaft with previous wear; frequent starts causing tension peaks.".into(),
            },
            why_analysis: WhyAnalysis {
                path1: WhyPath::new(
                    "Incorrect setup adjustment",
                    &[
                        "Fatigue rupture from localized load",
                        "Wrong tension or alignment after adjustment",
                        "No mandatory measurement in the procedure",
                        "Operating procedure incomplete",
                    ],
                    "No standardized procedure with mandatory tension measurement.",
                ),
                path2: WhyPath::new(
                    "Frequent starts and stops",
                    &[
                        "Repeated mechanical cycles caused tension peaks",
                        "No soft-start or ramp control",
                    ],
                    "No soft-start control for excessive mechanical cycling.",
                ),
                path3: WhyPath::new(
                    "Shaft and pulley wear",
                    &[
                        "Load concentrated on the contact surface",
                        "Contact surface out of specification from previous wear",
                        "Wear not detected earlier",
                        "Inspection criteria insufficient",
                    ],
                    "Inadequate inspection criteria and no dimensional monitoring.",
                ),
            },
            conclusion: "Belt rupture from inadequate tension and alignment after a setup adjustment, aggravated by frequent starts and prior shaft wear. Determining latent factor: no standardized procedure.".into(),
            action_plan: vec![
                ActionItem::new("Measure and record belt tension after every intervention", "Technicians", "Immediate", "Pending"),
                ActionItem::new(
                    "Provide tension gauge and alignment tool",
                    "Management",
                    "27/12/2025",
                    "Pending",
                ),
                ActionItem::new(
                    "Implement soft-start where applicable",
                    "Engineering",
                    "30/01/2026",
                    "Planned",
                ),
                ActionItem::new(
                    "Recover shafts to original dimensions",
                    "Workshop",
                    "27/12/2025",
                    "Pending",
                ),
            ],
            severity_score: None,
        }
    }

    /// Cut every why-path down to `MAX_WHYS` entries.
    pub fn normalized(mut self) -> Self {
        for path in [
            &mut self.why_analysis.path1,
            &mut self.why_analysis.path2,
            &mut self.why_analysis.path3,
        ] {
            path.whys.truncate(MAX_WHYS);
        }
        self
    }
}

/// Free-text description of an incident to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub machine: String,
    pub description: String,
    pub context: String,
}

impl AnalysisRequest {
    pub fn new(
        machine: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            machine: machine.into(),
            description: description.into(),
            context: context.into(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            r#"Act as a senior reliability engineer and fill in the breakdown and failure analysis form for the event below.

Machine: {machine}
Problem: {description}
Details: {context}

Answer with a single strict JSON object with these fields:
1. fishbone: potential causes split into method, material, manpower, environment, machine.
2. whyAnalysis: three five-whys paths (path1, path2, path3). Each path has a 'title' (primary cause), a 'whys' array and a 'rootCause'.
3. conclusion: final technical summary.
4. actionPlan: array of actions (what, who, when, status).
"#,
            machine = self.machine,
            description = self.description,
            context = self.context,
        )
    }
}
