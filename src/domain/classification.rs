//! Lean color classification of maintenance plan tasks.
//!
//! Criticality, frequency and complexity map onto green, yellow or red. Red
//! tasks need a written standard, yellow tasks need a checklist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::node::normalize_token;
use crate::domain::records::Keyed;

/// Three-step rating used for each classification axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[serde(alias = "Alta")]
    High,
    #[serde(alias = "Média")]
    Medium,
    #[serde(alias = "Baixa")]
    Low,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::High => "High",
            Level::Medium => "Medium",
            Level::Low => "Low",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Level {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "high" | "h" | "alta" => Ok(Level::High),
            "medium" | "m" | "média" | "media" => Ok(Level::Medium),
            "low" | "l" | "baixa" => Ok(Level::Low),
            _ => Err(DomainError::UnknownValue {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeanColor {
    #[serde(alias = "Verde")]
    Green,
    #[serde(alias = "Amarelo")]
    Yellow,
    #[serde(alias = "Vermelho")]
    Red,
}

impl fmt::Display for LeanColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeanColor::Green => "Green",
            LeanColor::Yellow => "Yellow",
            LeanColor::Red => "Red",
        };
        write!(f, "{label}")
    }
}

/// Result of classifying a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskClassification {
    pub color: LeanColor,
    pub standard_required: bool,
    pub checklist_required: bool,
}

impl From<LeanColor> for TaskClassification {
    fn from(color: LeanColor) -> Self {
        Self {
            color,
            standard_required: color == LeanColor::Red,
            checklist_required: color == LeanColor::Yellow,
        }
    }
}

pub fn lean_color(criticality: Level, frequency: Level, complexity: Level) -> LeanColor {
    match (criticality, frequency, complexity) {
        (Level::High, _, Level::High | Level::Medium) => LeanColor::Red,
        (Level::High, _, Level::Low) => LeanColor::Yellow,
        (Level::Medium, _, Level::High) => LeanColor::Yellow,
        (Level::Medium, Level::High, _) => LeanColor::Yellow,
        (Level::Medium, _, _) => LeanColor::Green,
        (Level::Low, _, Level::High) => LeanColor::Yellow,
        (Level::Low, _, _) => LeanColor::Green,
    }
}

pub fn classify(criticality: Level, frequency: Level, complexity: Level) -> TaskClassification {
    lean_color(criticality, frequency, complexity).into()
}

/// Written standard reference, `AREA-SERVICE-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StandardCode {
    pub area: String,
    pub service: String,
    pub sequence: u16,
}

impl fmt::Display for StandardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:04}", self.area, self.service, self.sequence)
    }
}

/// A task inside a maintenance plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    pub id: String,
    pub sequence: u32,
    pub description: String,
    #[serde(alias = "criticity")]
    pub criticality: Level,
    pub frequency: Level,
    pub complexity: Level,
    pub lean_color: LeanColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_code: Option<String>,
    #[serde(default)]
    pub checklist_required: bool,
}

impl Keyed for PlanTask {
    fn key(&self) -> &str {
        &self.id
    }
}
