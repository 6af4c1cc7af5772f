//! Component lifespan tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::node::Sector;
use crate::domain::records::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifespanStatus {
    Ok,
    #[serde(alias = "Atenção")]
    Warning,
    #[serde(alias = "Crítico")]
    Critical,
    #[serde(alias = "Excedido")]
    Exceeded,
}

impl fmt::Display for LifespanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifespanStatus::Ok => "OK",
            LifespanStatus::Warning => "Warning",
            LifespanStatus::Critical => "Critical",
            LifespanStatus::Exceeded => "Exceeded",
        };
        write!(f, "{label}")
    }
}

/// Usage percentages at which a component turns Warning and Critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifespanThresholds {
    pub warning_percent: f64,
    pub critical_percent: f64,
}

impl Default for LifespanThresholds {
    fn default() -> Self {
        Self {
            warning_percent: 70.0,
            critical_percent: 85.0,
        }
    }
}

/// Status for `current` usage out of `max`. A non-positive `max` counts as
/// exceeded once anything has been used.
pub fn lifespan_status(current: f64, max: f64, thresholds: &LifespanThresholds) -> LifespanStatus {
    if max <= 0.0 {
        return if current > 0.0 {
            LifespanStatus::Exceeded
        } else {
            LifespanStatus::Ok
        };
    }
    let percent = current / max * 100.0;
    if percent >= 100.0 {
        LifespanStatus::Exceeded
    } else if percent >= thresholds.critical_percent {
        LifespanStatus::Critical
    } else if percent >= thresholds.warning_percent {
        LifespanStatus::Warning
    } else {
        LifespanStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifespanUnit {
    #[serde(alias = "Horas")]
    Hours,
    #[serde(alias = "Ciclos")]
    Cycles,
}

impl fmt::Display for LifespanUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifespanUnit::Hours => write!(f, "h"),
            LifespanUnit::Cycles => write!(f, "cycles"),
        }
    }
}

/// A component exchange recorded in the lifespan history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifespanHistoryEntry {
    pub date: String,
    pub reading_at_exchange: f64,
    pub reason: String,
    pub technician: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLifespan {
    pub id: String,
    pub machine: String,
    pub component: String,
    pub sector: Sector,
    pub install_date: String,
    #[serde(alias = "maxLifeHours")]
    pub max_life: f64,
    #[serde(alias = "currentHours")]
    pub current: f64,
    pub last_reading_date: String,
    pub unit: LifespanUnit,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<LifespanHistoryEntry>,
}

impl ComponentLifespan {
    pub fn remaining(&self) -> f64 {
        self.max_life - self.current
    }

    /// Usage in percent, capped at 100 for display.
    pub fn usage_percent(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 100.0;
        }
        (self.current / self.max_life * 100.0).min(100.0)
    }

    pub fn status(&self, thresholds: &LifespanThresholds) -> LifespanStatus {
        lifespan_status(self.current, self.max_life, thresholds)
    }

    pub fn with_reading(&self, value: f64, date: impl Into<String>) -> Self {
        Self {
            current: value,
            last_reading_date: date.into(),
            ..self.clone()
        }
    }
}

impl Keyed for ComponentLifespan {
    fn key(&self) -> &str {
        &self.id
    }
}
