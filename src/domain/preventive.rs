//! Annual preventive maintenance schedule: one task per row, one status per month.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::node::{normalize_token, Sector};
use crate::domain::records::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Jan,
    #[serde(alias = "Fev")]
    Feb,
    Mar,
    #[serde(alias = "Abr")]
    Apr,
    #[serde(alias = "Mai")]
    May,
    Jun,
    Jul,
    #[serde(alias = "Ago")]
    Aug,
    #[serde(alias = "Set")]
    Sep,
    #[serde(alias = "Out")]
    Oct,
    Nov,
    #[serde(alias = "Dez")]
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month for a 1-based number.
    pub fn from_number(n: u32) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize))
            .copied()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Month {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DomainError::UnknownValue {
            kind: "month",
            value: s.to_string(),
        };
        if let Ok(n) = s.trim().parse::<u32>() {
            return Month::from_number(n).ok_or_else(unknown);
        }
        let token = normalize_token(s);
        let prefix: String = token.chars().take(3).collect();
        match prefix.as_str() {
            "jan" => Ok(Month::Jan),
            "feb" | "fev" => Ok(Month::Feb),
            "mar" => Ok(Month::Mar),
            "apr" | "abr" => Ok(Month::Apr),
            "may" | "mai" => Ok(Month::May),
            "jun" => Ok(Month::Jun),
            "jul" => Ok(Month::Jul),
            "aug" | "ago" => Ok(Month::Aug),
            "sep" | "set" => Ok(Month::Sep),
            "oct" | "out" => Ok(Month::Oct),
            "nov" => Ok(Month::Nov),
            "dec" | "dez" => Ok(Month::Dec),
            _ => Err(unknown()),
        }
    }
}

/// State of a task in one month of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreventiveStatus {
    #[default]
    #[serde(alias = "N/A")]
    NotApplicable,
    #[serde(alias = "Programado")]
    Programmed,
    #[serde(alias = "Realizado")]
    Done,
    #[serde(alias = "Atrasado")]
    Late,
    #[serde(alias = "Reprogramado")]
    Rescheduled,
}

impl PreventiveStatus {
    /// Cycle order used when stepping through a cell:
    /// N/A, programmed, done, late, rescheduled, then back to N/A.
    pub const CYCLE: [PreventiveStatus; 5] = [
        PreventiveStatus::NotApplicable,
        PreventiveStatus::Programmed,
        PreventiveStatus::Done,
        PreventiveStatus::Late,
        PreventiveStatus::Rescheduled,
    ];

    pub fn next(&self) -> Self {
        let idx = Self::CYCLE.iter().position(|s| s == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    /// One-character cell for the schedule grid.
    pub fn symbol(&self) -> char {
        match self {
            PreventiveStatus::NotApplicable => '·',
            PreventiveStatus::Programmed => 'P',
            PreventiveStatus::Done => '✓',
            PreventiveStatus::Late => '!',
            PreventiveStatus::Rescheduled => '>',
        }
    }
}

impl fmt::Display for PreventiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreventiveStatus::NotApplicable => "N/A",
            PreventiveStatus::Programmed => "Programmed",
            PreventiveStatus::Done => "Done",
            PreventiveStatus::Late => "Late",
            PreventiveStatus::Rescheduled => "Rescheduled",
        };
        write!(f, "{label}")
    }
}

impl FromStr for PreventiveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "n/a" | "na" | "not_applicable" | "none" => Ok(PreventiveStatus::NotApplicable),
            "programmed" | "scheduled" | "programado" => Ok(PreventiveStatus::Programmed),
            "done" | "realizado" => Ok(PreventiveStatus::Done),
            "late" | "atrasado" => Ok(PreventiveStatus::Late),
            "rescheduled" | "reprogramado" => Ok(PreventiveStatus::Rescheduled),
            _ => Err(DomainError::UnknownValue {
                kind: "preventive status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[serde(alias = "Mensal")]
    Monthly,
    #[serde(alias = "Bimestral")]
    Bimonthly,
    #[serde(alias = "Trimestral")]
    Quarterly,
    #[serde(alias = "Semestral")]
    Semiannual,
    #[serde(alias = "Anual")]
    Annual,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Monthly => "Monthly",
            Frequency::Bimonthly => "Bimonthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Semiannual => "Semiannual",
            Frequency::Annual => "Annual",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreventiveTask {
    pub id: String,
    pub machine: String,
    pub component: String,
    pub task: String,
    pub frequency: Frequency,
    pub sector: Sector,
    /// Months without an entry are N/A
    #[serde(default)]
    pub schedule: BTreeMap<Month, PreventiveStatus>,
    #[serde(default)]
    pub responsible: String,
}

impl PreventiveTask {
    pub fn status_in(&self, month: Month) -> PreventiveStatus {
        self.schedule.get(&month).copied().unwrap_or_default()
    }

    pub fn with_status(&self, month: Month, status: PreventiveStatus) -> Self {
        let mut schedule = self.schedule.clone();
        schedule.insert(month, status);
        Self {
            schedule,
            ..self.clone()
        }
    }

    /// Sector filter plus a case-insensitive term on machine or task.
    /// A blank term matches every task.
    pub fn matches(&self, sector: Option<Sector>, term: &str) -> bool {
        let in_sector = sector.map_or(true, |s| s == self.sector);
        let term = term.trim().to_lowercase();
        in_sector
            && (term.is_empty()
                || self.machine.to_lowercase().contains(&term)
                || self.task.to_lowercase().contains(&term))
    }

    pub fn count(&self, status: PreventiveStatus) -> usize {
        Month::ALL
            .iter()
            .filter(|m| self.status_in(**m) == status)
            .count()
    }
}

impl Keyed for PreventiveTask {
    fn key(&self) -> &str {
        &self.id
    }
}
