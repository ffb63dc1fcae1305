use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use super::{DetailRecord, KeywordSummary, ParseEnumError, SummaryRecord};
use crate::window::{Span, WindowKind};

/// Which digest a [`DailyStats`] payload was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DigestKind {
    /// Open tickets not updated for `days` days.
    Stale { days: u32 },
    /// Every open ticket.
    Backlog,
}

/// Payload of the daily stale digest and the backlog digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub digest: DigestKind,
    pub cutoff: Span,
    pub total: usize,
    pub urgency_high: usize,
    pub urgency_low: usize,
    pub teams: BTreeMap<String, usize>,
    pub details: Vec<DetailRecord>,
}

/// Payload of the weekly/monthly trend table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStats {
    pub kind: WindowKind,
    pub summaries: BTreeMap<Span, SummaryRecord>,
    pub details: Vec<DetailRecord>,
}

/// Which instant selects the tickets of an analysis export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisBasis {
    #[default]
    Created,
    Closed,
    Updated,
}

impl AnalysisBasis {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Closed => "closed",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for AnalysisBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisBasis {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "closed" => Ok(Self::Closed),
            "updated" => Ok(Self::Updated),
            _ => Err(ParseEnumError {
                expected: "analysis basis",
                got: s.to_string(),
            }),
        }
    }
}

/// Payload of the per-ticket analysis export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub basis: AnalysisBasis,
    pub details: Vec<DetailRecord>,
}

/// Payload of the keyword-occurrence tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordStats {
    pub summaries: BTreeMap<Span, KeywordSummary>,
}
