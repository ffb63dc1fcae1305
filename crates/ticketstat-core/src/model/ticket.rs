use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle state reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    Open,
    Closed,
}

impl TicketState {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Immutable ticket snapshot as handed over by a [`crate::source::TicketSource`].
///
/// `closed_at` is optional on the wire but mandatory for closed tickets; the
/// classifier treats a closed ticket without it as a broken input contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub state: TicketState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    pub comments: u32,
}

impl Ticket {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == TicketState::Closed
    }

    /// Exact label membership.
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }
}

/// A label returned by a vocabulary query.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeywordLabel {
    pub name: String,
}

impl KeywordLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Urgency as carried by the `緊急度` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Mid,
    Low,
}

impl Urgency {
    /// Display token used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Mid => "中",
            Self::Low => "低",
        }
    }

    /// High and mid urgency are reported together.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Mid)
    }
}

/// Inquiry genre carried by `genre:` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    NormalInquiry,
    Request,
    Incident,
    LogSurvey,
    ImpactSurvey,
    SpecSurvey,
}

impl Genre {
    pub const ALL: [Self; 6] = [
        Self::NormalInquiry,
        Self::Request,
        Self::Incident,
        Self::LogSurvey,
        Self::ImpactSurvey,
        Self::SpecSurvey,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::NormalInquiry => "normal-inquiry",
            Self::Request => "request",
            Self::Incident => "incident",
            Self::LogSurvey => "log-survey",
            Self::ImpactSurvey => "impact-survey",
            Self::SpecSurvey => "spec-survey",
        }
    }

    /// The label text after the `genre:` prefix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NormalInquiry => "通常問合せ",
            Self::Request => "要望",
            Self::Incident => "サービス障害",
            Self::LogSurvey => "ログ調査",
            Self::ImpactSurvey => "影響調査",
            Self::SpecSurvey => "仕様調査",
        }
    }

    /// Genres whose escalations are counted separately.
    #[must_use]
    pub const fn tracks_escalation(self) -> bool {
        matches!(self, Self::NormalInquiry | Self::Request | Self::Incident)
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for TicketState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "state",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Genre {
    type Err = ParseEnumError;

    /// Accepts either the slug (`request`) or the label text (`要望`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = normalize(trimmed);
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == normalized || genre.label() == trimmed)
            .ok_or_else(|| ParseEnumError {
                expected: "genre",
                got: s.to_string(),
            })
    }
}
