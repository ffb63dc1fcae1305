use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{Genre, TicketState, Urgency};
use crate::window::Span;

/// Flattened, classified view of one ticket.
///
/// Instants stay in UTC; display dates are derived by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub service_id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub state: TicketState,
    pub span: Span,
    pub team: Option<String>,
    pub urgency: Option<Urgency>,
    pub genre: Option<String>,
    pub escalation: bool,
    pub keywords: Vec<String>,
    pub assignee: String,
    pub comments: u32,
    pub open_hours: u64,
}

impl DetailRecord {
    /// The genre label parsed into a known [`Genre`], if it is one.
    #[must_use]
    pub fn genre_kind(&self) -> Option<Genre> {
        self.genre.as_deref().and_then(|g| g.parse().ok())
    }
}

/// Resolution-speed grade, A fastest through F slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ScoreBucket {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ScoreBucket {
    pub const ALL: [Self; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// Grade an elapsed duration in whole hours.
    ///
    /// Upper bounds are inclusive: 48h (2d), 120h (5d), 240h (10d),
    /// 480h (20d), 720h (30d); anything longer is F.
    #[must_use]
    pub const fn from_hours(hours: u64) -> Self {
        match hours {
            0..=48 => Self::A,
            49..=120 => Self::B,
            121..=240 => Self::C,
            241..=480 => Self::D,
            481..=720 => Self::E,
            _ => Self::F,
        }
    }

    /// Weight used by the total score.
    #[must_use]
    pub const fn weight(self) -> u64 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
            Self::E => 5,
            Self::F => 6,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

impl fmt::Display for ScoreBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of closed tickets per [`ScoreBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreHistogram {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
    pub e: usize,
    pub f: usize,
}

impl ScoreHistogram {
    pub fn record(&mut self, bucket: ScoreBucket) {
        *self.slot_mut(bucket) += 1;
    }

    #[must_use]
    pub const fn count(&self, bucket: ScoreBucket) -> usize {
        match bucket {
            ScoreBucket::A => self.a,
            ScoreBucket::B => self.b,
            ScoreBucket::C => self.c,
            ScoreBucket::D => self.d,
            ScoreBucket::E => self.e,
            ScoreBucket::F => self.f,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        ScoreBucket::ALL.iter().map(|b| self.count(*b)).sum()
    }

    /// `1·A + 2·B + … + 6·F`.
    #[must_use]
    pub fn weighted_sum(&self) -> u64 {
        ScoreBucket::ALL
            .iter()
            .map(|b| b.weight() * self.count(*b) as u64)
            .sum()
    }

    fn slot_mut(&mut self, bucket: ScoreBucket) -> &mut usize {
        match bucket {
            ScoreBucket::A => &mut self.a,
            ScoreBucket::B => &mut self.b,
            ScoreBucket::C => &mut self.c,
            ScoreBucket::D => &mut self.d,
            ScoreBucket::E => &mut self.e,
            ScoreBucket::F => &mut self.f,
        }
    }
}

/// Per-span aggregate counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub span: Span,
    pub num_created: usize,
    pub num_closed: usize,
    pub genres: BTreeMap<Genre, usize>,
    pub escalation_all: usize,
    pub escalation_by_genre: BTreeMap<Genre, usize>,
    pub urgency_high: usize,
    pub urgency_low: usize,
    pub scores: ScoreHistogram,
    pub total_score: f64,
}

impl SummaryRecord {
    #[must_use]
    pub const fn new(span: Span) -> Self {
        Self {
            span,
            num_created: 0,
            num_closed: 0,
            genres: BTreeMap::new(),
            escalation_all: 0,
            escalation_by_genre: BTreeMap::new(),
            urgency_high: 0,
            urgency_low: 0,
            scores: ScoreHistogram {
                a: 0,
                b: 0,
                c: 0,
                d: 0,
                e: 0,
                f: 0,
            },
            total_score: 0.0,
        }
    }

    #[must_use]
    pub fn genre_count(&self, genre: Genre) -> usize {
        self.genres.get(&genre).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn escalation_count(&self, genre: Genre) -> usize {
        self.escalation_by_genre.get(&genre).copied().unwrap_or(0)
    }
}

/// Occurrences of one keyword label within a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub all: usize,
    pub escalation: usize,
}

/// Per-span keyword-occurrence matrix. Rows cover the whole vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSummary {
    pub span: Span,
    pub counts: BTreeMap<String, KeywordCount>,
}
