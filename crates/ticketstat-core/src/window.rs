//! Report windows.
//!
//! A report call covers a sequence of non-overlapping [`Span`]s that walk
//! backward in time from an origin date. Weekly spans are fixed 7-day steps;
//! monthly spans follow calendar month boundaries in the configured timezone.

use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::ReportError;
use crate::model::ParseEnumError;

const MAX_PREALLOCATED_SPANS: usize = 1024;

/// Half-open window `[since, until)`.
///
/// Ordering is chronological on `(since, until)`, so a `BTreeMap<Span, _>`
/// iterates oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    since: DateTime<FixedOffset>,
    until: DateTime<FixedOffset>,
}

impl Span {
    /// Build a span; bounds are swapped if given in reverse.
    #[must_use]
    pub fn new(since: DateTime<FixedOffset>, until: DateTime<FixedOffset>) -> Self {
        if until < since {
            Self {
                since: until,
                until: since,
            }
        } else {
            Self { since, until }
        }
    }

    /// Zero-width span pinned at a cutoff instant (daily digest).
    #[must_use]
    pub const fn cutoff(at: DateTime<FixedOffset>) -> Self {
        Self {
            since: at,
            until: at,
        }
    }

    #[must_use]
    pub const fn since(&self) -> DateTime<FixedOffset> {
        self.since
    }

    #[must_use]
    pub const fn until(&self) -> DateTime<FixedOffset> {
        self.until
    }

    #[must_use]
    pub fn since_utc(&self) -> DateTime<Utc> {
        self.since.with_timezone(&Utc)
    }

    #[must_use]
    pub fn until_utc(&self) -> DateTime<Utc> {
        self.until.with_timezone(&Utc)
    }

    #[must_use]
    pub fn is_cutoff(&self) -> bool {
        self.since == self.until
    }

    /// Half-open membership test.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.since && at < self.until
    }

    /// Last calendar day inside the span.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        if self.is_cutoff() {
            return self.until.date_naive();
        }
        (self.until - TimeDelta::nanoseconds(1)).date_naive()
    }

    /// `YYYY-MM-DD~YYYY-MM-DD`, or a single date for a cutoff span.
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_cutoff() {
            return self.since.format("%Y-%m-%d").to_string();
        }
        format!(
            "{}~{}",
            self.since.format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Step size between consecutive spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Weekly,
    Monthly,
}

impl WindowKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "weekly-report" => Ok(Self::Weekly),
            "monthly" | "monthly-report" => Ok(Self::Monthly),
            _ => Err(ParseEnumError {
                expected: "window kind",
                got: s.to_string(),
            }),
        }
    }
}

/// Midnight at the start of `date` in `tz`, or `None` when that instant
/// falls outside the representable range.
#[must_use]
pub fn local_midnight(date: NaiveDate, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(tz.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(utc, tz))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn month_span(first: NaiveDate, tz: FixedOffset) -> Option<Span> {
    let next = first.checked_add_months(Months::new(1))?;
    Some(Span::new(local_midnight(first, tz)?, local_midnight(next, tz)?))
}

fn out_of_range(origin: NaiveDate, kind: WindowKind, count: usize) -> ReportError {
    ReportError::OutOfRange(format!("{count} {kind} spans back from {origin}"))
}

/// Produce `count` spans walking backward from `origin`, newest first.
///
/// Weekly: the newest span ends at the close of the origin day and each
/// step moves both bounds back exactly 7 days. Monthly: the newest span is
/// the calendar month containing the origin; each step moves one month back,
/// rolling the year over below January.
///
/// # Errors
///
/// Returns [`ReportError::OutOfRange`] when a span bound leaves the
/// calendar range chrono can represent.
pub fn generate(
    origin: NaiveDate,
    kind: WindowKind,
    count: usize,
    tz: FixedOffset,
) -> Result<Vec<Span>, ReportError> {
    let overflow = || out_of_range(origin, kind, count);
    let mut spans = Vec::with_capacity(count.min(MAX_PREALLOCATED_SPANS));
    match kind {
        WindowKind::Weekly => {
            let mut until = origin
                .checked_add_days(Days::new(1))
                .and_then(|next| local_midnight(next, tz))
                .ok_or_else(overflow)?;
            for _ in 0..count {
                let since = until
                    .checked_sub_signed(TimeDelta::days(7))
                    .ok_or_else(overflow)?;
                spans.push(Span::new(since, until));
                until = since;
            }
        }
        WindowKind::Monthly => {
            let mut first = first_of_month(origin);
            for _ in 0..count {
                spans.push(month_span(first, tz).ok_or_else(overflow)?);
                first = first.checked_sub_months(Months::new(1)).ok_or_else(overflow)?;
            }
        }
    }
    Ok(spans)
}
