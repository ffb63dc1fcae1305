//! Report engine: walks spans newest first, fetches, classifies, folds.
//!
//! Any fetch failure aborts the whole call; no partial payload escapes.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::aggregate::{count_created, fold, freeze};
use crate::classify::Classifier;
use crate::config::ReportConfig;
use crate::error::{ConfigError, FetchError, FetchOp, ReportError};
use crate::keyword::tally_keywords;
use crate::model::{
    AnalysisBasis, AnalysisStats, DailyStats, DetailRecord, DigestKind, KeywordStats,
    SummaryRecord, Ticket, TrendStats,
};
use crate::render::Renderer;
use crate::source::TicketSource;
use crate::window::{Span, WindowKind, generate};

fn fetched<T>(operation: FetchOp, span: &Span, result: Result<T, FetchError>) -> Result<T, ReportError> {
    result.map_err(|source| ReportError::Fetch {
        operation,
        span: span.label(),
        source,
    })
}

pub struct ReportEngine<S> {
    source: S,
    classifier: Classifier,
    tz: FixedOffset,
    primary_team: String,
    keyword_query: String,
}

impl<S: TicketSource> ReportEngine<S> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid timezone offset or service id
    /// pattern.
    pub fn new(source: S, config: &ReportConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            classifier: Classifier::new(&config.taxonomy)?,
            tz: config.report.offset()?,
            primary_team: config.report.primary_team.clone(),
            keyword_query: config.report.keyword_query.clone(),
        })
    }

    #[must_use]
    pub const fn tz(&self) -> FixedOffset {
        self.tz
    }

    /// Renderer sharing this engine's timezone and primary team.
    #[must_use]
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.tz, self.primary_team.clone())
    }

    /// Open tickets not updated during the last `day_ago` days.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::OutOfRange`] if the cutoff falls before the
    /// representable calendar, or [`ReportError::Fetch`] if the source fails.
    #[instrument(skip(self))]
    pub fn daily(&self, now: DateTime<Utc>, day_ago: u32) -> Result<DailyStats, ReportError> {
        let until = TimeDelta::try_days(i64::from(day_ago))
            .and_then(|back| now.checked_sub_signed(back))
            .ok_or_else(|| ReportError::OutOfRange(format!("{day_ago} days before {now}")))?;
        let cutoff = Span::cutoff(until.with_timezone(&self.tz));
        let tickets = fetched(FetchOp::OpenStale, &cutoff, self.source.open_stale(until))?;
        debug!(span = %cutoff, tickets = tickets.len(), "fetched stale tickets");

        let stats = self.digest(DigestKind::Stale { days: day_ago }, cutoff, &tickets);
        info!(total = stats.total, "daily digest ready");
        Ok(stats)
    }

    /// Every currently open ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Fetch`] if the source fails.
    #[instrument(skip(self))]
    pub fn backlog(&self, now: DateTime<Utc>) -> Result<DailyStats, ReportError> {
        let cutoff = Span::cutoff(now.with_timezone(&self.tz));
        let tickets = fetched(FetchOp::OpenAll, &cutoff, self.source.open_all())?;
        debug!(span = %cutoff, tickets = tickets.len(), "fetched open tickets");

        let stats = self.digest(DigestKind::Backlog, cutoff, &tickets);
        info!(total = stats.total, "backlog digest ready");
        Ok(stats)
    }

    fn digest(&self, digest: DigestKind, cutoff: Span, tickets: &[Ticket]) -> DailyStats {
        let details: Vec<DetailRecord> = tickets
            .iter()
            .map(|t| self.classifier.classify(t, &cutoff))
            .collect();

        let mut stats = DailyStats {
            digest,
            cutoff,
            total: details.len(),
            urgency_high: 0,
            urgency_low: 0,
            teams: BTreeMap::new(),
            details: Vec::new(),
        };
        for d in &details {
            match d.urgency {
                Some(u) if u.is_elevated() => stats.urgency_high += 1,
                Some(_) => stats.urgency_low += 1,
                None => {}
            }
            if let Some(team) = &d.team {
                *stats.teams.entry(team.clone()).or_insert(0) += 1;
            }
        }
        stats.details = details;
        stats
    }

    /// Per-span trend summaries over `count` windows ending at `origin`.
    ///
    /// Closed tickets the source hands back with a `closed_at` outside the
    /// span are dropped from both the summary and the details.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::OutOfRange`] if the windows leave the calendar,
    /// or [`ReportError::Fetch`] for the first span whose fetch fails.
    #[instrument(skip(self))]
    pub fn trend(
        &self,
        origin: NaiveDate,
        kind: WindowKind,
        count: usize,
    ) -> Result<TrendStats, ReportError> {
        let mut summaries = BTreeMap::new();
        let mut details = Vec::new();

        for span in generate(origin, kind, count, self.tz)? {
            let (since, until) = (span.since_utc(), span.until_utc());
            let created = fetched(
                FetchOp::Created,
                &span,
                self.source.created_in_window(since, until),
            )?;
            let closed = fetched(
                FetchOp::Closed,
                &span,
                self.source.closed_in_window(since, until),
            )?;
            debug!(%span, created = created.len(), closed = closed.len(), "fetched span");

            let mut summary = SummaryRecord::new(span);
            for ticket in &created {
                count_created(ticket.created_at, &mut summary);
            }
            for ticket in &closed {
                let record = self.classifier.classify(ticket, &span);
                if !record.closed_at.is_some_and(|at| span.contains(at)) {
                    debug!(%span, id = ticket.id, "skipping ticket closed outside span");
                    continue;
                }
                fold(&record, &mut summary);
                details.push(record);
            }
            freeze(&mut summary);
            summaries.insert(span, summary);
        }

        info!(spans = summaries.len(), details = details.len(), "trend report ready");
        Ok(TrendStats {
            kind,
            summaries,
            details,
        })
    }

    /// Flat per-ticket export; `basis` picks which instant selects tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::OutOfRange`] if the windows leave the calendar,
    /// or [`ReportError::Fetch`] for the first span whose fetch fails.
    #[instrument(skip(self))]
    pub fn analysis(
        &self,
        origin: NaiveDate,
        basis: AnalysisBasis,
        kind: WindowKind,
        count: usize,
    ) -> Result<AnalysisStats, ReportError> {
        let mut details = Vec::new();

        for span in generate(origin, kind, count, self.tz)? {
            let (since, until) = (span.since_utc(), span.until_utc());
            let tickets = match basis {
                AnalysisBasis::Created => fetched(
                    FetchOp::Created,
                    &span,
                    self.source.created_in_window(since, until),
                )?,
                AnalysisBasis::Closed => fetched(
                    FetchOp::Closed,
                    &span,
                    self.source.closed_in_window(since, until),
                )?,
                AnalysisBasis::Updated => fetched(
                    FetchOp::Updated,
                    &span,
                    self.source.updated_in_window(since, until),
                )?,
            };
            debug!(%span, tickets = tickets.len(), "fetched span");
            details.extend(tickets.iter().map(|t| self.classifier.classify(t, &span)));
        }

        info!(details = details.len(), "analysis export ready");
        Ok(AnalysisStats { basis, details })
    }

    /// Keyword-occurrence matrix over closed tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::OutOfRange`] if the windows leave the calendar,
    /// or [`ReportError::Fetch`] if the vocabulary lookup or any span fetch
    /// fails.
    #[instrument(skip(self))]
    pub fn keywords(
        &self,
        origin: NaiveDate,
        kind: WindowKind,
        count: usize,
    ) -> Result<KeywordStats, ReportError> {
        let spans = generate(origin, kind, count, self.tz)?;
        let mut summaries = BTreeMap::new();
        let (Some(newest), Some(oldest)) = (spans.first(), spans.last()) else {
            return Ok(KeywordStats { summaries });
        };

        let range = Span::new(oldest.since(), newest.until());
        let vocabulary = fetched(
            FetchOp::KeywordVocabulary,
            &range,
            self.source.keyword_vocabulary(&self.keyword_query),
        )?;
        debug!(keywords = vocabulary.len(), "fetched vocabulary");

        let escalation = self.classifier.taxonomy().escalation_label();
        for span in &spans {
            let mut closed = fetched(
                FetchOp::Closed,
                span,
                self.source
                    .closed_in_window(span.since_utc(), span.until_utc()),
            )?;
            debug!(%span, closed = closed.len(), "fetched span");
            closed.retain(|t| t.closed_at.is_some_and(|at| span.contains(at)));
            summaries.insert(*span, tally_keywords(*span, &closed, &vocabulary, escalation));
        }

        info!(spans = summaries.len(), "keyword report ready");
        Ok(KeywordStats { summaries })
    }
}
