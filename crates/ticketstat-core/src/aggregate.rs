//! Per-span accumulation of classified tickets into [`SummaryRecord`]s.

use chrono::{DateTime, Utc};

use crate::model::{DetailRecord, ScoreBucket, SummaryRecord};

/// Fold one classified closed ticket into its span's summary.
///
/// Records whose `closed_at` falls outside the summary's span, or that are
/// not closed at all, leave the summary untouched.
pub fn fold(record: &DetailRecord, summary: &mut SummaryRecord) {
    let Some(closed_at) = record.closed_at else {
        return;
    };
    if !summary.span.contains(closed_at) {
        return;
    }

    summary.num_closed += 1;

    let genre = record.genre_kind();
    if let Some(genre) = genre {
        *summary.genres.entry(genre).or_insert(0) += 1;
    }

    if record.escalation {
        summary.escalation_all += 1;
        if let Some(genre) = genre.filter(|g| g.tracks_escalation()) {
            *summary.escalation_by_genre.entry(genre).or_insert(0) += 1;
        }
    }

    match record.urgency {
        Some(urgency) if urgency.is_elevated() => summary.urgency_high += 1,
        Some(_) => summary.urgency_low += 1,
        None => {}
    }

    summary
        .scores
        .record(ScoreBucket::from_hours(record.open_hours));
}

/// Count a ticket created at `created_at` if it falls inside the span.
pub fn count_created(created_at: DateTime<Utc>, summary: &mut SummaryRecord) {
    if summary.span.contains(created_at) {
        summary.num_created += 1;
    }
}

/// Derive the total score: weighted histogram divided by the closed count.
pub fn freeze(summary: &mut SummaryRecord) {
    summary.total_score = if summary.num_closed == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let score = summary.scores.weighted_sum() as f64 / summary.num_closed as f64;
        score
    };
}

/// `subtype / closed * 100`, rounded to one decimal. Zero when either side is.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn resolution_percentage(subtype: usize, closed: usize) -> f64 {
    if subtype == 0 || closed == 0 {
        return 0.0;
    }
    let pct = subtype as f64 / closed as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
