//! Ticket snapshots and the records derived from them.

mod record;
mod stats;
mod ticket;

pub use record::{
    DetailRecord, KeywordCount, KeywordSummary, ScoreBucket, ScoreHistogram, SummaryRecord,
};
pub use stats::{AnalysisBasis, AnalysisStats, DailyStats, DigestKind, KeywordStats, TrendStats};
pub use ticket::{Genre, KeywordLabel, ParseEnumError, Ticket, TicketState, Urgency};
