use std::fmt::Write as _;

use super::{Renderer, text_cell, urgency_cell};
use crate::model::AnalysisStats;

const HEADER: &str = "期間,Title,起票日,クローズ日,ステータス,担当チーム,担当アサイン,緊急度,問い合わせ種別,エスカレ有無,コメント数,経過時間,Keywordラベル,URL";

impl Renderer {
    /// Comma-separated export, one row per record by creation instant.
    ///
    /// Fields are written verbatim: a title containing a comma shifts the
    /// remaining columns.
    #[must_use]
    pub fn analysis(&self, stats: &AnalysisStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{HEADER}");

        let mut details: Vec<_> = stats.details.iter().collect();
        details.sort_by_key(|d| d.created_at);
        for d in details {
            let closed = d.closed_at.map(|at| self.date(at)).unwrap_or_default();
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                d.span,
                d.title,
                self.date(d.created_at),
                closed,
                d.state,
                text_cell(d.team.as_ref()),
                d.assignee,
                urgency_cell(d.urgency),
                text_cell(d.genre.as_ref()),
                d.escalation,
                d.comments,
                d.open_hours,
                d.keywords.join(" "),
                d.url
            );
        }
        out
    }
}
