use std::fmt::Write as _;

use super::{Renderer, urgency_cell};
use crate::model::{DailyStats, DigestKind};

impl Renderer {
    /// Plain-text digest of open tickets, oldest first.
    #[must_use]
    pub fn daily(&self, stats: &DailyStats) -> String {
        let mut out = String::new();

        let total_label = match stats.digest {
            DigestKind::Stale { days } => {
                let _ = writeln!(out, "■ *{days}日間* 以上更新がなかったチケット一覧");
                "総未更新チケット数"
            }
            DigestKind::Backlog => {
                let _ = writeln!(out, "■ 現在オープン中のチケット一覧");
                "総オープンチケット数"
            }
        };

        let _ = writeln!(out, "=== サマリー ===");
        let _ = writeln!(out, "{total_label}: {} 件", stats.total);
        let _ = writeln!(out, "    緊急度:高・中: {} 件", stats.urgency_high);
        let _ = writeln!(out, "    緊急度:低: {} 件", stats.urgency_low);
        for (team, count) in &stats.teams {
            let _ = writeln!(out, "    {team}: {count} 件");
        }
        let _ = writeln!(out, "=== 詳細 ===");

        let mut details: Vec<_> = stats.details.iter().collect();
        details.sort_by_key(|d| d.created_at);
        for d in details {
            let _ = writeln!(
                out,
                "- <{}|{}> 経過時間:{}d{}h 緊急度:{} {}",
                d.url,
                d.title,
                d.open_hours / 24,
                d.open_hours % 24,
                urgency_cell(d.urgency),
                d.assignee
            );
        }
        out
    }
}
