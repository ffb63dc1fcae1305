use std::fmt::Write as _;

use super::{Renderer, text_cell, urgency_cell};
use crate::aggregate::resolution_percentage;
use crate::model::{Genre, ScoreBucket, SummaryRecord, TrendStats};

fn percentage_cell(value: f64) -> String {
    if value.abs() < f64::EPSILON {
        "0".to_string()
    } else {
        format!("{value:.1}")
    }
}

impl Renderer {
    /// Markdown trend table, one column per span (oldest first), followed
    /// by the detail bullets.
    #[must_use]
    pub fn trend(&self, stats: &TrendStats) -> String {
        let summaries: Vec<&SummaryRecord> = stats.summaries.values().collect();
        let team = self.primary_team();
        let mut out = String::new();

        let row = |out: &mut String, name: &str, cell: &dyn Fn(&SummaryRecord) -> String| {
            let cells: Vec<String> = summaries.iter().map(|s| cell(*s)).collect();
            let _ = writeln!(out, "|{name}|{}|", cells.join("|"));
        };

        let _ = writeln!(out, "## サマリー ");
        let labels: Vec<String> = stats.summaries.keys().map(ToString::to_string).collect();
        let _ = writeln!(out, "|項目|{}|", labels.join("|"));
        out.push_str("|----|");
        for _ in &summaries {
            out.push_str("----|");
        }
        out.push('\n');

        row(&mut out, "起票件数", &|s| s.num_created.to_string());
        row(&mut out, "クローズ件数", &|s| s.num_closed.to_string());
        row(&mut out, "緊急度:高・中", &|s| s.urgency_high.to_string());
        row(&mut out, "緊急度:低", &|s| s.urgency_low.to_string());
        row(&mut out, "全体エスカレーション件数", &|s| {
            s.escalation_all.to_string()
        });
        row(&mut out, &format!("全体{team}完結率(％)"), &|s| {
            percentage_cell(resolution_percentage(s.escalation_all, s.num_closed))
        });
        row(&mut out, "通常エスカレーション件数", &|s| {
            s.escalation_count(Genre::NormalInquiry).to_string()
        });
        row(&mut out, &format!("通常{team}完結率(％)"), &|s| {
            percentage_cell(resolution_percentage(
                s.escalation_count(Genre::NormalInquiry),
                s.num_closed,
            ))
        });
        for genre in Genre::ALL {
            row(&mut out, &format!("ジャンル:{}件数", genre.label()), &|s| {
                s.genre_count(genre).to_string()
            });
        }
        row(&mut out, "合計スコア", &|s| format!("{:.2}", s.total_score));
        for bucket in ScoreBucket::ALL {
            row(&mut out, &format!("スコア{bucket}"), &|s| {
                s.scores.count(bucket).to_string()
            });
        }
        out.push('\n');

        let _ = writeln!(out, "## 詳細 ");
        let mut details: Vec<_> = stats.details.iter().collect();
        details.sort_by_key(|d| (d.span, d.created_at));
        for d in details {
            let _ = writeln!(
                out,
                "- [{}]({}),{},{},{}/{},comment数:{},経過時間(hour):{},解決フラグ:{},({})",
                d.title,
                d.url,
                urgency_cell(d.urgency),
                text_cell(d.genre.as_ref()),
                text_cell(d.team.as_ref()),
                d.assignee,
                d.comments,
                d.open_hours,
                d.escalation,
                d.span
            );
        }
        out
    }
}
