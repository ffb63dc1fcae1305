use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::Renderer;
use crate::model::{KeywordCount, KeywordStats};

impl Renderer {
    /// Two stacked Markdown tables: every occurrence, then escalated
    /// occurrences only. Rows are keyword labels in lexicographic order.
    #[must_use]
    pub fn keywords(&self, stats: &KeywordStats) -> String {
        let mut out = String::new();
        keyword_table(&mut out, "## サマリー(全体) ", stats, |c| c.all);
        keyword_table(&mut out, "## サマリー(Escalationのみ計上) ", stats, |c| {
            c.escalation
        });
        out
    }
}

fn keyword_table(
    out: &mut String,
    title: &str,
    stats: &KeywordStats,
    pick: fn(&KeywordCount) -> usize,
) {
    let keywords: BTreeSet<&String> = stats
        .summaries
        .values()
        .flat_map(|s| s.counts.keys())
        .collect();
    let spans: Vec<String> = stats.summaries.keys().map(ToString::to_string).collect();

    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "|項目|{}|Total|", spans.join("|"));
    out.push_str("|----|");
    for _ in &spans {
        out.push_str("----|");
    }
    out.push_str("----|\n");

    for keyword in keywords {
        out.push('|');
        out.push_str(keyword);
        let mut total = 0;
        for summary in stats.summaries.values() {
            let n = summary.counts.get(keyword).map_or(0, pick);
            total += n;
            let _ = write!(out, "|{n}");
        }
        let _ = writeln!(out, "|{total}|");
    }
}
