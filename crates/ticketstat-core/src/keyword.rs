//! Keyword-occurrence matrix.

use std::collections::BTreeMap;

use crate::model::{KeywordCount, KeywordLabel, KeywordSummary, Ticket};
use crate::window::Span;

/// Count closed tickets per vocabulary label for one span.
///
/// Every vocabulary label gets a row, including those with no occurrences.
/// Labels match exactly; `escalation` counts the subset that also carries
/// `escalation_label`.
#[must_use]
pub fn tally_keywords(
    span: Span,
    closed: &[Ticket],
    vocabulary: &[KeywordLabel],
    escalation_label: &str,
) -> KeywordSummary {
    let mut counts: BTreeMap<String, KeywordCount> = vocabulary
        .iter()
        .map(|label| (label.name.clone(), KeywordCount::default()))
        .collect();

    for ticket in closed {
        let escalated = ticket.has_label(escalation_label);
        for (name, count) in &mut counts {
            if ticket.has_label(name) {
                count.all += 1;
                if escalated {
                    count.escalation += 1;
                }
            }
        }
    }

    KeywordSummary { span, counts }
}
