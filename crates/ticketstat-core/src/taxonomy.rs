//! Label taxonomy.
//!
//! Ticket labels are free-form strings. The taxonomy is an ordered table of
//! [`LabelRule`]s; each label is matched against the rules in order and the
//! first matching rule decides what the label means. Within one category the
//! last matching label wins, except keywords, which accumulate.

use serde::Serialize;

use crate::config::TaxonomyConfig;
use crate::model::Urgency;

/// How a rule recognises a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Exact(String),
    Contains(String),
}

impl Pattern {
    fn matches(&self, label: &str) -> bool {
        match self {
            Self::Exact(token) => label == token,
            Self::Contains(fragment) => label.contains(fragment.as_str()),
        }
    }
}

/// Attribute a label contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Urgency(Urgency),
    Team,
    Genre,
    Escalation,
    Keyword,
}

/// How the attribute value is derived from the label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// The category itself carries the value.
    Fixed,
    /// Remove every occurrence of the fragment.
    Strip(String),
}

impl Extractor {
    fn extract(&self, label: &str) -> String {
        match self {
            Self::Fixed => label.to_string(),
            Self::Strip(fragment) if fragment.is_empty() => label.to_string(),
            Self::Strip(fragment) => label.replace(fragment.as_str(), ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    pub pattern: Pattern,
    pub category: Category,
    pub extractor: Extractor,
}

/// Structured attributes derived from one ticket's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelAttributes {
    pub urgency: Option<Urgency>,
    pub team: Option<String>,
    pub genre: Option<String>,
    pub escalation: bool,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    rules: Vec<LabelRule>,
    escalation_label: String,
}

impl Taxonomy {
    /// Build the rule table. Exact urgency and escalation tokens come first
    /// so they are never shadowed by a substring rule.
    #[must_use]
    pub fn from_config(config: &TaxonomyConfig) -> Self {
        let mut rules = Vec::new();

        let urgency_tokens = [
            (Urgency::High, &config.urgency_high),
            (Urgency::Mid, &config.urgency_mid),
            (Urgency::Low, &config.urgency_low),
        ];
        for (urgency, tokens) in urgency_tokens {
            for token in tokens {
                rules.push(LabelRule {
                    pattern: Pattern::Exact(token.clone()),
                    category: Category::Urgency(urgency),
                    extractor: Extractor::Fixed,
                });
            }
        }

        rules.push(LabelRule {
            pattern: Pattern::Exact(config.escalation_label.clone()),
            category: Category::Escalation,
            extractor: Extractor::Fixed,
        });
        rules.push(LabelRule {
            pattern: Pattern::Contains(config.keyword_prefix.clone()),
            category: Category::Keyword,
            extractor: Extractor::Strip(config.keyword_prefix.clone()),
        });
        rules.push(LabelRule {
            pattern: Pattern::Contains(config.genre_prefix.clone()),
            category: Category::Genre,
            extractor: Extractor::Strip(config.genre_prefix.clone()),
        });
        rules.push(LabelRule {
            pattern: Pattern::Contains(config.team_prefix.clone()),
            category: Category::Team,
            extractor: Extractor::Strip(config.team_suffix.clone()),
        });

        Self {
            rules,
            escalation_label: config.escalation_label.clone(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    #[must_use]
    pub fn escalation_label(&self) -> &str {
        &self.escalation_label
    }

    /// First rule matching `label`, if any.
    #[must_use]
    pub fn rule_for(&self, label: &str) -> Option<&LabelRule> {
        self.rules.iter().find(|rule| rule.pattern.matches(label))
    }

    /// Classify a label set in a single pass.
    pub fn apply<'a, I>(&self, labels: I) -> LabelAttributes
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut attrs = LabelAttributes::default();
        for label in labels {
            let Some(rule) = self.rule_for(label) else {
                continue;
            };
            match rule.category {
                Category::Urgency(urgency) => attrs.urgency = Some(urgency),
                Category::Team => attrs.team = Some(rule.extractor.extract(label)),
                Category::Genre => attrs.genre = Some(rule.extractor.extract(label)),
                Category::Escalation => attrs.escalation = true,
                Category::Keyword => attrs.keywords.push(rule.extractor.extract(label)),
            }
        }
        attrs
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::from_config(&TaxonomyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn classifies_every_category() {
        let taxonomy = Taxonomy::default();
        let attrs = taxonomy.apply(&labels(&[
            "PF_Support",
            "緊急度:低",
            "CaaS-A 対応中",
            "Escalation",
            "genre:通常問合せ",
            "keyword:Kubernetes",
            "keyword:Network",
        ]));

        assert_eq!(attrs.urgency, Some(Urgency::Low));
        assert_eq!(attrs.team.as_deref(), Some("CaaS-A"));
        assert_eq!(attrs.genre.as_deref(), Some("通常問合せ"));
        assert!(attrs.escalation);
        assert_eq!(attrs.keywords, vec!["Kubernetes", "Network"]);
    }

    #[test]
    fn both_colon_spellings_map_to_urgency() {
        let taxonomy = Taxonomy::default();
        assert_eq!(
            taxonomy.apply(&labels(&["緊急度：高"])).urgency,
            Some(Urgency::High)
        );
        assert_eq!(
            taxonomy.apply(&labels(&["緊急度:中"])).urgency,
            Some(Urgency::Mid)
        );
    }

    #[test]
    fn last_match_wins_per_category() {
        let taxonomy = Taxonomy::default();
        let attrs = taxonomy.apply(&labels(&[
            "緊急度:高",
            "genre:要望",
            "CaaS-A 対応中",
            "緊急度:低",
            "genre:サービス障害",
            "CaaS-B 対応中",
        ]));
        assert_eq!(attrs.urgency, Some(Urgency::Low));
        assert_eq!(attrs.genre.as_deref(), Some("サービス障害"));
        assert_eq!(attrs.team.as_deref(), Some("CaaS-B"));
    }

    #[test]
    fn unknown_labels_leave_defaults() {
        let attrs = Taxonomy::default().apply(&labels(&["PF_Support", "needs-triage"]));
        assert_eq!(attrs, LabelAttributes::default());
        assert!(!attrs.escalation);
    }

    #[test]
    fn exact_rules_precede_substring_rules() {
        let taxonomy = Taxonomy::default();
        let rule = taxonomy.rule_for("Escalation").expect("rule exists");
        assert_eq!(rule.category, Category::Escalation);
        // Only the exact sentinel counts; a lookalike does not.
        assert!(taxonomy.rule_for("Escalation-candidate").is_none());
    }
}
