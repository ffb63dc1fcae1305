//! Ticket → [`DetailRecord`] classification.

use regex::Regex;

use crate::config::TaxonomyConfig;
use crate::error::ConfigError;
use crate::model::{DetailRecord, Ticket, TicketState};
use crate::taxonomy::Taxonomy;
use crate::window::Span;

/// Pure mapping from a ticket snapshot to its detail record.
#[derive(Debug, Clone)]
pub struct Classifier {
    taxonomy: Taxonomy,
    service_id: Regex,
}

impl Classifier {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the configured service id
    /// pattern does not compile.
    pub fn new(config: &TaxonomyConfig) -> Result<Self, ConfigError> {
        let service_id =
            Regex::new(&config.service_id_pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: config.service_id_pattern.clone(),
                source,
            })?;
        Ok(Self {
            taxonomy: Taxonomy::from_config(config),
            service_id,
        })
    }

    #[must_use]
    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify one ticket into the given span.
    ///
    /// # Panics
    ///
    /// Panics if a closed ticket carries no `closed_at`. Sources must never
    /// hand over such a snapshot.
    #[must_use]
    pub fn classify(&self, ticket: &Ticket, span: &Span) -> DetailRecord {
        let attrs = self.taxonomy.apply(&ticket.labels);
        let closed_at = match ticket.state {
            TicketState::Closed => match ticket.closed_at {
                Some(at) => Some(at),
                None => panic!("closed ticket #{} has no closed_at timestamp", ticket.id),
            },
            TicketState::Open => None,
        };

        let assignee = ticket
            .assignees
            .iter()
            .map(|login| format!("@{login}"))
            .collect::<Vec<_>>()
            .join(" ");

        DetailRecord {
            title: ticket.title.clone(),
            service_id: self.service_id(&ticket.title),
            url: ticket.url.clone(),
            created_at: ticket.created_at,
            closed_at,
            state: ticket.state,
            span: *span,
            team: attrs.team,
            urgency: attrs.urgency,
            genre: attrs.genre,
            escalation: attrs.escalation,
            keywords: attrs.keywords,
            assignee,
            comments: ticket.comments,
            open_hours: open_hours(ticket),
        }
    }

    fn service_id(&self, title: &str) -> String {
        self.service_id
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| format!("INC{}", m.as_str()))
            .unwrap_or_default()
    }
}

/// Whole hours a ticket has been open: to `closed_at` when closed, to
/// `updated_at` otherwise. Floors, and never goes below zero.
#[must_use]
pub fn open_hours(ticket: &Ticket) -> u64 {
    let end = match (ticket.state, ticket.closed_at) {
        (TicketState::Closed, Some(closed_at)) => closed_at,
        _ => ticket.updated_at,
    };
    let hours = (end - ticket.created_at).num_hours();
    u64::try_from(hours).unwrap_or(0)
}
