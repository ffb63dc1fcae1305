//! Ticket fetch capabilities.
//!
//! Reports consume tickets only through [`TicketSource`]. Window bounds are
//! half-open `[since, until)` on the instant each query names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{FetchError, SnapshotError};
use crate::model::{KeywordLabel, Ticket, TicketState};

pub trait TicketSource {
    /// Tickets whose `updated_at` falls in the window, any state.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn updated_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError>;

    /// Closed tickets whose `closed_at` falls in the window.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn closed_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError>;

    /// Tickets whose `created_at` falls in the window, any state.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn created_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError>;

    /// Open tickets not updated since `until`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn open_stale(&self, until: DateTime<Utc>) -> Result<Vec<Ticket>, FetchError>;

    /// Every open ticket.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn open_all(&self) -> Result<Vec<Ticket>, FetchError>;

    /// Known labels starting with `query_prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the underlying tracker cannot be queried.
    fn keyword_vocabulary(&self, query_prefix: &str) -> Result<Vec<KeywordLabel>, FetchError>;
}

/// On-disk export of tracker data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    /// Declared label vocabulary. When empty, ticket labels are used.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// In-memory [`TicketSource`] over a loaded [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    #[must_use]
    pub const fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the file cannot be read, does not
    /// deserialize, or holds a closed ticket without `closed_at`.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|source| SnapshotError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(bad) = snapshot
            .tickets
            .iter()
            .find(|t| t.state == TicketState::Closed && t.closed_at.is_none())
        {
            return Err(SnapshotError::MissingClosedAt {
                path: path.to_path_buf(),
                id: bad.id,
            });
        }
        tracing::debug!(
            path = %path.display(),
            tickets = snapshot.tickets.len(),
            labels = snapshot.labels.len(),
            "loaded snapshot"
        );
        Ok(Self::new(snapshot))
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.snapshot.tickets
    }

    fn select(&self, keep: impl Fn(&Ticket) -> bool) -> Vec<Ticket> {
        self.snapshot
            .tickets
            .iter()
            .filter(|t| keep(t))
            .cloned()
            .collect()
    }
}

fn within(at: DateTime<Utc>, since: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    at >= since && at < until
}

impl TicketSource for SnapshotSource {
    fn updated_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError> {
        Ok(self.select(|t| within(t.updated_at, since, until)))
    }

    fn closed_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError> {
        Ok(self.select(|t| {
            t.state == TicketState::Closed
                && t.closed_at.is_some_and(|at| within(at, since, until))
        }))
    }

    fn created_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, FetchError> {
        Ok(self.select(|t| within(t.created_at, since, until)))
    }

    fn open_stale(&self, until: DateTime<Utc>) -> Result<Vec<Ticket>, FetchError> {
        Ok(self.select(|t| t.state == TicketState::Open && t.updated_at < until))
    }

    fn open_all(&self) -> Result<Vec<Ticket>, FetchError> {
        Ok(self.select(|t| t.state == TicketState::Open))
    }

    fn keyword_vocabulary(&self, query_prefix: &str) -> Result<Vec<KeywordLabel>, FetchError> {
        let declared: Box<dyn Iterator<Item = &String>> = if self.snapshot.labels.is_empty() {
            Box::new(self.snapshot.tickets.iter().flat_map(|t| t.labels.iter()))
        } else {
            Box::new(self.snapshot.labels.iter())
        };
        let names: BTreeSet<&String> = declared
            .filter(|name| name.starts_with(query_prefix))
            .collect();
        Ok(names.into_iter().map(KeywordLabel::new).collect())
    }
}
