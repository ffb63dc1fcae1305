//! Report renderers.
//!
//! Every renderer is a pure function of a stats payload. Display dates are
//! derived from the raw UTC instants using the renderer's timezone.

mod analysis;
mod daily;
mod keyword;
mod trend;

use chrono::{DateTime, FixedOffset, Utc};

use crate::model::Urgency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    tz: FixedOffset,
    primary_team: String,
}

impl Renderer {
    pub fn new(tz: FixedOffset, primary_team: impl Into<String>) -> Self {
        Self {
            tz,
            primary_team: primary_team.into(),
        }
    }

    #[must_use]
    pub const fn tz(&self) -> FixedOffset {
        self.tz
    }

    #[must_use]
    pub fn primary_team(&self) -> &str {
        &self.primary_team
    }

    fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz).format("%Y-%m-%d").to_string()
    }
}

fn urgency_cell(urgency: Option<Urgency>) -> &'static str {
    urgency.map_or("", Urgency::label)
}

fn text_cell(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}
