use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    ConfigParseError,
    InvalidTimezone,
    SnapshotReadFailed,
    SnapshotParseError,
    FetchFailed,
    WindowOutOfRange,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidTimezone => "E1003",
            Self::SnapshotReadFailed => "E2001",
            Self::SnapshotParseError => "E2002",
            Self::FetchFailed => "E3001",
            Self::WindowOutOfRange => "E3002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidTimezone => "Invalid timezone offset",
            Self::SnapshotReadFailed => "Ticket snapshot could not be read",
            Self::SnapshotParseError => "Ticket snapshot parse error",
            Self::FetchFailed => "Ticket fetch failed",
            Self::WindowOutOfRange => "Report window out of range",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check the --config path and file permissions."),
            Self::ConfigParseError => Some("Fix syntax in .ticketstat/config.toml and retry."),
            Self::InvalidTimezone => {
                Some("Use a fixed UTC offset such as \"+09:00\" or \"-05:30\".")
            }
            Self::SnapshotReadFailed => {
                Some("Pass --snapshot or set TICKETSTAT_SNAPSHOT to an existing file.")
            }
            Self::SnapshotParseError => {
                Some("Every ticket needs id, title, url, state, comments, created_at and updated_at; closed tickets also need closed_at.")
            }
            Self::FetchFailed => Some("The report was aborted; retry once the source is reachable."),
            Self::WindowOutOfRange => {
                Some("Use a smaller --span or --day-ago, or an origin closer to today.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure reported by a [`crate::source::TicketSource`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// The fetch capability a report was exercising when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOp {
    Updated,
    Closed,
    Created,
    OpenStale,
    OpenAll,
    KeywordVocabulary,
}

impl FetchOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated tickets",
            Self::Closed => "closed tickets",
            Self::Created => "created tickets",
            Self::OpenStale => "stale open tickets",
            Self::OpenAll => "open tickets",
            Self::KeywordVocabulary => "keyword labels",
        }
    }
}

impl fmt::Display for FetchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a report call. No partial report is produced.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("get {operation} for {span}: {source}")]
    Fetch {
        operation: FetchOp,
        span: String,
        #[source]
        source: FetchError,
    },

    #[error("report window out of range: {0}")]
    OutOfRange(String),
}

impl ReportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch { .. } => ErrorCode::FetchFailed,
            Self::OutOfRange(_) => ErrorCode::WindowOutOfRange,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid timezone offset '{0}'")]
    InvalidTimezone(String),

    #[error("invalid service id pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadFailed,
            Self::Parse { .. } | Self::InvalidPattern { .. } => ErrorCode::ConfigParseError,
            Self::InvalidTimezone(_) => ErrorCode::InvalidTimezone,
        }
    }
}

/// Errors raised while loading a ticket snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid snapshot {path}: ticket #{id} is closed but has no closed_at")]
    MissingClosedAt { path: PathBuf, id: u64 },
}

impl SnapshotError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::SnapshotReadFailed,
            Self::Parse { .. } | Self::MissingClosedAt { .. } => ErrorCode::SnapshotParseError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigReadFailed,
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidTimezone,
            ErrorCode::SnapshotReadFailed,
            ErrorCode::SnapshotParseError,
            ErrorCode::FetchFailed,
            ErrorCode::WindowOutOfRange,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::FetchFailed.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn fetch_error_display_names_operation_and_span() {
        let err = ReportError::Fetch {
            operation: FetchOp::Closed,
            span: "2024-01-01~2024-01-31".to_string(),
            source: FetchError::new("connection reset"),
        };
        assert_eq!(
            err.to_string(),
            "get closed tickets for 2024-01-01~2024-01-31: connection reset"
        );
        assert_eq!(err.code(), ErrorCode::FetchFailed);
    }

    #[test]
    fn fetch_error_keeps_source_chain() {
        let io = std::io::Error::other("socket closed");
        let err = FetchError::with_source("tracker unavailable", io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[test]
    fn out_of_range_maps_to_window_code() {
        let err = ReportError::OutOfRange("7 days before -262143-01-01".to_string());
        assert_eq!(err.code().code(), "E3002");
        assert!(err.code().hint().is_some());
    }
}
