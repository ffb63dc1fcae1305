//! Output layer shared by every report command.
//!
//! Reports print to stdout either as rendered text or as the JSON stats
//! payload. Errors go to stderr in the same mode.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--json` flag
//! 2. `FORMAT` env var → `"text"` | `"json"`
//! 3. Default: [`OutputMode::Text`]

use serde::Serialize;
use std::io::{self, Write};
use ticketstat_core::error::{ConfigError, ErrorCode, ReportError, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rendered report text (Markdown, CSV or plain text per report).
    Text,
    /// The serialized stats payload.
    Json,
}

fn resolve_output_mode_inner(json_flag: bool, format_env: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match format_env.map(str::to_lowercase).as_deref() {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Text,
    }
}

/// Resolve the output mode from the `--json` flag and `FORMAT`.
pub fn resolve_output_mode(json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    resolve_output_mode_inner(json_flag, env_val.as_deref())
}

/// Error payload written to stderr.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable `E####` code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(ToString::to_string),
            error_code: Some(code.code().to_string()),
        }
    }

    /// Map an error chain to a CLI error, using the first core error found
    /// for the code and hint.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<ReportError>() {
                return Self::with_code(message, e.code());
            }
            if let Some(e) = cause.downcast_ref::<ConfigError>() {
                return Self::with_code(message, e.code());
            }
            if let Some(e) = cause.downcast_ref::<SnapshotError>() {
                return Self::with_code(message, e.code());
            }
        }
        Self::new(message)
    }
}

/// Write a report to stdout: the text produced by `text_fn`, or `value`
/// as pretty JSON.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            out.write_all(text_fn(value).as_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  hint: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use ticketstat_core::error::{FetchError, FetchOp};

    #[test]
    fn json_flag_wins_over_env() {
        assert_eq!(resolve_output_mode_inner(true, Some("text")), OutputMode::Json);
    }

    #[test]
    fn format_env_selects_json() {
        assert_eq!(resolve_output_mode_inner(false, Some("JSON")), OutputMode::Json);
        assert_eq!(resolve_output_mode_inner(false, Some("text")), OutputMode::Text);
        assert_eq!(resolve_output_mode_inner(false, Some("yaml")), OutputMode::Text);
        assert_eq!(resolve_output_mode_inner(false, None), OutputMode::Text);
    }

    #[test]
    fn report_errors_carry_code_and_hint() {
        let err = anyhow::Error::new(ReportError::Fetch {
            operation: FetchOp::Closed,
            span: "2024-03-01~2024-03-31".to_string(),
            source: FetchError::new("boom"),
        })
        .context("trend report failed");

        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E3001"));
        assert!(cli.message.starts_with("trend report failed: get closed tickets"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn unknown_errors_have_no_code() {
        let err = anyhow::anyhow!("plain failure");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli, CliError::new("plain failure"));
    }

    #[test]
    fn cli_error_json_skips_missing_fields() {
        let json = serde_json::to_value(CliError::new("x")).expect("serializes");
        assert_eq!(json, serde_json::json!({ "message": "x" }));
    }

    #[test]
    fn snapshot_errors_map_through_context() {
        let result: Result<(), SnapshotError> = Err(SnapshotError::Read {
            path: "missing.json".into(),
            source: std::io::Error::other("not found"),
        });
        let err = result.context("loading snapshot").expect_err("must fail");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
    }
}
