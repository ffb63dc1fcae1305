//! Report subcommands.

pub mod analysis;
pub mod backlog;
pub mod completions;
pub mod daily;
pub mod keyword;
pub mod trend;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Args;
use std::path::{Path, PathBuf};
use ticketstat_core::config::{ReportConfig, resolve_config};
use ticketstat_core::report::ReportEngine;
use ticketstat_core::source::SnapshotSource;
use ticketstat_core::window::{WindowKind, local_midnight};

use crate::output::OutputMode;

/// Inputs every report command shares.
#[derive(Debug, Clone)]
pub struct Globals {
    pub snapshot: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: OutputMode,
}

/// Loaded config plus an engine over the snapshot.
pub struct ReportContext {
    pub config: ReportConfig,
    pub engine: ReportEngine<SnapshotSource>,
}

impl ReportContext {
    /// Resolve config relative to `project_root` and load the snapshot.
    ///
    /// # Errors
    ///
    /// Fails when no snapshot path was given, or the config or snapshot
    /// cannot be loaded.
    pub fn load(globals: &Globals, project_root: &Path) -> Result<Self> {
        let config = resolve_config(globals.config.as_deref(), project_root)
            .context("loading configuration")?;
        let Some(path) = globals.snapshot.as_deref() else {
            bail!("no ticket snapshot given; pass --snapshot or set TICKETSTAT_SNAPSHOT");
        };
        let source = SnapshotSource::load(path).context("loading ticket snapshot")?;
        let engine = ReportEngine::new(source, &config).context("preparing report engine")?;
        Ok(Self { config, engine })
    }
}

/// Window selection shared by the span-based reports.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Last day of the newest span (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub origin: Option<NaiveDate>,

    /// Span size.
    #[arg(long, default_value = "monthly")]
    pub kind: WindowKind,

    /// Number of spans to report, walking back from the origin.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub span: u16,
}

impl WindowArgs {
    pub fn count(&self) -> usize {
        usize::from(self.span)
    }

    pub fn origin_or_today(&self, tz: FixedOffset) -> NaiveDate {
        self.origin
            .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive())
    }
}

/// Parse a `--now` value: RFC 3339, or a bare date meaning midnight at the
/// start of that day in `tz`.
///
/// # Errors
///
/// Fails when the value is neither form.
pub fn parse_now(raw: Option<&str>, tz: FixedOffset) -> Result<DateTime<Utc>> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid --now value '{raw}': expected YYYY-MM-DD or RFC 3339"))?;
    let at = local_midnight(date, tz)
        .with_context(|| format!("--now value '{raw}' is out of range"))?;
    Ok(at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).expect("valid offset")
    }

    #[test]
    fn now_accepts_rfc3339() {
        let at = parse_now(Some("2024-03-31T12:00:00Z"), jst()).expect("parses");
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn now_accepts_local_date() {
        let at = parse_now(Some("2024-03-31"), jst()).expect("parses");
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 30, 15, 0, 0).unwrap());
    }

    #[test]
    fn now_rejects_garbage() {
        let err = parse_now(Some("yesterday"), jst()).expect_err("must fail");
        assert!(err.to_string().contains("invalid --now value"));
    }

    #[test]
    fn missing_snapshot_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let globals = Globals {
            snapshot: None,
            config: None,
            output: OutputMode::Text,
        };
        let Err(err) = ReportContext::load(&globals, dir.path()) else {
            panic!("load must fail without a snapshot");
        };
        assert!(err.to_string().contains("--snapshot"));
    }
}
