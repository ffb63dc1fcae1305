//! `tstat daily`: open tickets that have gone stale.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{Globals, ReportContext, parse_now};
use crate::output::render;

#[derive(Args, Debug, Default)]
pub struct DailyArgs {
    /// Staleness threshold in days. Defaults to `report.stale_days`.
    #[arg(long)]
    pub day_ago: Option<u32>,

    /// Reference instant (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<String>,
}

/// Execute `tstat daily`.
pub fn run_daily(args: &DailyArgs, globals: &Globals, project_root: &Path) -> Result<()> {
    let ctx = ReportContext::load(globals, project_root)?;
    let now = parse_now(args.now.as_deref(), ctx.engine.tz())?;
    let day_ago = args.day_ago.unwrap_or(ctx.config.report.stale_days);

    let stats = ctx
        .engine
        .daily(now, day_ago)
        .context("daily report failed")?;
    let renderer = ctx.engine.renderer();
    render(globals.output, &stats, |s| renderer.daily(s))
}
