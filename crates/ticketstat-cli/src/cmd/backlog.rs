//! `tstat backlog`: every open ticket.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{Globals, ReportContext, parse_now};
use crate::output::render;

#[derive(Args, Debug, Default)]
pub struct BacklogArgs {
    /// Reference instant (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<String>,
}

/// Execute `tstat backlog`.
pub fn run_backlog(args: &BacklogArgs, globals: &Globals, project_root: &Path) -> Result<()> {
    let ctx = ReportContext::load(globals, project_root)?;
    let now = parse_now(args.now.as_deref(), ctx.engine.tz())?;

    let stats = ctx.engine.backlog(now).context("backlog report failed")?;
    let renderer = ctx.engine.renderer();
    render(globals.output, &stats, |s| renderer.daily(s))
}
