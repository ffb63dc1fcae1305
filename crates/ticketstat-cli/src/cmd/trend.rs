//! `tstat trend`: weekly/monthly summary table.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{Globals, ReportContext, WindowArgs};
use crate::output::render;

#[derive(Args, Debug)]
pub struct TrendArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Execute `tstat trend`.
pub fn run_trend(args: &TrendArgs, globals: &Globals, project_root: &Path) -> Result<()> {
    let ctx = ReportContext::load(globals, project_root)?;
    let origin = args.window.origin_or_today(ctx.engine.tz());

    let stats = ctx
        .engine
        .trend(origin, args.window.kind, args.window.count())
        .context("trend report failed")?;
    let renderer = ctx.engine.renderer();
    render(globals.output, &stats, |s| renderer.trend(s))
}
