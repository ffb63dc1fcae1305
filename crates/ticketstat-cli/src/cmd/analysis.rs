//! `tstat analysis`: per-ticket CSV export.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use ticketstat_core::model::AnalysisBasis;

use super::{Globals, ReportContext, WindowArgs};
use crate::output::render;

#[derive(Args, Debug)]
pub struct AnalysisArgs {
    /// Which instant selects tickets into a span: created, closed or updated.
    #[arg(long, default_value = "created")]
    pub basis: AnalysisBasis,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// Execute `tstat analysis`.
pub fn run_analysis(args: &AnalysisArgs, globals: &Globals, project_root: &Path) -> Result<()> {
    let ctx = ReportContext::load(globals, project_root)?;
    let origin = args.window.origin_or_today(ctx.engine.tz());

    let stats = ctx
        .engine
        .analysis(origin, args.basis, args.window.kind, args.window.count())
        .context("analysis export failed")?;
    let renderer = ctx.engine.renderer();
    render(globals.output, &stats, |s| renderer.analysis(s))
}
