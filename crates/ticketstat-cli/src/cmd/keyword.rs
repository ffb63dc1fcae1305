//! `tstat keyword`: keyword-occurrence tables.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{Globals, ReportContext, WindowArgs};
use crate::output::render;

#[derive(Args, Debug)]
pub struct KeywordArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Execute `tstat keyword`.
pub fn run_keyword(args: &KeywordArgs, globals: &Globals, project_root: &Path) -> Result<()> {
    let ctx = ReportContext::load(globals, project_root)?;
    let origin = args.window.origin_or_today(ctx.engine.tz());

    let stats = ctx
        .engine
        .keywords(origin, args.window.kind, args.window.count())
        .context("keyword report failed")?;
    let renderer = ctx.engine.renderer();
    render(globals.output, &stats, |s| renderer.keywords(s))
}
