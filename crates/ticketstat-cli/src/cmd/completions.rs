//! `tstat completions`: shell completion scripts.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the `tstat` completion script for `shell` to `out`.
pub fn run_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    generate(shell, command, "tstat", out);
    out.flush()?;
    Ok(())
}
