#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cmd::Globals;
use output::{CliError, render_error, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tstat: support-ticket statistics reports",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit the stats payload as JSON instead of the rendered report.
    #[arg(long, global = true)]
    json: bool,

    /// Ticket snapshot exported from the tracker (JSON).
    #[arg(long, global = true, env = "TICKETSTAT_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Config file. Defaults to .ticketstat/config.toml, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Digests",
        about = "List open tickets not updated recently",
        long_about = "List open tickets whose last update is older than --day-ago days, with urgency and team counts.",
        after_help = "EXAMPLES:\n    # Tickets untouched for a week\n    tstat daily --snapshot tickets.json\n\n    # Three-day threshold at a fixed reference date\n    tstat daily --day-ago 3 --now 2024-03-31"
    )]
    Daily(cmd::daily::DailyArgs),

    #[command(
        next_help_heading = "Digests",
        about = "List every open ticket",
        long_about = "List every currently open ticket in the daily digest layout.",
        after_help = "EXAMPLES:\n    # Current backlog\n    tstat backlog --snapshot tickets.json\n\n    # Emit machine-readable output\n    tstat backlog --json"
    )]
    Backlog(cmd::backlog::BacklogArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Weekly or monthly trend table",
        long_about = "Summarize created and closed tickets, escalations, genres and resolution scores per span as a Markdown table.",
        after_help = "EXAMPLES:\n    # Last four calendar months\n    tstat trend --origin 2024-03-31\n\n    # Last eight weeks\n    tstat trend --kind weekly --span 8"
    )]
    Trend(cmd::trend::TrendArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Per-ticket CSV export",
        long_about = "Export one comma-separated row per ticket, selecting tickets into spans by creation, close or update time.",
        after_help = "EXAMPLES:\n    # Tickets closed in the last two months\n    tstat analysis --basis closed --span 2\n\n    # Weekly export by update time\n    tstat analysis --basis updated --kind weekly"
    )]
    Analysis(cmd::analysis::AnalysisArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Keyword-occurrence tables",
        long_about = "Count closed tickets per keyword label and span, overall and escalated only.",
        after_help = "EXAMPLES:\n    # Monthly keyword matrix\n    tstat keyword --origin 2024-03-31\n\n    # Emit machine-readable output\n    tstat keyword --json"
    )]
    Keyword(cmd::keyword::KeywordArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    tstat completions bash > /etc/bash_completion.d/tstat"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Daily(_) => "daily",
            Self::Backlog(_) => "backlog",
            Self::Trend(_) => "trend",
            Self::Analysis(_) => "analysis",
            Self::Keyword(_) => "keyword",
            Self::Completions(_) => "completions",
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TICKETSTAT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "ticketstat=debug,info"
        } else {
            "ticketstat=info,warn"
        })
    });

    let format = env::var("TICKETSTAT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, globals: &Globals) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    debug!(command = cli.command.name(), root = %project_root.display(), "dispatching");

    match &cli.command {
        Commands::Daily(args) => cmd::daily::run_daily(args, globals, &project_root),
        Commands::Backlog(args) => cmd::backlog::run_backlog(args, globals, &project_root),
        Commands::Trend(args) => cmd::trend::run_trend(args, globals, &project_root),
        Commands::Analysis(args) => {
            cmd::analysis::run_analysis(args, globals, &project_root)
        }
        Commands::Keyword(args) => cmd::keyword::run_keyword(args, globals, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command, &mut std::io::stdout())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let globals = Globals {
        snapshot: cli.snapshot.clone(),
        config: cli.config.clone(),
        output: resolve_output_mode(cli.json),
    };

    match run(&cli, &globals) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_error = CliError::from_anyhow(&err);
            if render_error(globals.output, &cli_error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketstat_core::model::AnalysisBasis;
    use ticketstat_core::window::WindowKind;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "tstat",
            "trend",
            "--json",
            "--snapshot",
            "tickets.json",
            "-v",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.snapshot, Some(PathBuf::from("tickets.json")));
    }

    #[test]
    fn trend_window_defaults() {
        let cli = Cli::parse_from(["tstat", "trend"]);
        let Commands::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.window.kind, WindowKind::Monthly);
        assert_eq!(args.window.span, 4);
        assert!(args.window.origin.is_none());
    }

    #[test]
    fn analysis_parses_basis_and_window() {
        let cli = Cli::parse_from([
            "tstat",
            "analysis",
            "--basis",
            "closed",
            "--kind",
            "weekly",
            "--span",
            "2",
            "--origin",
            "2024-03-31",
        ]);
        let Commands::Analysis(args) = cli.command else {
            panic!("expected analysis");
        };
        assert_eq!(args.basis, AnalysisBasis::Closed);
        assert_eq!(args.window.kind, WindowKind::Weekly);
        assert_eq!(args.window.span, 2);
        assert_eq!(args.window.origin.map(|d| d.to_string()).as_deref(), Some("2024-03-31"));
    }

    #[test]
    fn daily_flags_parse() {
        let cli = Cli::parse_from(["tstat", "daily", "--day-ago", "3", "--now", "2024-03-31"]);
        let Commands::Daily(args) = cli.command else {
            panic!("expected daily");
        };
        assert_eq!(args.day_ago, Some(3));
        assert_eq!(args.now.as_deref(), Some("2024-03-31"));
    }

    #[test]
    fn span_count_is_bounded() {
        assert!(Cli::try_parse_from(["tstat", "trend", "--span", "0"]).is_err());
        assert!(Cli::try_parse_from(["tstat", "trend", "--span", "20000000"]).is_err());
        assert!(Cli::try_parse_from(["tstat", "trend", "--span", "520"]).is_ok());
    }

    #[test]
    fn invalid_kind_is_rejected() {
        assert!(Cli::try_parse_from(["tstat", "keyword", "--kind", "daily"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
