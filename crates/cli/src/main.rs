mod commands;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{Shell, generate};
use shelver_core::WatchedRoot;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shelver")]
#[command(
    version,
    about = "Watch folders and file audio into Artist/Album/NN Title",
    long_about = None
)]
struct Cli {
    /// Directory pairs: <input1> <output1> [<input2> <output2>]
    #[arg(value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// TOML file with engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds without changes before a folder is reprocessed
    #[arg(short, long, value_name = "SECS")]
    quiet_interval: Option<u64>,

    /// Process what is there once and exit without watching
    #[arg(long)]
    once: bool,

    /// More log output (-v debug for shelver, -vv debug everywhere)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

/// Split positional directories into (input, output) pairs.
/// Only one or two pairs are accepted.
fn pair_roots(dirs: &[PathBuf]) -> Option<Vec<WatchedRoot>> {
    if !matches!(dirs.len(), 2 | 4) {
        return None;
    }
    Some(
        dirs.chunks(2)
            .map(|pair| WatchedRoot::new(&pair[0], &pair[1]))
            .collect(),
    )
}

const CRATE_TARGETS: &[&str] = &["shelver", "shelver_core", "shelver_organizer", "shelver_watch"];

/// Per-file progress from our own crates is shown by default; dependencies
/// stay at warn until `-vv`.
fn default_filter(verbose: u8) -> String {
    let (deps, ours) = match verbose {
        0 => ("warn", "info"),
        1 => ("warn", "debug"),
        _ => return "debug".to_string(),
    };
    let mut directives = vec![deps.to_string()];
    directives.extend(CRATE_TARGETS.iter().map(|t| format!("{}={}", t, ours)));
    directives.join(",")
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "shelver", &mut io::stdout());
        return Ok(());
    }

    let Some(roots) = pair_roots(&cli.dirs) else {
        Cli::command()
            .error(
                ErrorKind::WrongNumberOfValues,
                "expected 2 or 4 directories: <input1> <output1> [<input2> <output2>]",
            )
            .exit();
    };

    init_logging(cli.verbose);

    let config = commands::load_settings(cli.config.as_deref(), cli.quiet_interval)?;

    if cli.once {
        commands::organize::run(config, roots).await
    } else {
        commands::watch::run(config, roots).await
    }
}
