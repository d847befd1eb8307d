//! git-autosync — poll a git working copy's remote and pull when it
//! diverges.
//!
//! # Usage
//!
//! ```text
//! git-autosync [PATH]
//!     [-r|--repo-url <URL>] [-b|--branch <NAME>]
//!     [-n|--max-times <N>] [-i|--interval <SECONDS>]
//!     [-a|--async] [--sync-command <CMD>]
//! ```
//!
//! Exit code 0 on graceful stop; a fatal error exits with that error's
//! numeric code after logging the full context chain.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use autosync_core::AutosyncError;
use autosync_engine::{resolve, Overrides, SyncLoop};

#[derive(Parser, Debug)]
#[command(
    name = "git-autosync",
    version,
    about = "Keep a git working copy in sync with its remote branch",
    long_about = None,
)]
struct Cli {
    /// Local working copy to watch.
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Remote URL; defaults to the repository's remote.origin.url.
    #[arg(short = 'r', long = "repo-url", value_name = "URL")]
    repo_url: Option<String>,

    /// Branch to watch; defaults to the repository's current branch.
    #[arg(short, long, value_name = "NAME")]
    branch: Option<String>,

    /// Stop after this many completed ticks; -1 polls forever.
    #[arg(
        short = 'n',
        long = "max-times",
        value_name = "N",
        allow_hyphen_values = true
    )]
    max_times: Option<i64>,

    /// Seconds to wait between ticks (fractional values accepted).
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<f64>,

    /// Validate, then poll on a background thread instead of blocking.
    /// The loop lives only as long as the process — from the standalone
    /// binary this returns right after validation; the flag is chiefly
    /// useful when embedding the library crates.
    #[arg(short = 'a', long = "async")]
    background: bool,

    /// Command run when the remote has diverged. Split on whitespace into
    /// an argument vector; no shell is involved.
    #[arg(long, value_name = "CMD")]
    sync_command: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("fatal: {err:#}");
            let code = err
                .downcast_ref::<AutosyncError>()
                .map(AutosyncError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let interval = cli.interval.map(parse_interval).transpose()?;
    let overrides = Overrides {
        remote_url: cli.repo_url,
        branch: cli.branch,
        max_iterations: cli.max_times,
        interval,
        background: cli.background,
        sync_command: cli.sync_command,
    };

    let config = resolve(&cli.path, overrides)
        .with_context(|| format!("cannot watch '{}'", cli.path.display()))?;

    println!(
        "{} watching {} (branch {}, remote {})",
        "✓".green(),
        config.local_path.display(),
        config.branch,
        config.remote_url
    );

    match SyncLoop::new(config).start().context("sync loop failed")? {
        Some(_handle) => {
            // Background mode: the loop lives on its thread for the rest of
            // the process lifetime; the binary has nothing further to do.
            println!("{} validated, polling continues in the background", "✓".green());
        }
        None => {
            println!("{} stopped", "✓".green());
        }
    }
    Ok(())
}

fn parse_interval(seconds: f64) -> Result<Duration, AutosyncError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(AutosyncError::InvalidArgument {
            message: format!("interval must be a positive number of seconds, got {seconds}"),
        });
    }
    Ok(Duration::from_secs_f64(seconds))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
