mod cli;

use clap::Parser;
use fudge::{execute, Chocolatey, Config, Reporter, RunTimer};
use fudge::privilege::is_elevated;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::cli::{normalize_args, CLI};
use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("FUDGE_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = CLI::parse_from(normalize_args(std::env::args_os()));
    let reporter = Reporter;
    reporter.banner(env!("CARGO_PKG_VERSION"));
    if cli.version {
        return Ok(());
    }

    let _timer = RunTimer::start(reporter);
    let config = Config::load()?;
    let mut backend = Chocolatey::new(config.backend);
    tracing::debug!(program = backend.program(), "using backend");
    execute(cli.into_raw_args(), &mut backend, is_elevated, reporter)?;
    Ok(())
}
