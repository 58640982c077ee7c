//! Checks that a running backend is reachable, accepts a login and serves
//! the protected listings.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use condo_probe::cli::{CommonArgs, init_tracing};
use condo_probe::{render, run_connectivity};

#[derive(Parser, Debug)]
#[command(name = "check-connectivity", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = args.common.load_config().context("load probe configuration")?;
    let outcome = run_connectivity(&config).await?;

    let mut stdout = std::io::stdout().lock();
    if args.common.json {
        serde_json::to_writer_pretty(&mut stdout, &outcome).context("serialize outcome")?;
        writeln!(stdout)?;
    } else {
        render::connectivity(&mut stdout, &outcome, &config)?;
    }
    stdout.flush()?;

    std::process::exit(outcome.exit_code());
}
