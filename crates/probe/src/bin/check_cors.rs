//! Replays the CORS exchange a browser frontend performs against the login
//! route, for each configured origin.

use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Parser;
use condo_probe::cli::{CommonArgs, init_tracing};
use condo_probe::{render, run_cors};

#[derive(Parser, Debug)]
#[command(name = "check-cors", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Start immediately instead of waiting for Enter
    #[arg(long)]
    no_prompt: bool,
}

fn wait_for_enter(base_url: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Make sure the backend is running at {base_url}")?;
    write!(stdout, "\nPress Enter when the server is ready...")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = args.common.load_config().context("load probe configuration")?;
    if !args.no_prompt && !args.common.json {
        wait_for_enter(&config.base_url)?;
    }

    let report = run_cors(&config).await?;

    let mut stdout = std::io::stdout().lock();
    if args.common.json {
        serde_json::to_writer_pretty(&mut stdout, &report).context("serialize report")?;
        writeln!(stdout)?;
    } else {
        render::cors(&mut stdout, &report, &config)?;
    }
    stdout.flush()?;
    Ok(())
}
