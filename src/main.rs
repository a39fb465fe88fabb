use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    coursecards::logging::init().context("init logging")?;

    let cli = coursecards::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        coursecards::cli::Command::Scrape(args) => {
            coursecards::scrape::run(args).context("scrape")?;
        }
        coursecards::cli::Command::Topics(args) => {
            coursecards::scrape::topics(args).context("topics")?;
        }
        coursecards::cli::Command::Populate(args) => {
            coursecards::populate::run(args).context("populate")?;
        }
        coursecards::cli::Command::Reset(args) => {
            coursecards::populate::reset(args).context("reset")?;
        }
    }

    Ok(())
}
