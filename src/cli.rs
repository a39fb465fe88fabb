use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::board::trello::DEFAULT_API_BASE;
use crate::config::{
    DEFAULT_BOARD_NAME, DEFAULT_CREDENTIALS_PATH, DEFAULT_LISTING_URL, DEFAULT_ORIGIN,
};
use crate::fetch::HttpFetcher;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the catalog and write the enriched courses as JSON lines.
    Scrape(ScrapeArgs),
    /// Print the discovered topics as a taxonomy skeleton (YAML).
    Topics(TopicsArgs),
    /// Scrape the catalog and create a card for every course missing from the board.
    Populate(PopulateArgs),
    /// Delete every card on the board.
    Reset(ResetArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Catalog listing page (must be http/https).
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// Origin prefixed to the relative links found on catalog pages.
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Per-request timeout for catalog pages, in seconds (0 disables it).
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl SourceArgs {
    pub fn fetcher(&self) -> anyhow::Result<HttpFetcher> {
        ensure_http_url(&self.listing_url).context("--listing-url")?;
        ensure_http_url(&self.origin).context("--origin")?;

        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        HttpFetcher::new(timeout)
    }
}

#[derive(Debug, Clone, Args)]
pub struct BoardArgs {
    /// Name of the board holding the course cards.
    #[arg(long, default_value = DEFAULT_BOARD_NAME)]
    pub board: String,

    /// YAML file with `api_key`, `api_secret` and `token`.
    #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials: String,

    /// Task board API base URL.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Topic→group taxonomy (YAML mapping of group name to topic titles).
    #[arg(long)]
    pub taxonomy: String,

    /// Output file for the JSON lines (default: stdout). Must not exist.
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Debug, Args)]
pub struct TopicsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct PopulateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub board: BoardArgs,

    /// Topic→group taxonomy (YAML mapping of group name to topic titles).
    #[arg(long)]
    pub taxonomy: String,

    /// Report the cards that would be created without creating them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Confirm deleting every card on the board.
    #[arg(long)]
    pub yes: bool,
}

fn ensure_http_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("parse url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url must be http/https: {url}");
    }
    Ok(url)
}
