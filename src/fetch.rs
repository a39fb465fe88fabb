use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use scraper::Html;

use crate::error::ScrapeError;

/// Source of parsed pages.
pub trait Fetch {
    /// Fetches `url` and parses it. Anything but `200 OK` is a [`ScrapeError`].
    fn fetch(&self, url: &str) -> anyhow::Result<Html>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build page http client")?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Html> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("coursecards/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = response.status().as_u16();
        tracing::info!(%url, status, "fetched page");
        if status != 200 {
            return Err(ScrapeError {
                url: url.to_owned(),
                status,
            }
            .into());
        }

        let body = response
            .text()
            .with_context(|| format!("read body of {url}"))?;
        Ok(Html::parse_document(&body))
    }
}
