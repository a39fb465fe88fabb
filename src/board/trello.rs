use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::USER_AGENT;
use secrecy::ExposeSecret as _;
use serde::de::DeserializeOwned;
use url::Url;

use super::{Board, BoardList, Card, TaskBoard};
use crate::config::Credentials;
use crate::error::BoardError;

pub const DEFAULT_API_BASE: &str = "https://api.trello.com";

/// Trello REST v1 client. Every request is authenticated with the `key` and
/// `token` query parameters.
#[derive(Debug)]
pub struct TrelloClient {
    client: reqwest::blocking::Client,
    base: Url,
    credentials: Credentials,
}

impl TrelloClient {
    pub fn new(api_base: &str, credentials: Credentials) -> anyhow::Result<Self> {
        let mut base = Url::parse(api_base).context("parse task board api base url")?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build task board http client")?;

        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("build task board endpoint: {path}"))
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.credentials.api_key.expose_secret()),
            ("token", self.credentials.token.expose_secret()),
        ]
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, url.clone())
            .header(USER_AGENT, concat!("coursecards/", env!("CARGO_PKG_VERSION")))
            .query(&self.auth())
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .request(reqwest::Method::GET, &url)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?;
        let response = ensure_success(response)?;
        response
            .json()
            .with_context(|| format!("parse response of GET {url}"))
    }
}

fn ensure_success(
    response: reqwest::blocking::Response,
) -> anyhow::Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(BoardError::Api {
        status: status.as_u16(),
        body,
    }
    .into())
}

impl TaskBoard for TrelloClient {
    fn list_boards(&self) -> anyhow::Result<Vec<Board>> {
        self.get_json("1/members/me/boards", &[("fields", "name")])
    }

    fn open_lists(&self, board: &Board) -> anyhow::Result<Vec<BoardList>> {
        self.get_json(
            &format!("1/boards/{}/lists", board.id),
            &[("filter", "open"), ("fields", "name")],
        )
    }

    fn all_cards(&self, board: &Board) -> anyhow::Result<Vec<Card>> {
        self.get_json(
            &format!("1/boards/{}/cards/all", board.id),
            &[("fields", "name,idList,desc")],
        )
    }

    fn add_card(&self, list: &BoardList, name: &str, body: &str) -> anyhow::Result<Card> {
        let url = self.endpoint("1/cards")?;
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&serde_json::json!({
                "idList": list.id,
                "name": name,
                "desc": body,
            }))
            .send()
            .with_context(|| format!("POST {url}"))?;
        let response = ensure_success(response)?;
        response
            .json()
            .with_context(|| format!("parse response of POST {url}"))
    }

    fn delete_card(&self, card: &Card) -> anyhow::Result<()> {
        let url = self.endpoint(&format!("1/cards/{}", card.id))?;
        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .with_context(|| format!("DELETE {url}"))?;
        ensure_success(response)?;
        Ok(())
    }
}
