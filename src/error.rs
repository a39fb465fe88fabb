use thiserror::Error;

/// A page answered with something other than `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("GET {url} returned status {status}")]
pub struct ScrapeError {
    pub url: String,
    pub status: u16,
}

/// An element the extractor depends on was missing or unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {page} page: {detail}")]
pub struct MalformedPageError {
    pub page: &'static str,
    pub detail: String,
}

impl MalformedPageError {
    pub(crate) fn new(page: &'static str, detail: impl Into<String>) -> Self {
        Self {
            page,
            detail: detail.into(),
        }
    }
}

/// The topic→group taxonomy does not partition the discovered topics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "taxonomy does not match discovered topics (duplicated: [{}], missing: [{}])",
    .duplicated.join(", "),
    .missing.join(", ")
)]
pub struct TaxonomyError {
    pub duplicated: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board not found: {0}")]
    BoardNotFound(String),

    #[error("board has no `{0}` list for the courses routed to it")]
    MissingList(String),

    #[error("task board API error ({status}): {body}")]
    Api { status: u16, body: String },
}
