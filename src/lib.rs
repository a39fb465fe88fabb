#![forbid(unsafe_code)]

pub mod board;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod populate;
pub mod reconcile;
pub mod scrape;
pub mod taxonomy;
