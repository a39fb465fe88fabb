use std::path::Path;

use anyhow::Context as _;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub const DEFAULT_LISTING_URL: &str = "https://www.datacamp.com/courses/all";
pub const DEFAULT_ORIGIN: &str = "https://www.datacamp.com";
pub const DEFAULT_BOARD_NAME: &str = "All DC Courses";
pub const DEFAULT_CREDENTIALS_PATH: &str = "trello.yaml";

/// Task board secrets, read from a YAML file:
///
/// ```yaml
/// api_key: ...
/// api_secret: ...
/// token: ...
/// ```
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    pub token: SecretString,
}

impl Credentials {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read credentials: {}", path.display()))?;
        let credentials: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse credentials: {}", path.display()))?;
        credentials
            .ensure_complete()
            .with_context(|| format!("validate credentials: {}", path.display()))?;
        Ok(credentials)
    }

    fn ensure_complete(&self) -> anyhow::Result<()> {
        for (field, value) in [
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
            ("token", &self.token),
        ] {
            if value.expose_secret().trim().is_empty() {
                anyhow::bail!("`{field}` must not be empty");
            }
        }
        Ok(())
    }
}
