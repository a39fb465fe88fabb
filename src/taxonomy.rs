use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;

/// Group name → topic titles, as curated by hand in a YAML file:
///
/// ```yaml
/// Programming:
///   - Programming
///   - Software Engineering
/// Data:
///   - Data Manipulation
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Taxonomy {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read taxonomy: {}", path.display()))?;
        serde_yaml::from_str(&yaml).with_context(|| format!("parse taxonomy: {}", path.display()))
    }

    /// Skeleton with every topic under a single `Unassigned` group.
    #[must_use]
    pub fn skeleton<'a>(topics: impl IntoIterator<Item = &'a str>) -> Self {
        let topics = topics.into_iter().map(str::to_owned).collect();
        Self {
            groups: BTreeMap::from([("Unassigned".to_owned(), topics)]),
        }
    }

    /// Topic → group. Only meaningful once [`validate_taxonomy`] passed.
    #[must_use]
    pub fn group_by_topic(&self) -> HashMap<&str, &str> {
        self.groups
            .iter()
            .flat_map(|(group, topics)| {
                topics
                    .iter()
                    .map(move |topic| (topic.as_str(), group.as_str()))
            })
            .collect()
    }
}

/// Checks that every discovered topic belongs to exactly one group.
pub fn validate_taxonomy<S: AsRef<str>>(
    taxonomy: &Taxonomy,
    discovered: &[S],
) -> Result<(), TaxonomyError> {
    let mut groups_per_topic: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (group, topics) in &taxonomy.groups {
        for topic in topics {
            groups_per_topic
                .entry(topic.as_str())
                .or_default()
                .insert(group.as_str());
        }
    }

    let duplicated: Vec<String> = groups_per_topic
        .iter()
        .filter(|(_, groups)| groups.len() > 1)
        .map(|(topic, _)| (*topic).to_owned())
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for topic in discovered {
        let topic: &str = topic.as_ref();
        if !groups_per_topic.contains_key(topic) && !missing.iter().any(|m| m == topic) {
            missing.push(topic.to_owned());
        }
    }

    let discovered_set: BTreeSet<&str> = discovered.iter().map(|topic| topic.as_ref()).collect();
    let stale: Vec<&str> = groups_per_topic
        .keys()
        .copied()
        .filter(|topic| !discovered_set.contains(topic))
        .collect();
    if !stale.is_empty() {
        tracing::warn!(?stale, "taxonomy lists topics that were not discovered");
    }

    if duplicated.is_empty() && missing.is_empty() {
        return Ok(());
    }
    Err(TaxonomyError {
        duplicated,
        missing,
    })
}
