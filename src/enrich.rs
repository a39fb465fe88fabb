use std::collections::{BTreeMap, HashMap};

use anyhow::Context as _;

use crate::extract::extract_course_names_for_topic;
use crate::fetch::Fetch;
use crate::formats::{CourseRecord, EnrichedCourse, TopicLink};
use crate::taxonomy::Taxonomy;

pub const OTHER_LIST: &str = "Other";

/// Course name → topic title.
pub type TopicMembership = HashMap<String, String>;

/// Fetches every topic subpage in order and records which topic each course
/// name was listed under. A name listed under several topics keeps the last.
pub fn build_topic_membership<F: Fetch + ?Sized>(
    fetcher: &F,
    topics: &[TopicLink],
) -> anyhow::Result<TopicMembership> {
    let mut membership = TopicMembership::new();
    for topic in topics {
        let doc = fetcher
            .fetch(&topic.url)
            .with_context(|| format!("fetch topic page `{}`", topic.title))?;
        let names = extract_course_names_for_topic(&doc)
            .with_context(|| format!("extract courses of topic `{}`", topic.title))?;
        tracing::info!(topic = %topic.title, courses = names.len(), "collected topic");

        for name in names {
            if let Some(previous) = membership.insert(name.clone(), topic.title.clone())
                && previous != topic.title
            {
                tracing::debug!(
                    course = %name,
                    %previous,
                    current = %topic.title,
                    "course listed under several topics"
                );
            }
        }
    }
    Ok(membership)
}

/// Board list a course belongs on: `"{Technology} - {Group}"` for Python and
/// R courses, [`OTHER_LIST`] for everything else.
#[must_use]
pub fn derive_list_name(technology: &str, group: Option<&str>) -> String {
    let technology = technology.to_lowercase();
    if technology != "python" && technology != "r" {
        return OTHER_LIST.to_owned();
    }
    match group {
        Some(group) => format!("{} - {}", title_case(&technology), title_case(group)),
        None => title_case(&technology),
    }
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Joins courses with their topic and group, ordered by course id.
#[must_use]
pub fn enrich(
    courses: &BTreeMap<u64, CourseRecord>,
    membership: &TopicMembership,
    taxonomy: &Taxonomy,
) -> Vec<EnrichedCourse> {
    let group_by_topic = taxonomy.group_by_topic();

    courses
        .values()
        .map(|course| {
            let topic = membership.get(&course.name).cloned();
            let group = topic
                .as_deref()
                .and_then(|topic| group_by_topic.get(topic))
                .map(|group| (*group).to_owned());
            if topic.is_none() {
                tracing::debug!(course = %course.name, "course not listed under any topic");
            }

            EnrichedCourse {
                list_name: derive_list_name(&course.technology, group.as_deref()),
                course: course.clone(),
                topic,
                group,
            }
        })
        .collect()
}
