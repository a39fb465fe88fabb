use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: u64,
    pub name: String,
    pub technology: String,
    pub description: String,
    pub link: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCourse {
    #[serde(flatten)]
    pub course: CourseRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub list_name: String,
}

impl EnrichedCourse {
    /// Card body as written to the board: description, newline, link.
    #[must_use]
    pub fn card_body(&self) -> String {
        format!("{}\n{}", self.course.description, self.course.link)
    }
}
