use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::error::MalformedPageError;
use crate::formats::{CourseRecord, TopicLink};

const LISTING_PAGE: &str = "listing";
const TOPIC_PAGE: &str = "topic";

const EXPLORE_SECTION: &str = ".courses__explore";
const COURSE_BLOCK: &str = ".course-block";
const COURSE_TITLE: &str = ".course-block__title";
const COURSE_DESCRIPTION: &str = ".course-block__description";
const COURSE_LENGTH: &str = ".course-block__length";
const COURSE_AUTHOR: &str = ".course-block__author-name";
const TOPIC_BLOCK: &str = ".topic-block";
const TOPIC_TITLE: &str = ".topic-block__title";
const ANCHOR_WITH_HREF: &str = "a[href]";

const COURSE_LINK: ClassPrefix = ClassPrefix("course-block__link");
const COURSE_TECHNOLOGY: ClassPrefix = ClassPrefix("course-block__technology");

/// A class family where the variant is encoded as a suffix of a fixed prefix,
/// e.g. `course-block__technology--python`.
#[derive(Debug, Clone, Copy)]
struct ClassPrefix(&'static str);

impl ClassPrefix {
    fn matches(self, element: &ElementRef<'_>) -> bool {
        element
            .value()
            .classes()
            .any(|class| class.starts_with(self.0))
    }

    /// First element at or below `root` carrying a class of this family.
    fn first_within(self, root: ElementRef<'_>) -> Option<ElementRef<'_>> {
        root.descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| self.matches(element))
    }

    /// The suffix after the prefix with every `-` removed, so
    /// `course-block__technology--sql-server` yields `sqlserver`.
    fn variant(self, element: &ElementRef<'_>) -> Option<String> {
        element.value().classes().find_map(|class| {
            let rest: String = class.strip_prefix(self.0)?.replace('-', "");
            (!rest.is_empty()).then_some(rest)
        })
    }
}

struct Selectors {
    explore: Selector,
    course_block: Selector,
    title: Selector,
    description: Selector,
    length: Selector,
    author: Selector,
    topic_block: Selector,
    topic_title: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            explore: selector(EXPLORE_SECTION)?,
            course_block: selector(COURSE_BLOCK)?,
            title: selector(COURSE_TITLE)?,
            description: selector(COURSE_DESCRIPTION)?,
            length: selector(COURSE_LENGTH)?,
            author: selector(COURSE_AUTHOR)?,
            topic_block: selector(TOPIC_BLOCK)?,
            topic_title: selector(TOPIC_TITLE)?,
            anchor: selector(ANCHOR_WITH_HREF)?,
        })
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector `{css}`: {err:?}"))
}

/// The `.courses__explore` section holding the course blocks of `page`.
fn explore_section<'a>(
    doc: &'a Html,
    selectors: &Selectors,
    page: &'static str,
) -> Result<ElementRef<'a>, MalformedPageError> {
    doc.select(&selectors.explore).next().ok_or_else(|| {
        MalformedPageError::new(page, format!("missing `{EXPLORE_SECTION}` section"))
    })
}

/// Extracts every course block of the listing page, keyed by `data-id`.
/// A repeated id keeps the later block.
pub fn extract_courses(doc: &Html, origin: &str) -> anyhow::Result<BTreeMap<u64, CourseRecord>> {
    let selectors = Selectors::new()?;
    let explore = explore_section(doc, &selectors, LISTING_PAGE)?;

    let mut courses = BTreeMap::new();
    for (index, block) in explore.select(&selectors.course_block).enumerate() {
        let record = parse_course_block(&selectors, block, origin).map_err(|detail| {
            MalformedPageError::new(LISTING_PAGE, format!("course block #{index}: {detail}"))
        })?;
        if let Some(previous) = courses.insert(record.id, record) {
            tracing::debug!(
                id = previous.id,
                name = %previous.name,
                "duplicate course id; later block wins"
            );
        }
    }

    tracing::debug!(count = courses.len(), "extracted courses");
    Ok(courses)
}

/// Extracts the topic links of the listing page in document order.
pub fn extract_topics(doc: &Html, origin: &str) -> anyhow::Result<Vec<TopicLink>> {
    let selectors = Selectors::new()?;

    let mut topics = Vec::new();
    for (index, block) in doc.select(&selectors.topic_block).enumerate() {
        let title = block
            .select(&selectors.topic_title)
            .next()
            .map(text_of)
            .ok_or_else(|| {
                MalformedPageError::new(
                    LISTING_PAGE,
                    format!("topic block #{index}: missing `{TOPIC_TITLE}`"),
                )
            })?;
        let href = block
            .value()
            .attr("href")
            .or_else(|| {
                block
                    .select(&selectors.anchor)
                    .next()
                    .and_then(|anchor| anchor.value().attr("href"))
            })
            .ok_or_else(|| {
                MalformedPageError::new(
                    LISTING_PAGE,
                    format!("topic block #{index} ({title}): missing href"),
                )
            })?;

        topics.push(TopicLink {
            url: absolute_url(origin, href),
            title,
        });
    }

    tracing::debug!(count = topics.len(), "extracted topics");
    Ok(topics)
}

/// Course names listed in the explore section of a topic subpage, in
/// document order.
pub fn extract_course_names_for_topic(doc: &Html) -> anyhow::Result<Vec<String>> {
    let selectors = Selectors::new()?;
    let explore = explore_section(doc, &selectors, TOPIC_PAGE)?;

    explore
        .select(&selectors.course_block)
        .enumerate()
        .map(|(index, block)| {
            block
                .select(&selectors.title)
                .next()
                .map(text_of)
                .ok_or_else(|| {
                    anyhow::Error::from(MalformedPageError::new(
                        TOPIC_PAGE,
                        format!("course block #{index}: missing `{COURSE_TITLE}`"),
                    ))
                })
        })
        .collect()
}

fn parse_course_block(
    selectors: &Selectors,
    block: ElementRef<'_>,
    origin: &str,
) -> Result<CourseRecord, String> {
    let required = |selector: &Selector, css: &str| {
        block
            .select(selector)
            .next()
            .map(text_of)
            .ok_or_else(|| format!("missing `{css}`"))
    };

    let name = required(&selectors.title, COURSE_TITLE)?;
    let description = required(&selectors.description, COURSE_DESCRIPTION)?;
    let duration = required(&selectors.length, COURSE_LENGTH)?;
    let author = block.select(&selectors.author).next().map(text_of);

    let link = COURSE_LINK
        .first_within(block)
        .ok_or_else(|| format!("missing `.{}*` link", COURSE_LINK.0))?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| "course link has no href".to_owned())?;

    let technology = COURSE_TECHNOLOGY
        .first_within(block)
        .ok_or_else(|| format!("missing `.{}*` tag", COURSE_TECHNOLOGY.0))?;
    let technology = COURSE_TECHNOLOGY
        .variant(&technology)
        .ok_or_else(|| "technology tag has no variant class".to_owned())?;

    let raw_id = std::iter::once(block)
        .chain(block.ancestors().filter_map(ElementRef::wrap))
        .find_map(|element| element.value().attr("data-id"))
        .ok_or_else(|| "no `data-id` on the block or its ancestors".to_owned())?;
    let id = raw_id
        .trim()
        .parse::<u64>()
        .map_err(|err| format!("invalid data-id {raw_id:?}: {err}"))?;

    Ok(CourseRecord {
        id,
        name,
        technology,
        description,
        link: absolute_url(origin, href),
        duration,
        author,
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn absolute_url(origin: &str, href: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}
