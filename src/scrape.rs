use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{ScrapeArgs, TopicsArgs};
use crate::enrich::{build_topic_membership, enrich};
use crate::extract::{extract_courses, extract_topics};
use crate::fetch::Fetch;
use crate::formats::{EnrichedCourse, TopicLink};
use crate::taxonomy::{Taxonomy, validate_taxonomy};

#[derive(Debug, Clone)]
pub struct Catalog {
    pub topics: Vec<TopicLink>,
    pub courses: Vec<EnrichedCourse>,
}

/// Listing page → topic subpages → taxonomy check → enriched courses.
pub fn scrape_catalog<F: Fetch + ?Sized>(
    fetcher: &F,
    listing_url: &str,
    origin: &str,
    taxonomy: &Taxonomy,
) -> anyhow::Result<Catalog> {
    let listing = fetcher.fetch(listing_url).context("fetch listing page")?;
    let courses = extract_courses(&listing, origin).context("extract courses")?;
    let topics = extract_topics(&listing, origin).context("extract topics")?;
    tracing::info!(courses = courses.len(), topics = topics.len(), "scraped listing page");

    let membership = build_topic_membership(fetcher, &topics).context("build topic membership")?;

    let titles: Vec<&str> = topics.iter().map(|topic| topic.title.as_str()).collect();
    validate_taxonomy(taxonomy, &titles)?;

    let courses = enrich(&courses, &membership, taxonomy);
    Ok(Catalog { topics, courses })
}

pub fn run(args: ScrapeArgs) -> anyhow::Result<()> {
    let fetcher = args.source.fetcher()?;
    let taxonomy = Taxonomy::load(&PathBuf::from(&args.taxonomy))?;

    let catalog = scrape_catalog(
        &fetcher,
        &args.source.listing_url,
        &args.source.origin,
        &taxonomy,
    )?;

    match args.out.as_deref() {
        Some(out) => {
            let out_path = PathBuf::from(out);
            let file = OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&out_path)
                .with_context(|| format!("create courses output: {}", out_path.display()))?;
            write_courses(BufWriter::new(file), &catalog.courses)?;
            tracing::info!(
                out = %out_path.display(),
                courses = catalog.courses.len(),
                "wrote courses"
            );
        }
        None => write_courses(std::io::stdout().lock(), &catalog.courses)?,
    }

    Ok(())
}

pub fn topics(args: TopicsArgs) -> anyhow::Result<()> {
    let fetcher = args.source.fetcher()?;
    let listing = fetcher
        .fetch(&args.source.listing_url)
        .context("fetch listing page")?;
    let topics = extract_topics(&listing, &args.source.origin).context("extract topics")?;

    let skeleton = Taxonomy::skeleton(topics.iter().map(|topic| topic.title.as_str()));
    let yaml = serde_yaml::to_string(&skeleton).context("serialize taxonomy skeleton")?;
    std::io::stdout()
        .lock()
        .write_all(yaml.as_bytes())
        .context("write taxonomy skeleton")?;
    Ok(())
}

fn write_courses<W: Write>(mut out: W, courses: &[EnrichedCourse]) -> anyhow::Result<()> {
    for course in courses {
        serde_json::to_writer(&mut out, course).context("write course json")?;
        out.write_all(b"\n").context("write course newline")?;
    }
    out.flush().context("flush courses")?;
    Ok(())
}
