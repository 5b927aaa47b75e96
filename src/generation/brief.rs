use chrono::{Local, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::BlogConfig;
use crate::error::{BlogError, Result};

/// Post date format the validator accepts.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// What the writer agent is asked to produce for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritingBrief {
    pub label: String,
    pub date: String,
    pub author: String,
    pub read_time: String,
    pub topic: String,
    pub cover_dir: String,
}

impl WritingBrief {
    /// Pick byline, read time and topic angle at random from the configured
    /// sets.
    pub fn draw(config: &BlogConfig, date: NaiveDate, rng: &mut impl Rng) -> Result<Self> {
        let author = pick(&config.post.authors, "authors", rng)?;
        let read_time = pick(&config.post.read_times, "read times", rng)?;
        let topic = pick(&config.generation.topics, "topics", rng)?;

        Ok(Self {
            label: config.post.label.clone(),
            date: date.format(DATE_FORMAT).to_string(),
            author,
            read_time,
            topic,
            cover_dir: config.post.cover_dir.trim_end_matches('/').to_string(),
        })
    }

    /// Environment handed to the generator process.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("BLOG_LABEL", self.label.clone()),
            ("BLOG_DATE", self.date.clone()),
            ("BLOG_AUTHOR", self.author.clone()),
            ("BLOG_READ_TIME", self.read_time.clone()),
            ("BLOG_TOPIC", self.topic.clone()),
            ("BLOG_BRIEF", self.render()),
        ]
    }

    pub fn render(&self) -> String {
        format!(
            r#"# Research angle

{topic}

Return one specific trending AI topic: what it is, why it matters now,
current market context and adoption, and its implications for small and
medium businesses.

# Blog post

Adapt that topic for small and medium businesses and write a complete post
in Spanish using EXACTLY this JSON format:

{{
    "label": "{label}",
    "title": "[Compelling title about the chosen topic]",
    "date": "{date}",
    "author": "{author}",
    "readTime": "{read_time}",
    "summary": "[2-3 sentence summary that hooks the reader]",
    "coverImage": "{cover_dir}/[slug].jpeg",
    "slug": "[url-friendly-slug]",
    "content": "[Full blog post content in markdown format]"
}}

## Requirements

- 800-1200 words, conversational but professional
- coverImage must be exactly "{cover_dir}/<slug>.jpeg" for the generated slug
- slug: lowercase letters, digits and hyphens only
- date format DD/MM/YYYY
- titles in Spanish sentence case
- no placeholders such as "[company name]"
- save the JSON to "<slug>.json" in the working directory

## JSON formatting

- the file must be one complete JSON object ending with a closing brace
- escape every string; use \n for line breaks inside content
- no raw control characters"#,
            topic = self.topic,
            label = self.label,
            date = self.date,
            author = self.author,
            read_time = self.read_time,
            cover_dir = self.cover_dir,
        )
    }
}

fn pick(values: &[String], what: &str, rng: &mut impl Rng) -> Result<String> {
    values
        .choose(rng)
        .cloned()
        .ok_or_else(|| BlogError::Config(format!("no {what} configured")))
}
