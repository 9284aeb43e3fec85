use chrono::NaiveDateTime;
use regex::{Captures, Regex};

use super::ExtractionStrategy;
use crate::entity::{Deadline, DeadlineType, DifficultyLevel, Material, MaterialType, Topic};
use crate::normalize::{self, date_from_parts};

const TOPIC_PATTERN: &str = r"(?im)\b(?:week|lecture|topic|chapter|module|session|lesson)[ \t]*(\d+)[ \t]*[:\-.)]?[ \t]*([^\r\n]{5,100})";

const DEADLINE_PATTERN: &str = r"(?i)\b(assignment|homework|midterm|final|endterm|exam|test|quiz|project)s?\b[^\n]*?(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b";

const MATERIAL_PATTERN: &str = r#"(?im)\b(textbook|book|reading|material|resource|video|website|exercise)s?\b[ \t]*[:\-][ \t]*(?:"([^"\r\n]+)"|([^\r\n]+))"#;

const MAX_TOPICS: usize = 25;
const MAX_DEADLINES: usize = 15;
const MIN_TOPIC_TITLE_CHARS: usize = 5;
const MIN_MATERIAL_TITLE_CHARS: usize = 10;
const MIN_CONTENT_CHARS: usize = 50;

const TOPIC_BOILERPLATE: &[&str] = &["syllabus", "introduction to course", "table of contents"];
const MATERIAL_FILLER: &[&str] = &["see above", "as needed", "various"];

const TOPIC_DESCRIPTION: &str = "Extracted from syllabus structure";
const DEADLINE_DESCRIPTION: &str = "Automatically extracted deadline";

/// Regex-driven heuristic extractor. Fast, offline, and always available
/// for anything longer than a couple of sentences.
pub struct PatternStrategy {
    topic: Regex,
    deadline: Regex,
    material: Regex,
}

impl PatternStrategy {
    pub const NAME: &'static str = "pattern";
    pub const PRIORITY: i32 = 50;

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            topic: Regex::new(TOPIC_PATTERN)?,
            deadline: Regex::new(DEADLINE_PATTERN)?,
            material: Regex::new(MATERIAL_PATTERN)?,
        })
    }

    pub fn find_topics(&self, content: &str) -> Vec<Topic> {
        let mut topics = Vec::new();

        for caps in self.topic.captures_iter(content) {
            if topics.len() >= MAX_TOPICS {
                break;
            }

            let Ok(week) = caps[1].parse::<u32>() else {
                tracing::debug!(week = &caps[1], "Invalid week number");
                continue;
            };
            let title = caps[2]
                .trim()
                .trim_start_matches([':', '-', '.', ')'])
                .trim();

            if !is_valid_topic(title) {
                tracing::debug!(title, "Skipping boilerplate topic");
                continue;
            }

            topics.push(
                Topic::new(title, week)
                    .with_description(TOPIC_DESCRIPTION)
                    .with_difficulty(DifficultyLevel::Medium),
            );
        }

        tracing::debug!(count = topics.len(), "Pattern strategy extracted topics");
        topics
    }

    /// Deadlines with explicit dates. When the text has none, two exams are
    /// scheduled relative to `now` so callers always get a deadline set.
    pub fn find_deadlines(&self, content: &str, now: NaiveDateTime) -> Vec<Deadline> {
        let mut deadlines = Vec::new();

        for caps in self.deadline.captures_iter(content) {
            if deadlines.len() >= MAX_DEADLINES {
                break;
            }

            let Some(date) = date_from_captures(&caps) else {
                tracing::debug!(matched = &caps[0], "Invalid deadline date");
                continue;
            };
            let keyword = &caps[1];

            deadlines.push(
                Deadline::new(
                    &format!("{} {}", keyword, deadlines.len() + 1),
                    date,
                    DeadlineType::from_keyword(keyword),
                )
                .with_description(DEADLINE_DESCRIPTION),
            );
        }

        if deadlines.is_empty() {
            tracing::debug!("No dated deadlines found, using defaults");
            return default_deadlines(now);
        }

        tracing::debug!(count = deadlines.len(), "Pattern strategy extracted deadlines");
        deadlines
    }

    pub fn find_materials(&self, content: &str) -> Vec<Material> {
        let materials: Vec<Material> = self
            .material
            .captures_iter(content)
            .filter_map(|caps| {
                let title = caps.get(2).or_else(|| caps.get(3))?.as_str();
                let title = title.trim().trim_matches('"').trim();
                if !is_valid_material(title) {
                    tracing::debug!(title, "Skipping filler material");
                    return None;
                }
                Some(Material::new(title, MaterialType::from_keyword(&caps[1])))
            })
            .collect();

        tracing::debug!(count = materials.len(), "Pattern strategy extracted materials");
        materials
    }
}

#[async_trait::async_trait]
impl ExtractionStrategy for PatternStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn supports(&self, content: &str) -> bool {
        content.chars().count() > MIN_CONTENT_CHARS
    }

    fn confidence(&self, content: &str) -> u8 {
        let mut score: u32 = 30;

        if self.topic.is_match(content) {
            score += 20;
        }
        if self.deadline.is_match(content) {
            score += 20;
        }
        if self.material.is_match(content) {
            score += 15;
        }

        let lower = content.to_lowercase();
        if lower.contains("week") && lower.contains("topic") {
            score += 15;
        }

        u8::try_from(score.min(100)).unwrap_or(100)
    }

    async fn extract_topics(&self, content: &str) -> Vec<Topic> {
        self.find_topics(content)
    }

    async fn extract_deadlines(&self, content: &str) -> Vec<Deadline> {
        self.find_deadlines(content, normalize::now())
    }

    async fn extract_materials(&self, content: &str) -> Vec<Material> {
        self.find_materials(content)
    }
}

fn is_valid_topic(title: &str) -> bool {
    let lower = title.to_lowercase();
    title.chars().count() >= MIN_TOPIC_TITLE_CHARS
        && !TOPIC_BOILERPLATE.iter().any(|phrase| lower.contains(phrase))
}

fn is_valid_material(title: &str) -> bool {
    let lower = title.to_lowercase();
    title.chars().count() >= MIN_MATERIAL_TITLE_CHARS
        && !MATERIAL_FILLER.iter().any(|phrase| lower.contains(phrase))
}

fn date_from_captures(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    let year = caps[4].parse().ok()?;
    date_from_parts(month, day, year)
}

fn default_deadlines(now: NaiveDateTime) -> Vec<Deadline> {
    vec![
        Deadline::new(
            "Midterm Examination",
            normalize::weeks_from(now, 5),
            DeadlineType::Exam,
        )
        .with_description("Midterm exam covering the first half of the course"),
        Deadline::new(
            "Final Examination",
            normalize::weeks_from(now, 10),
            DeadlineType::Exam,
        )
        .with_description("Final exam covering the whole course"),
    ]
}
