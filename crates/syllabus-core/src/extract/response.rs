//! Tolerant parsing of AI replies into entities.
//!
//! Replies are expected to be a JSON array of objects, but may arrive
//! fence-wrapped, with alternate field names, missing fields, or odd value
//! types. Each logical attribute lists its accepted field names in lookup
//! order; the first non-blank one wins.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::Category;
use crate::entity::{
    Deadline, DeadlineType, DifficultyLevel, Material, MaterialType, Topic, UNNAMED_DEADLINE,
    UNNAMED_MATERIAL, UNNAMED_TOPIC,
};
use crate::normalize::{default_due_date, parse_timestamp};

const FENCE: &str = "```";

const TITLE_FIELDS: &[&str] = &["title", "name"];
const WEEK_FIELDS: &[&str] = &["week", "weekNumber", "week_number"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "summary"];
const DIFFICULTY_FIELDS: &[&str] = &["difficulty", "difficultyLevel", "difficulty_level"];
const DATE_FIELDS: &[&str] = &["date", "dueDate", "due_date"];
const TYPE_FIELDS: &[&str] = &["type", "category"];
const LINK_FIELDS: &[&str] = &["link", "url"];

/// Removes a surrounding Markdown code fence and its language tag.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

#[must_use]
pub fn parse_topics(raw: &str) -> Vec<Topic> {
    parse_items(raw, Category::Topics, topic_from_value)
}

/// Deadlines whose date can't be read fall due two weeks after `now`.
#[must_use]
pub fn parse_deadlines(raw: &str, now: NaiveDateTime) -> Vec<Deadline> {
    parse_items(raw, Category::Deadlines, |value| deadline_from_value(value, now))
}

#[must_use]
pub fn parse_materials(raw: &str) -> Vec<Material> {
    parse_items(raw, Category::Materials, material_from_value)
}

fn parse_items<T, F>(raw: &str, category: Category, parse: F) -> Vec<T>
where
    F: Fn(&Value) -> Result<T, String>,
{
    let cleaned = strip_code_fence(raw);
    tracing::debug!(%category, cleaned_len = cleaned.len(), "Parsing AI response");

    let items = match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!(%category, "AI response is not a JSON array");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(%category, error = %e, "Failed to parse AI response");
            tracing::debug!(%category, raw, "Raw AI response");
            return Vec::new();
        }
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .iter()
        .filter_map(|item| match parse(item) {
            Ok(entity) => Some(entity),
            Err(reason) => {
                tracing::warn!(%category, %reason, "Skipping malformed AI entry");
                tracing::debug!(%category, item = %item, "Problematic entry");
                None
            }
        })
        .collect();

    tracing::info!(%category, parsed = parsed.len(), total, "Parsed AI response");
    parsed
}

fn topic_from_value(value: &Value) -> Result<Topic, String> {
    let obj = as_object(value)?;

    let title = text_field(obj, TITLE_FIELDS).unwrap_or_else(|| UNNAMED_TOPIC.to_string());
    let week = int_field(obj, WEEK_FIELDS).filter(|w| *w > 0).unwrap_or(1);
    let description = text_field(obj, DESCRIPTION_FIELDS).unwrap_or_default();
    let difficulty = text_field(obj, DIFFICULTY_FIELDS)
        .map_or_else(DifficultyLevel::default, |d| DifficultyLevel::from_label(&d));

    Ok(Topic::new(&title, week)
        .with_description(description)
        .with_difficulty(difficulty))
}

fn deadline_from_value(value: &Value, now: NaiveDateTime) -> Result<Deadline, String> {
    let obj = as_object(value)?;

    let title = text_field(obj, TITLE_FIELDS).unwrap_or_else(|| UNNAMED_DEADLINE.to_string());
    let date = text_field(obj, DATE_FIELDS)
        .and_then(|raw| {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                tracing::debug!(date = %raw, "Unreadable deadline date");
            }
            parsed
        })
        .unwrap_or_else(|| default_due_date(now));
    let deadline_type = text_field(obj, TYPE_FIELDS)
        .map_or_else(DeadlineType::default, |t| DeadlineType::from_label(&t));
    let description = text_field(obj, DESCRIPTION_FIELDS).unwrap_or_default();

    Ok(Deadline::new(&title, date, deadline_type).with_description(description))
}

fn material_from_value(value: &Value) -> Result<Material, String> {
    let obj = as_object(value)?;

    let title = text_field(obj, TITLE_FIELDS).unwrap_or_else(|| UNNAMED_MATERIAL.to_string());
    let material_type = text_field(obj, TYPE_FIELDS)
        .map_or_else(MaterialType::default, |t| MaterialType::from_label(&t));
    let link = text_field(obj, LINK_FIELDS).unwrap_or_default();

    Ok(Material::new(&title, material_type).with_link(link))
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", kind_of(value)))
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| !is_blank(value))
}

fn text_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    match field(obj, names)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn int_field(obj: &Map<String, Value>, names: &[&str]) -> Option<u32> {
    match field(obj, names)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TITLE_MAX_CHARS;

    fn fixed_now() -> NaiveDateTime {
        parse_timestamp("2026-01-05T10:00:00").unwrap()
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  ```JSON[1, 2]```  "), "[1, 2]");
        assert_eq!(strip_code_fence("[3]"), "[3]");
        assert_eq!(strip_code_fence("```json\n[4]"), "[4]");
    }

    #[test]
    fn test_fenced_empty_array_yields_nothing() {
        assert!(parse_topics("```json\n[]\n```").is_empty());
    }

    #[test]
    fn test_non_array_and_garbage_yield_nothing() {
        assert!(parse_topics("{\"week\": 1}").is_empty());
        assert!(parse_topics("Sorry, I can't help with that.").is_empty());
        assert!(parse_materials("").is_empty());
    }

    #[test]
    fn test_topic_fields_and_defaults() {
        let raw = r#"[
            {"week": 2, "title": "Graphs", "description": "BFS and DFS", "difficulty": "hard"},
            {"title": "Trees", "difficulty": "unknown"},
            {"week": "3", "name": "Heaps"},
            {}
        ]"#;
        let topics = parse_topics(raw);
        assert_eq!(topics.len(), 4);

        assert_eq!(topics[0].week, 2);
        assert_eq!(topics[0].difficulty_level, DifficultyLevel::Hard);
        assert_eq!(topics[0].description, "BFS and DFS");

        assert_eq!(topics[1].week, 1);
        assert_eq!(topics[1].difficulty_level, DifficultyLevel::Medium);

        assert_eq!(topics[2].week, 3);
        assert_eq!(topics[2].title, "Heaps");

        assert_eq!(topics[3].title, UNNAMED_TOPIC);
        assert!(topics[3].description.is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped_not_fatal() {
        let raw = r#"[{"title": "Kept"}, 42, "text", null, {"title": "Also kept"}]"#;
        let topics = parse_topics(raw);
        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "Also kept"]);
    }

    #[test]
    fn test_topic_title_truncated() {
        let raw = format!(r#"[{{"title": "{}"}}]"#, "z".repeat(600));
        let topics = parse_topics(&raw);
        assert_eq!(topics[0].title.chars().count(), TITLE_MAX_CHARS);
        assert!(topics[0].title.ends_with("..."));
    }

    #[test]
    fn test_deadline_date_aliases() {
        let raw = r#"[
            {"title": "HW 1", "date": "2026-02-01", "type": "assignment"},
            {"title": "Midterm", "date": "", "dueDate": "2026-03-10T14:00:00", "type": "EXAM"},
            {"title": "Quiz", "due_date": "2026-03-20", "type": "Quiz"},
            {"title": "Mystery", "date": "sometime soon", "type": "party"}
        ]"#;
        let deadlines = parse_deadlines(raw, fixed_now());
        assert_eq!(deadlines.len(), 4);

        assert_eq!(deadlines[0].date.to_string(), "2026-02-01 23:59:59");
        assert_eq!(deadlines[0].deadline_type, DeadlineType::Assignment);

        assert_eq!(deadlines[1].date.to_string(), "2026-03-10 14:00:00");
        assert_eq!(deadlines[1].deadline_type, DeadlineType::Exam);

        assert_eq!(deadlines[2].deadline_type, DeadlineType::Quiz);

        assert_eq!(deadlines[3].date.to_string(), "2026-01-19 23:59:59");
        assert_eq!(deadlines[3].deadline_type, DeadlineType::Assignment);
    }

    #[test]
    fn test_deadline_missing_everything() {
        let deadlines = parse_deadlines("[{}]", fixed_now());
        assert_eq!(deadlines[0].title, UNNAMED_DEADLINE);
        assert_eq!(deadlines[0].date.to_string(), "2026-01-19 23:59:59");
    }

    #[test]
    fn test_material_link_aliases() {
        let raw = r#"```json
[
  {"title": "Algorithms Illuminated", "type": "textbook", "link": "https://example.org/book"},
  {"title": "Lecture recordings", "type": "VIDEO", "url": "https://example.org/videos"},
  {"title": "Problem set", "type": "worksheet"}
]
```"#;
        let materials = parse_materials(raw);
        assert_eq!(materials.len(), 3);
        assert_eq!(materials[0].material_type, MaterialType::Textbook);
        assert_eq!(materials[0].link, "https://example.org/book");
        assert_eq!(materials[1].material_type, MaterialType::Video);
        assert_eq!(materials[1].link, "https://example.org/videos");
        assert_eq!(materials[2].material_type, MaterialType::Reading);
        assert!(materials[2].link.is_empty());
    }

    #[test]
    fn test_material_title_cap() {
        let raw = format!(r#"[{{"title": "{}"}}]"#, "m".repeat(1000));
        let materials = parse_materials(&raw);
        assert_eq!(materials[0].title.chars().count(), 900);
    }
}
