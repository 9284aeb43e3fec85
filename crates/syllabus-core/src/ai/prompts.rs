use chrono::{Datelike, NaiveDate};

use crate::entity::Topic;

/// Semester start assumed when the document gives week numbers but no dates.
#[must_use]
pub fn default_semester_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 9, 1).unwrap_or(today)
}

#[must_use]
pub fn topics(content: &str) -> String {
    format!(
        r#"You are reading a university course document. Locate the course plan (a weekly schedule or list of course topics).

Return one entry per week. Rate each topic relative to the others:
- EASY: introductory material with few prerequisites
- MEDIUM: builds on earlier weeks and needs some abstraction
- HARD: advanced material with many moving parts

Respond with ONLY a JSON array in this shape:
[
  {{"week": 1, "title": "Short topic name", "description": "One sentence on what is covered", "difficulty": "EASY"}}
]

Rules:
- Cover every week that appears in the plan
- Keep titles under 100 characters
- Use [] if there is no course plan

DOCUMENT:
{content}"#
    )
}

#[must_use]
pub fn deadlines(content: &str, semester_start: NaiveDate) -> String {
    let start = semester_start.format("%Y-%m-%d");
    format!(
        r#"You are reading a university course document. List every graded deadline: assignments, exams, quizzes and projects.

When the document gives only a week number, compute the date assuming week 1 starts on {start}.

Respond with ONLY a JSON array in this shape:
[
  {{"title": "Assignment 1", "date": "YYYY-MM-DD", "type": "ASSIGNMENT", "description": "What is due"}}
]

Rules:
- "type" is one of ASSIGNMENT, EXAM, QUIZ, PROJECT
- Dates use YYYY-MM-DD
- Use [] if there are no deadlines

DOCUMENT:
{content}"#
    )
}

#[must_use]
pub fn materials(content: &str) -> String {
    format!(
        r#"You are reading a university course document. List the learning materials it names: textbooks, readings, videos, websites and exercises.

Respond with ONLY a JSON array in this shape:
[
  {{"title": "Full title of the material", "type": "TEXTBOOK", "link": "https://... or empty"}}
]

Rules:
- "type" is one of TEXTBOOK, READING, VIDEO, WEBSITE, EXERCISE
- Keep each title under 300 characters
- Use [] if no materials are named

DOCUMENT:
{content}"#
    )
}

#[must_use]
pub fn difficulty(topic: &Topic) -> String {
    let description = if topic.description.is_empty() {
        "No description provided"
    } else {
        topic.description.as_str()
    };

    format!(
        "Rate the academic difficulty of this university course topic.\n\n\
         TOPIC: {}\nDESCRIPTION: {}\nWEEK: {}\n\n\
         Weigh concept complexity, required background and typical workload.\n\
         Answer with exactly one word: EASY, MEDIUM or HARD.",
        topic.title, description, topic.week
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_start_is_september_first() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        assert_eq!(
            default_semester_start(today),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_prompts_embed_content() {
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert!(topics("Week 1: Graphs").ends_with("Week 1: Graphs"));
        assert!(deadlines("Quiz 1", start).contains("2026-09-01"));
        assert!(materials("Read chapter 2").contains("TEXTBOOK"));
    }

    #[test]
    fn test_difficulty_prompt_without_description() {
        let prompt = difficulty(&Topic::new("Dynamic Programming", 7));
        assert!(prompt.contains("TOPIC: Dynamic Programming"));
        assert!(prompt.contains("No description provided"));
        assert!(prompt.contains("WEEK: 7"));
    }
}
