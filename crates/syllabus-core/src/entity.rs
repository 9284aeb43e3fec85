use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalize::{truncate_title, MATERIAL_TITLE_MAX_CHARS, TITLE_MAX_CHARS};

pub const UNNAMED_TOPIC: &str = "Unnamed Topic";
pub const UNNAMED_DEADLINE: &str = "Unnamed Deadline";
pub const UNNAMED_MATERIAL: &str = "Unnamed Material";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Case-insensitive label lookup; anything unrecognized is `Medium`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EASY" => Ok(Self::Easy),
            "MEDIUM" => Ok(Self::Medium),
            "HARD" => Ok(Self::Hard),
            _ => Err(crate::Error::InvalidDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    #[default]
    Assignment,
    Exam,
    Quiz,
    Project,
}

impl DeadlineType {
    pub const ALL: [Self; 4] = [Self::Assignment, Self::Exam, Self::Quiz, Self::Project];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "ASSIGNMENT",
            Self::Exam => "EXAM",
            Self::Quiz => "QUIZ",
            Self::Project => "PROJECT",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// Maps a keyword found in free text ("Midterm", "final exam", "Quiz 3")
    /// by substring, so variants of the same word land on one type.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        if ["exam", "midterm", "final", "endterm", "test"]
            .iter()
            .any(|k| keyword.contains(k))
        {
            Self::Exam
        } else if keyword.contains("quiz") {
            Self::Quiz
        } else if keyword.contains("project") {
            Self::Project
        } else {
            Self::Assignment
        }
    }
}

impl std::fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeadlineType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSIGNMENT" => Ok(Self::Assignment),
            "EXAM" => Ok(Self::Exam),
            "QUIZ" => Ok(Self::Quiz),
            "PROJECT" => Ok(Self::Project),
            _ => Err(crate::Error::InvalidDeadlineType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialType {
    Textbook,
    #[default]
    Reading,
    Video,
    Website,
    Exercise,
}

impl MaterialType {
    pub const ALL: [Self; 5] = [
        Self::Textbook,
        Self::Reading,
        Self::Video,
        Self::Website,
        Self::Exercise,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Textbook => "TEXTBOOK",
            Self::Reading => "READING",
            Self::Video => "VIDEO",
            Self::Website => "WEBSITE",
            Self::Exercise => "EXERCISE",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        if keyword.contains("book") {
            Self::Textbook
        } else if keyword.contains("video") {
            Self::Video
        } else if keyword.contains("website") || keyword.contains("resource") {
            Self::Website
        } else if keyword.contains("exercise") {
            Self::Exercise
        } else {
            Self::Reading
        }
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaterialType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXTBOOK" => Ok(Self::Textbook),
            "READING" => Ok(Self::Reading),
            "VIDEO" => Ok(Self::Video),
            "WEBSITE" => Ok(Self::Website),
            "EXERCISE" => Ok(Self::Exercise),
            _ => Err(crate::Error::InvalidMaterialType(s.to_string())),
        }
    }
}

/// A unit of course content, usually one week of the course plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub title: String,
    pub week: u32,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
}

impl Topic {
    /// Builds a topic with a trimmed, length-capped title. A blank title
    /// becomes [`UNNAMED_TOPIC`] and week 0 becomes week 1.
    #[must_use]
    pub fn new(title: &str, week: u32) -> Self {
        Self {
            title: normalized_title(title, UNNAMED_TOPIC, TITLE_MAX_CHARS),
            week: week.max(1),
            description: String::new(),
            difficulty_level: DifficultyLevel::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.difficulty_level = difficulty;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub title: String,
    pub date: NaiveDateTime,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    pub description: String,
}

impl Deadline {
    #[must_use]
    pub fn new(title: &str, date: NaiveDateTime, deadline_type: DeadlineType) -> Self {
        Self {
            title: normalized_title(title, UNNAMED_DEADLINE, TITLE_MAX_CHARS),
            date,
            deadline_type,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub link: String,
}

impl Material {
    #[must_use]
    pub fn new(title: &str, material_type: MaterialType) -> Self {
        Self {
            title: normalized_title(title, UNNAMED_MATERIAL, MATERIAL_TITLE_MAX_CHARS),
            material_type,
            link: String::new(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }
}

fn normalized_title(title: &str, placeholder: &str, max_chars: usize) -> String {
    let title = title.trim();
    if title.is_empty() {
        placeholder.to_string()
    } else {
        truncate_title(title, max_chars)
    }
}
