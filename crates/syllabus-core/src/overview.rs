use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entity::{Deadline, DifficultyLevel};
use crate::extractor::SyllabusExtraction;

pub const MAX_UPCOMING_DEADLINES: usize = 5;

/// Summary figures for a finished extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOverview {
    /// Highest week any topic falls in
    pub total_weeks: u32,
    pub topic_count: usize,
    pub deadline_count: usize,
    pub material_count: usize,
    /// Soonest deadlines after `now`, earliest first
    pub upcoming_deadlines: Vec<Deadline>,
    pub difficulty_breakdown: DifficultyBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyBreakdown {
    pub fn record(&mut self, level: DifficultyLevel) {
        match level {
            DifficultyLevel::Easy => self.easy += 1,
            DifficultyLevel::Medium => self.medium += 1,
            DifficultyLevel::Hard => self.hard += 1,
        }
    }
}

impl CourseOverview {
    #[must_use]
    pub fn build(extraction: &SyllabusExtraction, now: NaiveDateTime) -> Self {
        let total_weeks = extraction.topics.iter().map(|t| t.week).max().unwrap_or(0);

        let mut upcoming: Vec<Deadline> = extraction
            .deadlines
            .iter()
            .filter(|d| d.date > now)
            .cloned()
            .collect();
        upcoming.sort_by_key(|d| d.date);
        upcoming.truncate(MAX_UPCOMING_DEADLINES);

        let mut difficulty_breakdown = DifficultyBreakdown::default();
        for topic in &extraction.topics {
            difficulty_breakdown.record(topic.difficulty_level);
        }

        Self {
            total_weeks,
            topic_count: extraction.topics.len(),
            deadline_count: extraction.deadlines.len(),
            material_count: extraction.materials.len(),
            upcoming_deadlines: upcoming,
            difficulty_breakdown,
        }
    }
}
