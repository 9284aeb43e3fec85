use std::sync::Arc;

use crate::ai::{prompts, AiService};
use crate::entity::{DifficultyLevel, Topic};

const EASY_REPLY_WORDS: &[&str] = &["easy", "basic", "introductory", "fundamental"];
const HARD_REPLY_WORDS: &[&str] = &["hard", "advanced", "complex", "expert"];

const EASY_TOPIC_WORDS: &[&str] = &["introduction", "overview", "basic"];
const HARD_TOPIC_WORDS: &[&str] = &["advanced", "complex", "research"];

/// Re-rates topic difficulty, asking the AI service when it is configured
/// and falling back to a keyword heuristic otherwise.
pub struct DifficultyEnricher {
    service: Arc<dyn AiService>,
}

impl DifficultyEnricher {
    pub fn new(service: Arc<dyn AiService>) -> Self {
        Self { service }
    }

    /// Returns rated copies of `topics` in the same order.
    pub async fn enrich(&self, topics: &[Topic]) -> Vec<Topic> {
        if topics.is_empty() {
            return Vec::new();
        }

        if !self.service.is_configured() {
            tracing::debug!(count = topics.len(), "AI unavailable, rating difficulty by keywords");
            return topics
                .iter()
                .map(|topic| topic.clone().with_difficulty(heuristic_difficulty(topic)))
                .collect();
        }

        tracing::info!(count = topics.len(), "Rating topic difficulty with AI");

        let mut rated = Vec::with_capacity(topics.len());
        for topic in topics {
            let level = self.rate(topic).await;
            rated.push(topic.clone().with_difficulty(level));
        }
        rated
    }

    async fn rate(&self, topic: &Topic) -> DifficultyLevel {
        match self.service.generate_text(&prompts::difficulty(topic)).await {
            Ok(reply) if !reply.trim().is_empty() => difficulty_from_reply(&reply),
            Ok(_) => {
                tracing::debug!(title = %topic.title, "Empty difficulty reply");
                heuristic_difficulty(topic)
            }
            Err(e) => {
                tracing::warn!(title = %topic.title, error = %e, "Difficulty rating failed");
                heuristic_difficulty(topic)
            }
        }
    }
}

/// Reads a level from a model reply: an exact label first, then keywords.
#[must_use]
pub fn difficulty_from_reply(reply: &str) -> DifficultyLevel {
    if let Ok(level) = reply.parse() {
        return level;
    }

    let lower = reply.to_lowercase();
    if EASY_REPLY_WORDS.iter().any(|w| lower.contains(w)) {
        DifficultyLevel::Easy
    } else if HARD_REPLY_WORDS.iter().any(|w| lower.contains(w)) {
        DifficultyLevel::Hard
    } else {
        DifficultyLevel::Medium
    }
}

#[must_use]
pub fn heuristic_difficulty(topic: &Topic) -> DifficultyLevel {
    let text = format!("{} {}", topic.title, topic.description).to_lowercase();
    if EASY_TOPIC_WORDS.iter().any(|w| text.contains(w)) {
        DifficultyLevel::Easy
    } else if HARD_TOPIC_WORDS.iter().any(|w| text.contains(w)) {
        DifficultyLevel::Hard
    } else {
        DifficultyLevel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GeminiClient, MockAiService};
    use crate::config::AiConfig;

    fn topics() -> Vec<Topic> {
        vec![
            Topic::new("Introduction to Networking", 1),
            Topic::new("Routing Protocols", 2),
            Topic::new("Congestion Control", 3).with_description("advanced queueing models"),
        ]
    }

    #[test]
    fn test_reply_parsing() {
        assert_eq!(difficulty_from_reply(" hard\n"), DifficultyLevel::Hard);
        assert_eq!(difficulty_from_reply("EASY"), DifficultyLevel::Easy);
        assert_eq!(
            difficulty_from_reply("This is a fundamental topic."),
            DifficultyLevel::Easy
        );
        assert_eq!(
            difficulty_from_reply("Quite advanced material"),
            DifficultyLevel::Hard
        );
        assert_eq!(difficulty_from_reply("Moderate"), DifficultyLevel::Medium);
    }

    #[test]
    fn test_heuristic() {
        let rated: Vec<DifficultyLevel> = topics().iter().map(heuristic_difficulty).collect();
        assert_eq!(
            rated,
            vec![
                DifficultyLevel::Easy,
                DifficultyLevel::Medium,
                DifficultyLevel::Hard
            ]
        );
    }

    #[tokio::test]
    async fn test_ai_rating_applied_to_every_topic() {
        let service = Arc::new(MockAiService::new().with_text("HARD"));
        let enricher = DifficultyEnricher::new(service.clone());

        let input = topics();
        let rated = enricher.enrich(&input).await;

        assert_eq!(rated.len(), 3);
        assert!(rated.iter().all(|t| t.difficulty_level == DifficultyLevel::Hard));
        assert_eq!(rated[1].title, input[1].title);
        assert_eq!(input[0].difficulty_level, DifficultyLevel::Medium);
        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_heuristic() {
        let enricher = DifficultyEnricher::new(Arc::new(MockAiService::failing()));
        let rated = enricher.enrich(&topics()).await;
        assert_eq!(rated[0].difficulty_level, DifficultyLevel::Easy);
        assert_eq!(rated[2].difficulty_level, DifficultyLevel::Hard);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back_to_heuristic() {
        let enricher = DifficultyEnricher::new(Arc::new(MockAiService::new()));
        let rated = enricher.enrich(&topics()).await;
        assert_eq!(rated[0].difficulty_level, DifficultyLevel::Easy);
        assert_eq!(rated[1].difficulty_level, DifficultyLevel::Medium);
    }

    #[tokio::test]
    async fn test_demo_mode_uses_heuristic_only() {
        let client = GeminiClient::new(AiConfig::default()).unwrap();
        let enricher = DifficultyEnricher::new(Arc::new(client));
        let rated = enricher.enrich(&topics()).await;
        assert_eq!(rated[2].difficulty_level, DifficultyLevel::Hard);
        assert!(enricher.enrich(&[]).await.is_empty());
    }
}
