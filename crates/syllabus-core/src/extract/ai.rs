use std::sync::Arc;

use super::response::{parse_deadlines, parse_materials, parse_topics};
use super::ExtractionStrategy;
use crate::ai::AiService;
use crate::entity::{Deadline, Material, Topic};
use crate::normalize;

/// Below this many characters a document isn't worth a model call.
const MIN_CONTENT_CHARS: usize = 200;
const CONFIDENCE: u8 = 85;

/// Delegates extraction to an [`AiService`] and normalizes its replies.
///
/// Service failures never escape: they are logged and the category comes
/// back empty, which lets the orchestrator move on to other strategies.
pub struct AiStrategy {
    service: Arc<dyn AiService>,
    demo_mode: bool,
}

impl AiStrategy {
    pub const NAME: &'static str = "ai";
    pub const PRIORITY: i32 = 1;

    pub fn new(service: Arc<dyn AiService>, demo_mode: bool) -> Self {
        if demo_mode {
            tracing::info!("AI strategy running in demo mode");
        }
        Self { service, demo_mode }
    }

    /// Demo mode follows whether the service has usable credentials.
    pub fn from_service(service: Arc<dyn AiService>) -> Self {
        let demo_mode = !service.is_configured();
        Self::new(service, demo_mode)
    }

    pub const fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }
}

#[async_trait::async_trait]
impl ExtractionStrategy for AiStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn supports(&self, content: &str) -> bool {
        !self.demo_mode && content.chars().count() > MIN_CONTENT_CHARS
    }

    fn confidence(&self, _content: &str) -> u8 {
        if self.demo_mode {
            0
        } else {
            CONFIDENCE
        }
    }

    async fn extract_topics(&self, content: &str) -> Vec<Topic> {
        if self.demo_mode {
            return Vec::new();
        }
        match self.service.extract_topics(content).await {
            Ok(raw) => parse_topics(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "AI topic extraction failed");
                Vec::new()
            }
        }
    }

    async fn extract_deadlines(&self, content: &str) -> Vec<Deadline> {
        if self.demo_mode {
            return Vec::new();
        }
        match self.service.extract_deadlines(content).await {
            Ok(raw) => parse_deadlines(&raw, normalize::now()),
            Err(e) => {
                tracing::warn!(error = %e, "AI deadline extraction failed");
                Vec::new()
            }
        }
    }

    async fn extract_materials(&self, content: &str) -> Vec<Material> {
        if self.demo_mode {
            return Vec::new();
        }
        match self.service.extract_materials(content).await {
            Ok(raw) => parse_materials(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "AI material extraction failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockAiService;
    use crate::entity::{DeadlineType, DifficultyLevel};

    fn long_text() -> String {
        "Week 1: Introduction to distributed systems and course logistics. ".repeat(5)
    }

    #[test]
    fn test_demo_mode_is_never_admissible() {
        let strategy = AiStrategy::new(Arc::new(MockAiService::new()), true);
        assert!(!strategy.supports(&long_text()));
        assert_eq!(strategy.confidence(&long_text()), 0);
    }

    #[test]
    fn test_supports_requires_long_content() {
        let strategy = AiStrategy::from_service(Arc::new(MockAiService::new()));
        assert!(!strategy.is_demo_mode());
        assert!(!strategy.supports("Week 1: Short"));
        assert!(strategy.supports(&long_text()));
        assert_eq!(strategy.confidence("anything"), 85);
    }

    #[tokio::test]
    async fn test_demo_mode_skips_service() {
        let service = Arc::new(MockAiService::new().with_topics(r#"[{"title": "Never"}]"#));
        let strategy = AiStrategy::new(service.clone(), true);

        assert!(strategy.extract_topics(&long_text()).await.is_empty());
        assert!(strategy.extract_deadlines(&long_text()).await.is_empty());
        assert!(strategy.extract_materials(&long_text()).await.is_empty());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_fenced_empty_reply() {
        let service = Arc::new(MockAiService::new().with_topics("```json\n[]\n```"));
        let strategy = AiStrategy::from_service(service);
        assert!(strategy.extract_topics(&long_text()).await.is_empty());
    }

    #[tokio::test]
    async fn test_replies_are_normalized() {
        let service = Arc::new(
            MockAiService::new()
                .with_topics(r#"[{"week": 4, "title": "Consensus", "difficulty": "HARD"}]"#)
                .with_deadlines(r#"[{"title": "Lab 2", "dueDate": "2026-04-01", "type": "project"}]"#)
                .with_materials(r#"[{"title": "Designing Data-Intensive Apps", "type": "textbook"}]"#),
        );
        let strategy = AiStrategy::from_service(service.clone());
        let text = long_text();

        let topics = strategy.extract_topics(&text).await;
        assert_eq!(topics[0].week, 4);
        assert_eq!(topics[0].difficulty_level, DifficultyLevel::Hard);

        let deadlines = strategy.extract_deadlines(&text).await;
        assert_eq!(deadlines[0].deadline_type, DeadlineType::Project);
        assert_eq!(deadlines[0].date.to_string(), "2026-04-01 23:59:59");

        let materials = strategy.extract_materials(&text).await;
        assert_eq!(materials.len(), 1);

        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_service_failure_yields_empty() {
        let service = Arc::new(MockAiService::failing());
        let strategy = AiStrategy::from_service(service.clone());

        assert!(strategy.extract_topics(&long_text()).await.is_empty());
        assert!(strategy.extract_deadlines(&long_text()).await.is_empty());
        assert_eq!(service.calls(), 2);
    }
}
