mod ai;
mod orchestrator;
mod pattern;
mod response;

pub use ai::AiStrategy;
pub use orchestrator::{ExtractionOrchestrator, StrategyAnalysis, StrategyInfo};
pub use pattern::PatternStrategy;
pub use response::{parse_deadlines, parse_materials, parse_topics, strip_code_fence};

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::entity::{Deadline, Material, Topic};

/// Confidence at or above which the top-priority strategy is trusted.
pub const CONFIDENCE_THRESHOLD: u8 = 50;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Topics,
    Deadlines,
    Materials,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Topics, Self::Deadlines, Self::Materials];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Deadlines => "deadlines",
            Self::Materials => "materials",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topics" | "topic" => Ok(Self::Topics),
            "deadlines" | "deadline" => Ok(Self::Deadlines),
            "materials" | "material" => Ok(Self::Materials),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// An interchangeable way of pulling course entities out of document text.
///
/// Every `extract_*` method is total: internal failures are logged and come
/// back as an empty list. Implementations hold no per-call state, so one
/// instance can serve concurrent requests.
#[async_trait::async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Stable identifier, also used to exclude strategies from fallback.
    fn name(&self) -> &str;

    /// Lower values are tried first.
    fn priority(&self) -> i32;

    /// Cheap admissibility check.
    fn supports(&self, content: &str) -> bool;

    /// Self-reported fitness for `content`, 0 to 100.
    fn confidence(&self, content: &str) -> u8 {
        if self.supports(content) {
            80
        } else {
            0
        }
    }

    async fn extract_topics(&self, content: &str) -> Vec<Topic>;

    async fn extract_deadlines(&self, content: &str) -> Vec<Deadline>;

    async fn extract_materials(&self, content: &str) -> Vec<Material>;
}

/// Links an entity type to the strategy method that produces it, so the
/// orchestrator runs one code path for all three categories.
pub trait CategoryEntity: Sized + Send {
    const CATEGORY: Category;

    fn extract_with<'a>(
        strategy: &'a dyn ExtractionStrategy,
        content: &'a str,
    ) -> BoxFuture<'a, Vec<Self>>;
}

impl CategoryEntity for Topic {
    const CATEGORY: Category = Category::Topics;

    fn extract_with<'a>(
        strategy: &'a dyn ExtractionStrategy,
        content: &'a str,
    ) -> BoxFuture<'a, Vec<Self>> {
        strategy.extract_topics(content)
    }
}

impl CategoryEntity for Deadline {
    const CATEGORY: Category = Category::Deadlines;

    fn extract_with<'a>(
        strategy: &'a dyn ExtractionStrategy,
        content: &'a str,
    ) -> BoxFuture<'a, Vec<Self>> {
        strategy.extract_deadlines(content)
    }
}

impl CategoryEntity for Material {
    const CATEGORY: Category = Category::Materials;

    fn extract_with<'a>(
        strategy: &'a dyn ExtractionStrategy,
        content: &'a str,
    ) -> BoxFuture<'a, Vec<Self>> {
        strategy.extract_materials(content)
    }
}
