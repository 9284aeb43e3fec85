pub mod ai;
pub mod config;
pub mod enrich;
pub mod entity;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod normalize;
pub mod overview;

pub use ai::{AiError, AiResult, AiService, GeminiClient, MockAiService};
pub use config::{AiConfig, ConfigError, ExtractorConfig};
pub use enrich::DifficultyEnricher;
pub use entity::{Deadline, DeadlineType, DifficultyLevel, Material, MaterialType, Topic};
pub use error::{Error, Result};
pub use extract::{
    AiStrategy, Category, ExtractionOrchestrator, ExtractionStrategy, PatternStrategy,
    StrategyAnalysis, StrategyInfo,
};
pub use extractor::{ExtractionProgress, SyllabusExtraction, SyllabusExtractor};
pub use overview::{CourseOverview, DifficultyBreakdown};
