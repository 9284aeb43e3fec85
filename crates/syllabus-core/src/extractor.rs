use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::ai::GeminiClient;
use crate::config::ExtractorConfig;
use crate::enrich::DifficultyEnricher;
use crate::entity::{Deadline, Material, Topic};
use crate::error::{Error, Result};
use crate::extract::{AiStrategy, Category, ExtractionOrchestrator, PatternStrategy};

/// Everything pulled out of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusExtraction {
    pub run_id: Uuid,
    pub topics: Vec<Topic>,
    pub deadlines: Vec<Deadline>,
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionProgress {
    pub percent: u8,
    pub stage: String,
}

pub type ProgressCallback = Arc<dyn Fn(ExtractionProgress) + Send + Sync>;

/// Runs all three categories through the orchestrator and optionally
/// re-rates topic difficulty.
#[derive(Clone)]
pub struct SyllabusExtractor {
    orchestrator: ExtractionOrchestrator,
    enricher: Option<Arc<DifficultyEnricher>>,
    progress: Option<ProgressCallback>,
}

impl SyllabusExtractor {
    pub const fn new(orchestrator: ExtractionOrchestrator) -> Self {
        Self {
            orchestrator,
            enricher: None,
            progress: None,
        }
    }

    /// Gemini-backed AI strategy plus the pattern strategy, sharing one
    /// client with the enricher when `enrich_difficulty` is set.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let client = Arc::new(GeminiClient::new(config.ai.clone())?);
        let orchestrator = ExtractionOrchestrator::new(vec![
            Arc::new(AiStrategy::from_service(client.clone())),
            Arc::new(PatternStrategy::new()?),
        ]);

        let mut extractor = Self::new(orchestrator);
        if config.enrich_difficulty {
            extractor = extractor.with_enricher(DifficultyEnricher::new(client));
        }
        Ok(extractor)
    }

    #[must_use]
    pub fn with_enricher(mut self, enricher: DifficultyEnricher) -> Self {
        self.enricher = Some(Arc::new(enricher));
        self
    }

    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ExtractionProgress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub const fn orchestrator(&self) -> &ExtractionOrchestrator {
        &self.orchestrator
    }

    pub async fn extract(&self, content: &str) -> Result<SyllabusExtraction> {
        self.extract_categories(content, &Category::ALL).await
    }

    /// Extracts only `categories`; the others come back empty.
    pub async fn extract_categories(
        &self,
        content: &str,
        categories: &[Category],
    ) -> Result<SyllabusExtraction> {
        if content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("extraction", run_id = %run_id);

        async {
            tracing::info!(content_len = content.len(), ?categories, "Starting extraction");
            self.report(5, "Starting extraction");

            let total = categories.len().max(1);
            let done = AtomicUsize::new(0);
            let finish = |category: Category| {
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                let percent = 5 + finished * 85 / total;
                self.report(
                    u8::try_from(percent).unwrap_or(90),
                    &format!("Extracted {category}"),
                );
            };

            let wants = |category: Category| categories.contains(&category);

            let (topics, deadlines, materials) = tokio::join!(
                async {
                    if !wants(Category::Topics) {
                        return Ok(Vec::new());
                    }
                    let result = self.orchestrator.extract_topics(content).await;
                    finish(Category::Topics);
                    result
                },
                async {
                    if !wants(Category::Deadlines) {
                        return Ok(Vec::new());
                    }
                    let result = self.orchestrator.extract_deadlines(content).await;
                    finish(Category::Deadlines);
                    result
                },
                async {
                    if !wants(Category::Materials) {
                        return Ok(Vec::new());
                    }
                    let result = self.orchestrator.extract_materials(content).await;
                    finish(Category::Materials);
                    result
                },
            );

            let mut topics = topics?;
            let deadlines = deadlines?;
            let materials = materials?;

            if let Some(enricher) = &self.enricher {
                self.report(92, "Rating topic difficulty");
                topics = enricher.enrich(&topics).await;
            }

            tracing::info!(
                topics = topics.len(),
                deadlines = deadlines.len(),
                materials = materials.len(),
                "Extraction complete"
            );
            self.report(100, "Complete");

            Ok::<_, Error>(SyllabusExtraction {
                run_id,
                topics,
                deadlines,
                materials,
            })
        }
        .instrument(span)
        .await
    }

    fn report(&self, percent: u8, stage: &str) {
        if let Some(callback) = &self.progress {
            callback(ExtractionProgress {
                percent,
                stage: stage.to_string(),
            });
        }
    }
}
