use std::sync::Arc;

use serde::Serialize;

use super::{AiStrategy, CategoryEntity, ExtractionStrategy, PatternStrategy, CONFIDENCE_THRESHOLD};
use crate::ai::GeminiClient;
use crate::config::ExtractorConfig;
use crate::entity::{Deadline, Material, Topic};
use crate::error::{Error, Result};

/// Picks a strategy per call and retries empty results with the heuristic
/// strategies.
///
/// Strategies are consulted in the order given; that order breaks priority
/// ties and drives the fallback chain.
#[derive(Clone)]
pub struct ExtractionOrchestrator {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl ExtractionOrchestrator {
    pub fn new(strategies: Vec<Arc<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// The default set: the AI strategy backed by Gemini, then the pattern
    /// strategy.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let client = GeminiClient::new(config.ai.clone())?;
        let ai = AiStrategy::from_service(Arc::new(client));
        let pattern = PatternStrategy::new()?;

        Ok(Self::new(vec![Arc::new(ai), Arc::new(pattern)]))
    }

    pub fn strategies(&self) -> &[Arc<dyn ExtractionStrategy>] {
        &self.strategies
    }

    /// Chooses the strategy that should handle `content`.
    ///
    /// The lowest-priority admissible strategy wins if it is confident
    /// enough; otherwise the most confident admissible one does.
    pub fn select_best_strategy(&self, content: &str) -> Result<&dyn ExtractionStrategy> {
        if content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }

        let admissible: Vec<&dyn ExtractionStrategy> = self
            .strategies
            .iter()
            .map(AsRef::as_ref)
            .filter(|strategy| strategy.supports(content))
            .collect();

        // min_by_key keeps the first of equal priorities
        if let Some(strategy) = admissible.iter().copied().min_by_key(|s| s.priority()) {
            let confidence = strategy.confidence(content);
            if confidence >= CONFIDENCE_THRESHOLD {
                return Ok(strategy);
            }
            tracing::debug!(
                strategy = strategy.name(),
                confidence,
                "Low confidence, trying alternatives"
            );
        }

        let mut best: Option<(&dyn ExtractionStrategy, u8)> = None;
        for strategy in admissible.iter().copied() {
            let confidence = strategy.confidence(content);
            let better = match best {
                Some((_, top)) => confidence > top,
                None => true,
            };
            if better {
                best = Some((strategy, confidence));
            }
        }
        if let Some((strategy, confidence)) = best {
            tracing::warn!(strategy = strategy.name(), confidence, "Using fallback strategy");
            return Ok(strategy);
        }

        if let Some(strategy) = admissible.first().copied() {
            tracing::error!(strategy = strategy.name(), "Using last-resort strategy");
            return Ok(strategy);
        }

        Err(Error::NoSuitableStrategy {
            content_length: content.chars().count(),
        })
    }

    /// Runs the selected strategy for one category, falling back to the
    /// remaining non-AI strategies while results stay empty.
    pub async fn extract<T: CategoryEntity>(&self, content: &str) -> Result<Vec<T>> {
        let category = T::CATEGORY;
        let primary = self.select_best_strategy(content)?;
        tracing::debug!(
            %category,
            strategy = primary.name(),
            confidence = primary.confidence(content),
            "Selected strategy"
        );

        let items = T::extract_with(primary, content).await;
        if !items.is_empty() {
            tracing::info!(%category, strategy = primary.name(), count = items.len(), "Extracted");
            return Ok(items);
        }

        tracing::info!(%category, strategy = primary.name(), "No results, trying fallback strategies");

        let fallbacks = self
            .strategies
            .iter()
            .filter(|s| s.name() != primary.name() && s.name() != AiStrategy::NAME);

        for fallback in fallbacks {
            let items = T::extract_with(fallback.as_ref(), content).await;
            if !items.is_empty() {
                tracing::info!(
                    %category,
                    strategy = fallback.name(),
                    count = items.len(),
                    "Fallback strategy succeeded"
                );
                return Ok(items);
            }
        }

        tracing::warn!(%category, "All strategies returned empty results");
        Ok(Vec::new())
    }

    pub async fn extract_topics(&self, content: &str) -> Result<Vec<Topic>> {
        self.extract(content).await
    }

    pub async fn extract_deadlines(&self, content: &str) -> Result<Vec<Deadline>> {
        self.extract(content).await
    }

    pub async fn extract_materials(&self, content: &str) -> Result<Vec<Material>> {
        self.extract(content).await
    }

    /// Reports how every strategy rates `content`, lowest priority first.
    pub fn analyze_strategies(&self, content: &str) -> StrategyAnalysis {
        let mut strategies: Vec<StrategyInfo> = self
            .strategies
            .iter()
            .map(|strategy| StrategyInfo {
                name: strategy.name().to_string(),
                priority: strategy.priority(),
                supported: strategy.supports(content),
                confidence: strategy.confidence(content),
            })
            .collect();
        strategies.sort_by_key(|info| info.priority);

        StrategyAnalysis {
            content_length: content.chars().count(),
            strategies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyAnalysis {
    pub content_length: usize,
    pub strategies: Vec<StrategyInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInfo {
    pub name: String,
    pub priority: i32,
    pub supported: bool,
    pub confidence: u8,
}
