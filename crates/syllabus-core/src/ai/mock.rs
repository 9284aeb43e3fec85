use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AiError, AiResult, AiService, EMPTY_ARRAY};

/// Serves fixed replies per category. Unset categories answer `[]`.
#[derive(Debug, Default)]
pub struct MockAiService {
    topics: Option<String>,
    deadlines: Option<String>,
    materials: Option<String>,
    text: Option<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockAiService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the service were unreachable.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_topics(mut self, body: impl Into<String>) -> Self {
        self.topics = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_deadlines(mut self, body: impl Into<String>) -> Self {
        self.deadlines = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_materials(mut self, body: impl Into<String>) -> Self {
        self.materials = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Number of calls served so far, across all methods.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply(&self, body: Option<&String>) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AiError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(body.map_or_else(|| EMPTY_ARRAY.to_string(), Clone::clone))
    }
}

#[async_trait::async_trait]
impl AiService for MockAiService {
    fn is_configured(&self) -> bool {
        true
    }

    async fn extract_topics(&self, _content: &str) -> AiResult<String> {
        self.reply(self.topics.as_ref())
    }

    async fn extract_deadlines(&self, _content: &str) -> AiResult<String> {
        self.reply(self.deadlines.as_ref())
    }

    async fn extract_materials(&self, _content: &str) -> AiResult<String> {
        self.reply(self.materials.as_ref())
    }

    async fn generate_text(&self, _prompt: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AiError::MalformedResponse("no candidates in response".into()));
        }
        Ok(self.text.clone().unwrap_or_default())
    }
}
