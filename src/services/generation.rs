use std::sync::Arc;

use crate::ai::{build_prompt, classify, truncate, GenerationClient};
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{NewSummary, Summary};

/// Truncate, classify, prompt, generate, persist.
///
/// Nothing is written unless generation succeeds. Identical submissions are not
/// deduplicated; each call that succeeds adds a row.
pub struct GenerationService {
    repository: Arc<Repository>,
    client: Option<Arc<dyn GenerationClient>>,
    max_input_chars: usize,
}

impl GenerationService {
    pub fn new(
        repository: Arc<Repository>,
        client: Option<Arc<dyn GenerationClient>>,
        max_input_chars: usize,
    ) -> Self {
        Self {
            repository,
            client,
            max_input_chars,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate(&self, text: &str, user_instructions: &str) -> Result<Summary> {
        let text = truncate(text, self.max_input_chars);
        let kind = classify(&text);
        let prepared = build_prompt(kind, &text, user_instructions);

        tracing::debug!(%kind, instructions = %prepared.instructions, "prepared prompt");

        let client = self.client.as_ref().ok_or_else(|| {
            AppError::ServiceMisconfigured(
                "AI service not configured: GROQ_API_KEY is not set".to_string(),
            )
        })?;

        let generated = client.generate(&prepared.request).await?;

        let summary = self
            .repository
            .create_summary(NewSummary {
                original_text: text,
                custom_prompt: prepared.instructions,
                generated_summary: generated,
            })
            .await?;

        tracing::info!(
            "Generated summary {} ({} input, model {})",
            summary.id,
            kind,
            client.model_version()
        );
        Ok(summary)
    }
}
