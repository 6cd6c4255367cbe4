use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: i64,
    /// Text actually sent for generation, after truncation.
    pub original_text: String,
    /// Effective instructions used for generation, after defaulting.
    pub custom_prompt: String,
    pub generated_summary: String,
    pub edited_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Summary {
    /// The text shown and emailed: the edit when one exists, the generated text otherwise.
    pub fn effective_summary(&self) -> &str {
        self.edited_summary
            .as_deref()
            .unwrap_or(&self.generated_summary)
    }
}

#[derive(Debug, Clone)]
pub struct NewSummary {
    pub original_text: String,
    pub custom_prompt: String,
    pub generated_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryList {
    pub summaries: Vec<Summary>,
    pub count: usize,
}

impl From<Vec<Summary>> for SummaryList {
    fn from(summaries: Vec<Summary>) -> Self {
        let count = summaries.len();
        Self { summaries, count }
    }
}
