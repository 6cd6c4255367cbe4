use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ai::{GenerationClient, Summarizer};
use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{DeliveryLogList, Summary, SummaryList};
use crate::services::{
    DispatchReport, DispatchRequest, GenerationService, MailTransport, Notifier, OutgoingEmail,
    SmtpMailer,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub text: Option<String>,
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub edited_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub summary_id: Option<i64>,
    pub recipient_emails: Option<Vec<String>>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailRequest {
    pub test_email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub summary_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResult {
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub generation_configured: bool,
    pub email_configured: bool,
    pub summaries: i64,
}

const MAIL_NOT_CONFIGURED: &str =
    "Email service not configured: EMAIL_USER and EMAIL_PASS must be set";

/// Process-wide context: the store and external clients, built once at startup.
pub struct App {
    repository: Arc<Repository>,
    generation: GenerationService,
    mailer: Option<Arc<dyn MailTransport>>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Arc::new(Repository::new(&config.db_path).await?);

        let summarizer = match config.groq_api_key() {
            Some(key) => Some(Arc::new(Summarizer::new(
                key.to_string(),
                config.generation_params(),
            )?) as Arc<dyn GenerationClient>),
            None => None,
        };

        let mailer = match config.email.smtp_settings() {
            Some(settings) => Some(Arc::new(SmtpMailer::new(&settings)?) as Arc<dyn MailTransport>),
            None => None,
        };

        Ok(Self::with_services(
            repository,
            summarizer,
            mailer,
            config.generation.max_input_chars,
        ))
    }

    /// Wire an app from already-built parts.
    pub fn with_services(
        repository: Arc<Repository>,
        summarizer: Option<Arc<dyn GenerationClient>>,
        mailer: Option<Arc<dyn MailTransport>>,
        max_input_chars: usize,
    ) -> Self {
        let generation = GenerationService::new(Arc::clone(&repository), summarizer, max_input_chars);
        Self {
            repository,
            generation,
            mailer,
        }
    }

    fn mailer(&self) -> Result<&Arc<dyn MailTransport>> {
        self.mailer
            .as_ref()
            .ok_or_else(|| AppError::ServiceMisconfigured(MAIL_NOT_CONFIGURED.to_string()))
    }

    // Summary operations

    pub async fn generate(&self, request: GenerateRequest) -> Result<Summary> {
        let text = request
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field: text".to_string()))?;
        let instructions = request.custom_prompt.ok_or_else(|| {
            AppError::Validation("Missing required field: customPrompt".to_string())
        })?;

        self.generation.generate(&text, &instructions).await
    }

    pub async fn list_summaries(&self) -> Result<SummaryList> {
        Ok(self.repository.list_summaries().await?.into())
    }

    pub async fn get_summary(&self, id: i64) -> Result<Summary> {
        self.repository.require_summary(id).await
    }

    pub async fn edit_summary(&self, id: i64, request: EditRequest) -> Result<EditResult> {
        let text = request
            .edited_summary
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Missing required field: editedSummary".to_string())
            })?;

        self.repository.set_edited_summary(id, text).await?;
        tracing::info!("Edited summary {}", id);
        Ok(EditResult { summary_id: id })
    }

    pub async fn delete_summary(&self, id: i64) -> Result<()> {
        self.repository.delete_summary(id).await?;
        tracing::info!("Deleted summary {}", id);
        Ok(())
    }

    // Email operations

    pub async fn send_email(&self, request: SendRequest) -> Result<DispatchReport> {
        let summary_id = request
            .summary_id
            .ok_or_else(|| AppError::Validation("Missing required field: summaryId".to_string()))?;
        let recipients = request
            .recipient_emails
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                AppError::Validation("recipientEmails must be a non-empty list".to_string())
            })?;
        if recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(AppError::Validation(
                "recipientEmails must not contain blank addresses".to_string(),
            ));
        }

        let mailer = Arc::clone(self.mailer()?);
        Notifier::new(Arc::clone(&self.repository), mailer)
            .dispatch(DispatchRequest {
                summary_id,
                recipients,
                subject: request.subject,
                message: request.message,
            })
            .await
    }

    pub async fn delivery_logs(&self, summary_id: i64) -> Result<DeliveryLogList> {
        Ok(self.repository.delivery_logs_for(summary_id).await?.into())
    }

    pub async fn send_test_email(&self, request: TestEmailRequest) -> Result<TestEmailResult> {
        let to = request
            .test_email
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field: testEmail".to_string()))?;

        let message_id = self.mailer()?.send(&OutgoingEmail::test_message(&to)).await?;
        tracing::info!("Sent test email to {}", to);
        Ok(TestEmailResult { message_id })
    }

    pub async fn health(&self) -> Result<Health> {
        Ok(Health {
            status: "OK",
            generation_configured: self.generation.is_configured(),
            email_configured: self.mailer.is_some(),
            summaries: self.repository.count_summaries().await?,
        })
    }
}
