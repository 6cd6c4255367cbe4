use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::DeliveryStatus;

use super::email_template::{default_subject, render};
use super::mailer::{MailTransport, OutgoingEmail};

#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub summary_id: i64,
    pub recipients: Vec<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResult {
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecipientResult {
    fn delivered(email: &str, message_id: String) -> Self {
        Self {
            email: email.to_string(),
            success: true,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(email: &str, error: String) -> Self {
        Self {
            email: email.to_string(),
            success: false,
            message_id: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub summary_id: i64,
    pub log_id: i64,
    pub status: DeliveryStatus,
    pub total_recipients: usize,
    pub successful_sends: usize,
    pub failed_sends: usize,
    pub results: Vec<RecipientResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,
}

/// Sends a stored summary to a list of recipients and records the attempt.
pub struct Notifier {
    repository: Arc<Repository>,
    mailer: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(repository: Arc<Repository>, mailer: Arc<dyn MailTransport>) -> Self {
        Self { repository, mailer }
    }

    /// Fan out one send per recipient, wait for all of them, then write a single
    /// delivery log. Recipient failures are reported, never raised.
    pub async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchReport> {
        if request.recipients.is_empty() {
            return Err(AppError::Validation(
                "At least one recipient email is required".to_string(),
            ));
        }

        let summary = self.repository.require_summary(request.summary_id).await?;

        let now = Utc::now();
        let subject = request
            .subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_subject(now));
        let rendered = render(&summary, request.message.as_deref(), now);

        let handles = request.recipients.iter().map(|to| {
            let mailer = Arc::clone(&self.mailer);
            let email = OutgoingEmail {
                to: to.clone(),
                subject: subject.clone(),
                html: rendered.html.clone(),
                text: rendered.text.clone(),
            };
            tokio::spawn(async move { mailer.send(&email).await })
        });
        let outcomes = join_all(handles).await;

        let results: Vec<RecipientResult> = request
            .recipients
            .iter()
            .zip(outcomes)
            .map(|(to, outcome)| match outcome {
                Ok(Ok(message_id)) => RecipientResult::delivered(to, message_id),
                Ok(Err(e)) => {
                    tracing::warn!("Failed to send email to {}: {}", to, e);
                    RecipientResult::failed(to, e.to_string())
                }
                Err(e) => {
                    tracing::warn!("Send task for {} did not complete: {}", to, e);
                    RecipientResult::failed(to, format!("send task aborted: {}", e))
                }
            })
            .collect();

        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.email.as_str())
            .collect();
        let total = results.len();
        let failed_sends = failed.len();
        let warnings = (failed_sends > 0)
            .then(|| format!("Some emails failed to send: {}", failed.join(", ")));
        let status = DeliveryStatus::from_failures(failed_sends);

        let log = self
            .repository
            .append_delivery_log(summary.id, &request.recipients, status)
            .await?;

        tracing::info!(
            "Dispatched summary {} to {} recipients ({} failed)",
            summary.id,
            total,
            failed_sends
        );

        Ok(DispatchReport {
            summary_id: summary.id,
            log_id: log.id,
            status,
            total_recipients: total,
            successful_sends: total - failed_sends,
            failed_sends,
            results,
            warnings,
        })
    }
}
