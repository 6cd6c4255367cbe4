use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use meetsynth::ai::prompt::GENERAL_DEFAULT_INSTRUCTIONS;
use meetsynth::ai::{classify, truncate, DocumentKind, GenerationClient, GenerationRequest};
use meetsynth::app::{EditRequest, GenerateRequest, SendRequest, TestEmailRequest};
use meetsynth::db::Repository;
use meetsynth::models::DeliveryStatus;
use meetsynth::services::{MailTransport, OutgoingEmail};
use meetsynth::{App, AppError, ErrorKind, Result};

struct EchoGenerator;

#[async_trait]
impl GenerationClient for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        Ok(format!("summary ({} chars of prompt)", request.user.len()))
    }

    fn model_version(&self) -> &str {
        "echo"
    }
}

#[derive(Default)]
struct RecordingMailer {
    failing: HashSet<String>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        if self.failing.contains(&email.to) {
            return Err(AppError::Mail(format!("rejected {}", email.to)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(format!("<{}@test>", self.sent.lock().unwrap().len()))
    }
}

struct Harness {
    app: App,
    mailer: Arc<RecordingMailer>,
    _dir: TempDir,
}

async fn harness(failing: &[&str]) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summaries.db");
    let repo = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());
    let mailer = Arc::new(RecordingMailer {
        failing: failing.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    });
    let app = App::with_services(
        repo,
        Some(Arc::new(EchoGenerator)),
        Some(mailer.clone()),
        8000,
    );
    Harness {
        app,
        mailer,
        _dir: dir,
    }
}

fn generate_request(text: &str, prompt: &str) -> GenerateRequest {
    GenerateRequest {
        text: Some(text.to_string()),
        custom_prompt: Some(prompt.to_string()),
    }
}

fn send_request(id: i64, to: &[&str]) -> SendRequest {
    SendRequest {
        summary_id: Some(id),
        recipient_emails: Some(to.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
}

#[test]
fn resume_keywords_classify_as_resume() {
    let text = "Ten years of experience. Skills: Go, Rust. Education: BSc. Certifications: CKA.";
    assert_eq!(classify(text), DocumentKind::Resume);
}

#[test]
fn unbroken_token_is_hard_cut() {
    let text = "z".repeat(9000);
    let out = truncate(&text, 8000);
    assert!(out.chars().count() <= 8000 + meetsynth::ai::TRUNCATION_NOTICE.chars().count());
    assert!(out.chars().count() < 9000 + meetsynth::ai::TRUNCATION_NOTICE.chars().count());
}

#[tokio::test]
async fn short_note_is_stored_with_default_instructions() {
    let h = harness(&[]).await;

    let summary = h
        .app
        .generate(generate_request("Short note.", ""))
        .await
        .unwrap();

    assert_eq!(summary.custom_prompt, GENERAL_DEFAULT_INSTRUCTIONS);
    assert_ne!(summary.custom_prompt, "");
    let stored = h.app.get_summary(summary.id).await.unwrap();
    assert_eq!(stored.custom_prompt, GENERAL_DEFAULT_INSTRUCTIONS);
    assert!(stored.edited_summary.is_none());
}

#[tokio::test]
async fn generate_validates_before_anything_else() {
    let h = harness(&[]).await;

    let err = h
        .app
        .generate(GenerateRequest {
            text: Some("  ".into()),
            custom_prompt: Some(String::new()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = h
        .app
        .generate(GenerateRequest {
            text: Some("Real text.".into()),
            custom_prompt: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(h.app.list_summaries().await.unwrap().count, 0);
}

#[tokio::test]
async fn edited_text_is_what_gets_listed_and_emailed() {
    let h = harness(&[]).await;
    let summary = h
        .app
        .generate(generate_request("Notes from today.", "Bullets"))
        .await
        .unwrap();

    let edit = h
        .app
        .edit_summary(
            summary.id,
            EditRequest {
                edited_summary: Some("Hand-edited".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(edit.summary_id, summary.id);

    let listed = h.app.list_summaries().await.unwrap();
    assert_eq!(listed.summaries[0].effective_summary(), "Hand-edited");

    assert_ok!(h.app.send_email(send_request(summary.id, &["a@x.io"])).await);
    let sent = h.mailer.sent.lock().unwrap();
    assert!(sent[0].text.contains("Hand-edited"));
    assert!(!sent[0].text.contains(&summary.generated_summary));
}

#[tokio::test]
async fn one_of_three_failing_is_partial() {
    let h = harness(&["b@x.io"]).await;
    let summary = h
        .app
        .generate(generate_request("Agenda. Participants. Minutes.", ""))
        .await
        .unwrap();

    let report = h
        .app
        .send_email(send_request(summary.id, &["a@x.io", "b@x.io", "c@x.io"]))
        .await
        .unwrap();

    assert_eq!(report.successful_sends, 2);
    assert_eq!(report.failed_sends, 1);
    assert_eq!(report.status, DeliveryStatus::Partial);
    assert!(report.warnings.as_deref().unwrap().contains("b@x.io"));

    let logs = h.app.delivery_logs(summary.id).await.unwrap();
    assert_eq!(logs.count, 1);
    assert_eq!(logs.email_logs[0].recipient_emails, "a@x.io, b@x.io, c@x.io");
    assert_eq!(logs.email_logs[0].status, DeliveryStatus::Partial);
}

#[tokio::test]
async fn all_failing_is_logged_partial_not_failed() {
    let h = harness(&["a@x.io", "b@x.io"]).await;
    let summary = h
        .app
        .generate(generate_request("Something.", ""))
        .await
        .unwrap();

    let report = h
        .app
        .send_email(send_request(summary.id, &["a@x.io", "b@x.io"]))
        .await
        .unwrap();

    assert_eq!(report.successful_sends, 0);
    assert_eq!(report.failed_sends, 2);
    assert_eq!(
        report.successful_sends + report.failed_sends,
        report.total_recipients
    );
    let logs = h.app.delivery_logs(summary.id).await.unwrap();
    assert_eq!(logs.email_logs[0].status, DeliveryStatus::Partial);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "partial");
    assert_eq!(json["failedSends"], 2);
}

#[tokio::test]
async fn send_validation_and_lookup_errors() {
    let h = harness(&[]).await;

    let err = h.app.send_email(send_request(1, &[])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = h
        .app
        .send_email(SendRequest {
            summary_id: Some(1),
            recipient_emails: None,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = h.app.send_email(send_request(42, &["a@x.io"])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_ids_are_not_found_and_leave_rows_alone() {
    let h = harness(&[]).await;
    h.app
        .generate(generate_request("Keep me.", ""))
        .await
        .unwrap();

    let err = h
        .app
        .edit_summary(
            77,
            EditRequest {
                edited_summary: Some("x".into()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.kind().status_code(), 404);

    assert_err!(h.app.delete_summary(77).await);
    assert_err!(h.app.get_summary(77).await);
    assert_eq!(h.app.list_summaries().await.unwrap().count, 1);
}

#[tokio::test]
async fn edit_requires_text() {
    let h = harness(&[]).await;
    let summary = h.app.generate(generate_request("Text.", "")).await.unwrap();

    let err = h
        .app
        .edit_summary(summary.id, EditRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn deleting_keeps_delivery_history() {
    let h = harness(&[]).await;
    let summary = h.app.generate(generate_request("Text.", "")).await.unwrap();
    h.app
        .send_email(send_request(summary.id, &["a@x.io"]))
        .await
        .unwrap();

    h.app.delete_summary(summary.id).await.unwrap();

    assert_eq!(
        h.app.get_summary(summary.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(h.app.delivery_logs(summary.id).await.unwrap().count, 1);
}

#[tokio::test]
async fn missing_services_are_misconfigured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summaries.db");
    let repo = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());
    let app = App::with_services(repo, None, None, 8000);

    let err = app
        .generate(generate_request("Text.", ""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceMisconfigured);

    let err = app
        .send_email(send_request(1, &["a@x.io"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceMisconfigured);

    let err = app
        .send_test_email(TestEmailRequest {
            test_email: Some("me@x.io".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceMisconfigured);

    let health = app.health().await.unwrap();
    assert!(!health.generation_configured);
    assert!(!health.email_configured);
    assert_eq!(health.summaries, 0);
}

#[tokio::test]
async fn test_email_returns_message_id() {
    let h = harness(&[]).await;

    let result = h
        .app
        .send_test_email(TestEmailRequest {
            test_email: Some("me@x.io".into()),
        })
        .await
        .unwrap();
    assert_eq!(result.message_id, "<1@test>");

    let err = h
        .app
        .send_test_email(TestEmailRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
