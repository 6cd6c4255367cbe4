use chrono::{DateTime, Utc};

use crate::models::Summary;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

pub fn default_subject(now: DateTime<Utc>) -> String {
    format!("Meeting Summary - {}", now.format("%Y-%m-%d"))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the HTML and plain-text bodies for one dispatch.
pub fn render(summary: &Summary, message: Option<&str>, sent_at: DateTime<Utc>) -> RenderedEmail {
    let body = summary.effective_summary();
    let created = summary.created_at.format(TIMESTAMP_FORMAT).to_string();
    let sent = sent_at.format(TIMESTAMP_FORMAT).to_string();
    let message = message.map(str::trim).filter(|m| !m.is_empty());

    let intro_html = message
        .map(|m| format!("\n      <p class=\"message\">{}</p>", escape_html(m)))
        .unwrap_or_default();
    let intro_text = message.map(|m| format!("{}\n\n", m)).unwrap_or_default();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Meeting Summary</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin-bottom: 20px; }}
    .content {{ background-color: #ffffff; padding: 20px; border: 1px solid #dee2e6; border-radius: 5px; }}
    .footer {{ margin-top: 20px; padding: 20px; text-align: center; color: #6c757d; font-size: 14px; }}
    .summary-text {{ white-space: pre-wrap; background-color: #f8f9fa; padding: 15px; border-radius: 5px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>Meeting Summary</h2>{intro}
      <p><strong>Generated on:</strong> {created}</p>
      <p><strong>Custom Instructions:</strong> {prompt}</p>
    </div>
    <div class="content">
      <h3>Summary:</h3>
      <div class="summary-text">{body}</div>
    </div>
    <div class="footer">
      <p>This summary was generated using MeetSynth</p>
      <p>Sent on: {sent}</p>
    </div>
  </div>
</body>
</html>
"#,
        intro = intro_html,
        created = created,
        prompt = escape_html(&summary.custom_prompt),
        body = escape_html(body),
        sent = sent,
    );

    let text = format!(
        "Meeting Summary\n\n{intro}Generated on: {created}\nCustom Instructions: {prompt}\n\n\
Summary:\n{body}\n\n---\nThis summary was generated using MeetSynth\nSent on: {sent}\n",
        intro = intro_text,
        created = created,
        prompt = summary.custom_prompt,
        body = body,
        sent = sent,
    );

    RenderedEmail { html, text }
}
