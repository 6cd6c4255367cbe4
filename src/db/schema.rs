pub const SCHEMA: &str = r#"
-- summaries table
CREATE TABLE IF NOT EXISTS summaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    original_text TEXT NOT NULL,
    custom_prompt TEXT NOT NULL,
    generated_summary TEXT NOT NULL,
    edited_summary TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_summaries_created_at ON summaries(created_at DESC);

-- email_logs table (summary_id is deliberately not a foreign key: logs outlive their summary)
CREATE TABLE IF NOT EXISTS email_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    summary_id INTEGER NOT NULL,
    recipient_emails TEXT NOT NULL,
    sent_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'sent' CHECK (status IN ('sent', 'partial'))
);

CREATE INDEX IF NOT EXISTS idx_email_logs_summary_id ON email_logs(summary_id, sent_at DESC);
"#;
