use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{DeliveryLog, DeliveryStatus, NewSummary, Summary, UnknownStatus};

use super::schema::SCHEMA;

const SUMMARY_COLUMNS: &str = "id, original_text, custom_prompt, generated_summary, edited_summary, created_at, updated_at";
const LOG_COLUMNS: &str = "id, summary_id, recipient_emails, sent_at, status";

/// Separator used when a recipient list is stored as a single column.
pub const RECIPIENT_SEPARATOR: &str = ", ";

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Summary operations

    pub async fn create_summary(&self, summary: NewSummary) -> Result<Summary> {
        let now = now();
        let stamp = format_datetime(&now);
        let row = summary.clone();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO summaries (original_text, custom_prompt, generated_summary, created_at, updated_at)
                       VALUES (?1, ?2, ?3, ?4, ?4)"#,
                    params![row.original_text, row.custom_prompt, row.generated_summary, stamp],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(Summary {
            id,
            original_text: summary.original_text,
            custom_prompt: summary.custom_prompt,
            generated_summary: summary.generated_summary,
            edited_summary: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_summary(&self, id: i64) -> Result<Option<Summary>> {
        let summary = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM summaries WHERE id = ?1",
                    SUMMARY_COLUMNS
                ))?;
                let summary = stmt
                    .query_row(params![id], summary_from_row)
                    .optional()?;
                Ok(summary)
            })
            .await?;
        Ok(summary)
    }

    /// Like [`Repository::get_summary`] but a missing row is an error.
    pub async fn require_summary(&self, id: i64) -> Result<Summary> {
        self.get_summary(id).await?.ok_or_else(|| summary_not_found(id))
    }

    pub async fn list_summaries(&self) -> Result<Vec<Summary>> {
        let summaries = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM summaries ORDER BY created_at DESC, id DESC",
                    SUMMARY_COLUMNS
                ))?;
                let summaries = stmt
                    .query_map([], summary_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(summaries)
            })
            .await?;
        Ok(summaries)
    }

    pub async fn count_summaries(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM summaries", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    /// The only mutation a summary accepts after creation.
    pub async fn set_edited_summary(&self, id: i64, text: String) -> Result<()> {
        let stamp = format_datetime(&now());
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE summaries SET edited_summary = ?1, updated_at = ?2 WHERE id = ?3",
                    params![text, stamp, id],
                )?;
                Ok(changed)
            })
            .await?;

        if changed == 0 {
            return Err(summary_not_found(id));
        }
        Ok(())
    }

    /// Removes the summary row only; its delivery logs are kept as an audit trail.
    pub async fn delete_summary(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM summaries WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await?;

        if changed == 0 {
            return Err(summary_not_found(id));
        }
        Ok(())
    }

    // Delivery log operations

    pub async fn append_delivery_log(
        &self,
        summary_id: i64,
        recipients: &[String],
        status: DeliveryStatus,
    ) -> Result<DeliveryLog> {
        let sent_at = now();
        let stamp = format_datetime(&sent_at);
        let joined = recipients.join(RECIPIENT_SEPARATOR);
        let stored = joined.clone();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO email_logs (summary_id, recipient_emails, sent_at, status) VALUES (?1, ?2, ?3, ?4)",
                    params![summary_id, stored, stamp, status.as_str()],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(DeliveryLog {
            id,
            summary_id,
            recipient_emails: joined,
            sent_at,
            status,
        })
    }

    pub async fn delivery_logs_for(&self, summary_id: i64) -> Result<Vec<DeliveryLog>> {
        let logs = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM email_logs WHERE summary_id = ?1 ORDER BY sent_at DESC, id DESC",
                    LOG_COLUMNS
                ))?;
                let logs = stmt
                    .query_map(params![summary_id], delivery_log_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(logs)
            })
            .await?;
        Ok(logs)
    }
}

fn summary_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("No summary found with id {}", id))
}

// Stored timestamps keep microseconds so values read back compare equal.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56.000000Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn datetime_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unparseable timestamp '{}'", raw).into(),
        )
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<Summary> {
    Ok(Summary {
        id: row.get(0)?,
        original_text: row.get(1)?,
        custom_prompt: row.get(2)?,
        generated_summary: row.get(3)?,
        edited_summary: row.get(4)?,
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}

fn delivery_log_from_row(row: &Row) -> rusqlite::Result<DeliveryLog> {
    let status: String = row.get(4)?;
    Ok(DeliveryLog {
        id: row.get(0)?,
        summary_id: row.get(1)?,
        recipient_emails: row.get(2)?,
        sent_at: datetime_column(row, 3)?,
        status: status
            .parse()
            .map_err(|e: UnknownStatus| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?,
    })
}
