use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::protocol::SubmissionPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResponseId(pub i64);

/// One submitted feedback row, in the column order of the response sheet.
#[derive(Debug, Clone, Serialize)]
pub struct StoredResponse {
    pub response_id: ResponseId,
    pub received_at: DateTime<Utc>,
    pub role: String,
    pub site_area: String,
    pub site_type: String,
    pub summary: String,
    pub transcript: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn append_response(
        &self,
        payload: &SubmissionPayload,
        received_at: DateTime<Utc>,
    ) -> Result<ResponseId> {
        let rec = sqlx::query(
            "INSERT INTO form_responses
                (received_at, role, site_area, site_type, summary, transcript)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(received_at)
        .bind(&payload.role)
        .bind(&payload.site_area)
        .bind(&payload.site_type)
        .bind(&payload.summary)
        .bind(&payload.transcript)
        .fetch_one(&self.pool)
        .await
        .context("failed to append form response")?;
        Ok(ResponseId(rec.get::<i64, _>(0)))
    }

    pub async fn list_responses(&self) -> Result<Vec<StoredResponse>> {
        let rows = sqlx::query(
            "SELECT id, received_at, role, site_area, site_type, summary, transcript
             FROM form_responses
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list form responses")?;

        rows.into_iter()
            .map(|row| {
                Ok(StoredResponse {
                    response_id: ResponseId(row.try_get("id")?),
                    received_at: row.try_get("received_at")?,
                    role: row.try_get("role")?,
                    site_area: row.try_get("site_area")?,
                    site_type: row.try_get("site_type")?,
                    summary: row.try_get("summary")?,
                    transcript: row.try_get("transcript")?,
                })
            })
            .collect()
    }

    pub async fn count_responses(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM form_responses")
            .fetch_one(&self.pool)
            .await
            .context("failed to count form responses")?;
        Ok(count)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
