use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_exercise, parse_feedback, to_i64, to_u8, to_usize},
    models::StoredSession,
};
use crate::models::{FrameSample, SessionRecord};
use crate::session::SessionSink;

/// Cap on rows read for dashboard summaries.
pub const SUMMARY_SESSION_LIMIT: usize = 1000;

const SESSION_COLUMNS: &str =
    "id, user_id, exercise, average_completion, feedback, frame_count, created_at";

fn row_to_session(row: &Row) -> Result<StoredSession> {
    let exercise: String = row.get("exercise")?;
    let feedback: String = row.get("feedback")?;
    let average_completion: i64 = row.get("average_completion")?;
    let frame_count: i64 = row.get("frame_count")?;
    let created_at: String = row.get("created_at")?;

    Ok(StoredSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        exercise: parse_exercise(&exercise)?,
        average_completion: to_u8(average_completion, "average_completion")?,
        feedback: parse_feedback(&feedback)?,
        frame_count: to_usize(frame_count, "frame_count")?,
        timestamp: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Stores a finished session and returns its new id.
    pub async fn insert_session_record(
        &self,
        record: &SessionRecord,
        created_at: DateTime<Utc>,
    ) -> Result<String> {
        if record.user_id <= 0 {
            return Err(anyhow!("user_id is required to store a session"));
        }

        let id = Uuid::new_v4().to_string();
        let frames_json =
            serde_json::to_string(&record.frames).context("failed to serialize session frames")?;
        let record = record.clone();
        let row_id = id.clone();

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO posture_sessions (id, user_id, exercise, frames_json, frame_count, average_completion, feedback, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row_id,
                    record.user_id,
                    record.exercise.as_str(),
                    frames_json,
                    to_i64(record.frames.len() as u64)?,
                    i64::from(record.average_completion),
                    record.feedback.as_str(),
                    created_at.to_rfc3339(),
                ],
            )
            .context("failed to insert session")?;
            Ok(())
        })
        .await?;

        Ok(id)
    }

    /// Sessions of one user, newest first.
    pub async fn list_sessions_for_user(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<StoredSession>> {
        let limit = to_i64(limit as u64)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS}
                 FROM posture_sessions
                 WHERE user_id = ?1
                 ORDER BY created_at DESC
                 LIMIT ?2"
            ))?;

            let mut rows = stmt.query(params![user_id, limit])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }

    /// Most recent sessions across all users, newest first.
    pub async fn list_recent_sessions(&self, limit: usize) -> Result<Vec<StoredSession>> {
        let limit = to_i64(limit as u64)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS}
                 FROM posture_sessions
                 ORDER BY created_at DESC
                 LIMIT ?1"
            ))?;

            let mut rows = stmt.query(params![limit])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }

    pub async fn get_session_frames(&self, session_id: &str) -> Result<Vec<FrameSample>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let frames_json: Option<String> = conn
                .query_row(
                    "SELECT frames_json FROM posture_sessions WHERE id = ?1",
                    params![session_id],
                    |row| row.get(0),
                )
                .optional()?;

            let frames_json = frames_json.ok_or_else(|| anyhow!("Session not found"))?;
            serde_json::from_str(&frames_json).context("failed to parse stored frames")
        })
        .await
    }
}

#[async_trait]
impl SessionSink for Database {
    async fn persist(&self, record: &SessionRecord) -> Result<String> {
        self.insert_session_record(record, Utc::now()).await
    }
}
