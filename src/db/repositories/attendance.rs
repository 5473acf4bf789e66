use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_check_type, parse_datetime},
    models::AttendanceLog,
};

const ATTENDANCE_COLUMNS: &str = "id, user_id, check_type, qr_token, timestamp";

const CSV_HEADER: [&str; 5] = ["ID", "User ID", "Type", "QRCode", "Timestamp"];

fn row_to_attendance(row: &Row) -> Result<AttendanceLog> {
    let check_type: String = row.get("check_type")?;
    let timestamp: String = row.get("timestamp")?;

    Ok(AttendanceLog {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        check_type: parse_check_type(&check_type)?,
        qr_token: row.get("qr_token")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
    })
}

/// Renders logs as CSV with one header row, in the order given.
pub fn attendance_csv(logs: &[AttendanceLog]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for log in logs {
        let id = log.id.map(|id| id.to_string()).unwrap_or_default();
        let user_id = log.user_id.to_string();
        let timestamp = log.timestamp.to_rfc3339();
        writer.write_record([
            id.as_str(),
            user_id.as_str(),
            log.check_type.as_str(),
            log.qr_token.as_str(),
            timestamp.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush attendance csv: {err}"))?;
    String::from_utf8(bytes).context("attendance csv is not valid UTF-8")
}

impl Database {
    pub async fn insert_attendance(&self, log: &AttendanceLog) -> Result<i64> {
        let record = log.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO attendance_logs (user_id, check_type, qr_token, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.user_id,
                    record.check_type.as_str(),
                    record.qr_token,
                    record.timestamp.to_rfc3339(),
                ],
            )
            .context("failed to insert attendance log")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Logs at or after `cutoff`, oldest first.
    pub async fn list_attendance_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<AttendanceLog>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ATTENDANCE_COLUMNS}
                 FROM attendance_logs
                 WHERE timestamp >= ?1
                 ORDER BY timestamp ASC"
            ))?;

            let mut rows = stmt.query(params![cutoff.to_rfc3339()])?;
            let mut logs = Vec::new();
            while let Some(row) = rows.next()? {
                logs.push(row_to_attendance(row)?);
            }
            Ok(logs)
        })
        .await
    }

    /// Attendance history of one user, newest first.
    pub async fn list_attendance_for_user(&self, user_id: i64) -> Result<Vec<AttendanceLog>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ATTENDANCE_COLUMNS}
                 FROM attendance_logs
                 WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC"
            ))?;

            let mut rows = stmt.query(params![user_id])?;
            let mut logs = Vec::new();
            while let Some(row) = rows.next()? {
                logs.push(row_to_attendance(row)?);
            }
            Ok(logs)
        })
        .await
    }

    /// Every attendance log as CSV, newest first.
    pub async fn export_attendance_csv(&self) -> Result<String> {
        let logs = self
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ATTENDANCE_COLUMNS}
                     FROM attendance_logs
                     ORDER BY timestamp DESC, id DESC"
                ))?;

                let mut rows = stmt.query([])?;
                let mut logs = Vec::new();
                while let Some(row) = rows.next()? {
                    logs.push(row_to_attendance(row)?);
                }
                Ok(logs)
            })
            .await?;

        attendance_csv(&logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::CheckType;
    use chrono::TimeZone;

    #[test]
    fn csv_has_header_and_quotes_fields() {
        let logs = vec![AttendanceLog {
            id: Some(3),
            user_id: 9,
            check_type: CheckType::Checkout,
            qr_token: "a,b".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 8, 17, 30, 0).unwrap(),
        }];

        let csv = attendance_csv(&logs).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ID,User ID,Type,QRCode,Timestamp");
        assert_eq!(lines[1], "3,9,checkout,\"a,b\",2024-03-08T17:30:00+00:00");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = attendance_csv(&[]).unwrap();
        assert_eq!(csv, "ID,User ID,Type,QRCode,Timestamp\n");
    }
}
