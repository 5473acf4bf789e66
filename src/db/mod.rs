pub mod connection;
pub mod helpers;
mod migrations;
pub mod models;
pub mod repositories;

pub use connection::Database;
pub use models::{AttendanceLog, CheckType, StoredSession};
pub use repositories::{attendance_csv, SUMMARY_SESSION_LIMIT};
