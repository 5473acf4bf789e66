pub mod attendance;
pub mod sessions;

pub use attendance::attendance_csv;
pub use sessions::SUMMARY_SESSION_LIMIT;
