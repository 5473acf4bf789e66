pub mod attendance;
pub mod session;

pub use attendance::{AttendanceLog, CheckType};
pub use session::StoredSession;
