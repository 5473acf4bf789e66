pub mod controller;
pub mod sink;
pub mod state;

pub use controller::{SessionController, SessionOutcome};
pub use sink::SessionSink;
pub use state::{SessionSnapshot, SessionState, PERSISTED_FRAME_LIMIT};
