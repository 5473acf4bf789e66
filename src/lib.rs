pub mod dashboard;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod sensing;
pub mod session;
pub mod settings;
mod utils;

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

pub use dashboard::{build_dashboard, Dashboard};
pub use db::Database;
pub use error::EngineError;
pub use models::{ExerciseMode, Feedback, FrameSample, Keypoint, LiveReading, SessionRecord};
pub use sensing::{PoseSource, ScriptedPoseSource};
pub use session::{SessionController, SessionOutcome, SessionSink};
pub use settings::{EngineSettings, SettingsStore};

use sensing::source::{arms_pose, hinge_pose};

const DEFAULT_DATA_DIR: &str = "formtrack-data";
const DEMO_USER_ID: i64 = 1;
const DEMO_DURATION: Duration = Duration::from_millis(600);

/// Everything a running engine holds on to.
pub struct Engine {
    pub db: Database,
    pub sessions: SessionController,
    pub settings: SettingsStore,
}

impl Engine {
    /// Opens the store under `data_dir` and wires a session controller to
    /// `source`. Finished sessions are written to the same store.
    pub fn open(data_dir: PathBuf, source: Arc<dyn PoseSource>) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join("formtrack.sqlite3"))?;
        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let interval = settings.current().sample_interval();
        let sessions = SessionController::new(source, Arc::new(db.clone()), interval);

        Ok(Self {
            db,
            sessions,
            settings,
        })
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let window = self.settings.current().attendance_window_days;
        build_dashboard(&self.db, Utc::now(), window).await
    }
}

fn data_dir() -> PathBuf {
    env::var_os("FORMTRACK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn demo_script(exercise: ExerciseMode) -> Vec<Vec<Keypoint>> {
    match exercise {
        ExerciseMode::HandRaises => [60.0, 90.0, 130.0, 165.0, 175.0, 120.0]
            .into_iter()
            .map(arms_pose)
            .collect(),
        ExerciseMode::Default => [160.0, 120.0, 90.0, 65.0, 100.0, 150.0]
            .into_iter()
            .map(hinge_pose)
            .collect(),
    }
}

/// Entry point of the demo binary: logging, then [`run_in`] on the data
/// directory from `FORMTRACK_DATA_DIR`.
pub fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("FormTrack starting up...");

    run_in(data_dir())
}

/// Runs a short scripted session against the store in `data_dir` and prints
/// the stored outcome and dashboard as JSON. Fails before touching the store
/// when the exercise mode is unset or unknown.
pub fn run_in(data_dir: PathBuf) -> Result<()> {
    let settings = SettingsStore::new(data_dir.join("settings.json"))?.current();
    let exercise = settings
        .exercise_mode()
        .context("set \"exercise\" in settings.json to \"hand_raises\" or \"default\"")?;
    let user_id = settings.user_id.unwrap_or(DEMO_USER_ID);

    let source = Arc::new(ScriptedPoseSource::looping(demo_script(exercise)));
    let engine = Engine::open(data_dir, source)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        engine.sessions.start_session(user_id, exercise).await?;
        tokio::time::sleep(DEMO_DURATION).await;
        let outcome = engine.sessions.stop_session().await?;

        let metrics = engine.sessions.get_metrics().await;
        info!(
            "Session finished after {} cycles ({:.0}% with a pose)",
            metrics.cycle_count,
            metrics.detection_rate() * 100.0
        );

        let dashboard = engine.dashboard().await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        Ok::<(), anyhow::Error>(())
    })
}
