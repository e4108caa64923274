use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::MonitorConfig;
use crate::evaluation::StopEvaluator;
use crate::routes::guardians::GuardianBook;
use crate::session::SafetySession;

#[derive(Clone)]
pub struct AppState {
    pub evaluator: StopEvaluator,
    pub guardians: Arc<RwLock<GuardianBook>>,
    pub session: Arc<RwLock<SafetySession>>,
    pub monitor: Arc<MonitorConfig>,
    /// Set once a device reports its own location; simulation stops then.
    pub device_reporting: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(evaluator: StopEvaluator, guardians: GuardianBook, monitor: MonitorConfig) -> Self {
        let session = SafetySession::new(monitor.stop_threshold_secs);
        Self {
            evaluator,
            guardians: Arc::new(RwLock::new(guardians)),
            session: Arc::new(RwLock::new(session)),
            monitor: Arc::new(monitor),
            device_reporting: Arc::new(AtomicBool::new(false)),
        }
    }
}
