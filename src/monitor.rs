//! Glue between location samples, the safety session and the stop
//! evaluator, plus the background loops that drive them.

use serde::Serialize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::evaluation::EvaluationRequest;
use crate::session::simulate::{LocationSimulator, DEFAULT_HOME};
use crate::session::{Location, SafetySession, StopEvent, TickEvent};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// The model asked for a check-in and it was sent.
    Sent {
        #[serde(rename = "guardianPhone")]
        guardian_phone: String,
    },
    NotNeeded,
    /// The model asked for a check-in but an emergency alert is already out.
    Suppressed,
    NoGuardian,
    /// The evaluation failed; nothing was decided.
    Indeterminate { error: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    pub session: SafetySession,
    pub stop: Option<StopEvent>,
    pub check_in: Option<CheckInOutcome>,
}

/// Feed one location fix through the session and evaluate any stop it
/// triggers.
pub async fn process_fix(state: &AppState, fix: Location) -> FixOutcome {
    let stop = state
        .session
        .write()
        .await
        .record_location(fix, state.monitor.sample_interval_secs);

    let check_in = match &stop {
        Some(event) => Some(handle_stop(state, event).await),
        None => None,
    };

    let session = state.session.read().await.clone();
    FixOutcome { session, stop, check_in }
}

/// A fix reported by the user's device. The first one switches off the
/// simulated feed so the two sources never interleave in one session.
pub async fn process_device_fix(state: &AppState, fix: Location) -> FixOutcome {
    if !state.device_reporting.swap(true, Ordering::SeqCst) && state.monitor.simulate_location {
        tracing::info!("device location received, simulated location feed paused");
    }
    process_fix(state, fix).await
}

/// One simulated sample. Returns `None` once a device is reporting.
pub async fn simulate_step(state: &AppState, simulator: &mut LocationSimulator) -> Option<FixOutcome> {
    if state.device_reporting.load(Ordering::SeqCst) {
        return None;
    }

    let (previous, timer_active) = {
        let session = state.session.read().await;
        (session.location(), session.is_timer_active())
    };
    let fix = simulator.next_fix(previous, timer_active);
    let outcome = process_fix(state, fix).await;
    tracing::debug!(
        lat = fix.lat,
        lon = fix.lon,
        stopped_seconds = outcome.session.stopped_seconds(),
        "simulated fix"
    );
    Some(outcome)
}

async fn handle_stop(state: &AppState, event: &StopEvent) -> CheckInOutcome {
    let guardian_phone = match state.guardians.read().await.primary() {
        Some(g) => g.phone.clone(),
        None => {
            tracing::warn!("unexpected stop detected but no guardian is configured");
            return CheckInOutcome::NoGuardian;
        }
    };

    let request = EvaluationRequest {
        current_latitude: event.current.lat,
        current_longitude: event.current.lon,
        last_known_latitude: event.last_known.lat,
        last_known_longitude: event.last_known.lon,
        stopped_seconds: event.stopped_seconds,
        guardian_phone: guardian_phone.clone(),
        user_phone: state.monitor.user_phone.clone(),
    };

    // session lock is not held while the model is thinking
    let result = match state.evaluator.evaluate(&request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "automated check-in could not be evaluated");
            return CheckInOutcome::Indeterminate { error: e.to_string() };
        }
    };

    if !result.should_send_check_in {
        return CheckInOutcome::NotNeeded;
    }

    if state.session.write().await.apply_check_in(&result) {
        tracing::info!(
            guardian_phone = %guardian_phone,
            user_phone = %request.user_phone,
            "automated check-in sent"
        );
        CheckInOutcome::Sent { guardian_phone }
    } else {
        CheckInOutcome::Suppressed
    }
}

/// Advance the session clock and report a timer expiry.
pub async fn tick(state: &AppState, seconds: u64) -> Option<TickEvent> {
    let event = state.session.write().await.tick(seconds);
    if let Some(TickEvent::TimerExpired) = event {
        let guardians = state.guardians.read().await.len();
        tracing::warn!(guardians, "home-safe timer expired, alert sent to guardians");
    }
    event
}

/// Start the timer ticker and, when enabled, the simulated location feed.
pub fn spawn_background(state: AppState) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    let ticker_state = state.clone();
    handles.push(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await;
        loop {
            interval.tick().await;
            tick(&ticker_state, 1).await;
        }
    }));

    if state.monitor.simulate_location {
        let period = Duration::from_secs_f64(state.monitor.sample_interval_secs);
        handles.push(tokio::spawn(async move {
            let mut simulator = LocationSimulator::new(DEFAULT_HOME);
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if simulate_step(&state, &mut simulator).await.is_none() {
                    break;
                }
            }
        }));
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::evaluation::{GenerationError, StopEvaluator, StructuredGenerator};
    use crate::routes::guardians::GuardianBook;
    use crate::session::SessionStatus;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedGenerator {
        reply: Option<bool>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StructuredGenerator for FixedGenerator {
        async fn generate(&self, prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("(555) 123-4567"));
            match self.reply {
                Some(decision) => Ok(json!({ "shouldSendCheckIn": decision })),
                None => Err(GenerationError::Transport("offline".to_string())),
            }
        }
    }

    fn state_with(reply: Option<bool>, guardians: GuardianBook) -> (AppState, Arc<FixedGenerator>) {
        let generator = Arc::new(FixedGenerator { reply, calls: AtomicUsize::new(0) });
        let monitor = MonitorConfig {
            stop_threshold_secs: 10.0,
            sample_interval_secs: 5.0,
            simulate_location: false,
            ..MonitorConfig::default()
        };
        let state = AppState::new(StopEvaluator::new(generator.clone()), guardians, monitor);
        (state, generator)
    }

    const HERE: Location = Location { lat: 34.0522, lon: -118.2437 };

    async fn stand_still(state: &AppState) -> FixOutcome {
        process_fix(state, HERE).await;
        process_fix(state, HERE).await;
        process_fix(state, HERE).await
    }

    #[tokio::test]
    async fn test_stop_sends_check_in() {
        let (state, generator) = state_with(Some(true), GuardianBook::seeded());
        let outcome = stand_still(&state).await;

        assert_eq!(outcome.stop.unwrap().stopped_seconds, 10.0);
        assert_eq!(
            outcome.check_in,
            Some(CheckInOutcome::Sent { guardian_phone: "(555) 123-4567".to_string() })
        );
        assert_eq!(outcome.session.status(), SessionStatus::CheckInSent);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_negative_decision_leaves_status() {
        let (state, _) = state_with(Some(false), GuardianBook::seeded());
        let outcome = stand_still(&state).await;
        assert_eq!(outcome.check_in, Some(CheckInOutcome::NotNeeded));
        assert_eq!(outcome.session.status(), SessionStatus::Safe);
    }

    #[tokio::test]
    async fn test_failed_evaluation_is_indeterminate() {
        let (state, _) = state_with(None, GuardianBook::seeded());
        state.session.write().await.start_timer(10).unwrap();

        let outcome = stand_still(&state).await;
        assert!(matches!(outcome.check_in, Some(CheckInOutcome::Indeterminate { .. })));
        assert_eq!(outcome.session.status(), SessionStatus::TimerActive);
    }

    #[tokio::test]
    async fn test_no_guardian_skips_evaluation() {
        let (state, generator) = state_with(Some(true), GuardianBook::new());
        let outcome = stand_still(&state).await;
        assert_eq!(outcome.check_in, Some(CheckInOutcome::NoGuardian));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_movement_never_evaluates() {
        let (state, generator) = state_with(Some(true), GuardianBook::seeded());
        for i in 0..6 {
            let fix = Location { lat: HERE.lat + f64::from(i) * 0.001, lon: HERE.lon };
            let outcome = process_fix(&state, fix).await;
            assert!(outcome.stop.is_none());
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tick_reports_expiry() {
        let (state, _) = state_with(Some(true), GuardianBook::seeded());
        state.session.write().await.start_timer(1).unwrap();
        assert_eq!(tick(&state, 30).await, None);
        assert_eq!(tick(&state, 30).await, Some(TickEvent::TimerExpired));
        assert_eq!(state.session.read().await.status(), SessionStatus::AlertSent);
    }

    #[tokio::test]
    async fn test_device_fix_pauses_simulation() {
        let (state, generator) = state_with(Some(true), GuardianBook::seeded());
        let mut simulator = LocationSimulator::with_seed(DEFAULT_HOME, 5);

        // simulated samples run until the device speaks up
        assert!(simulate_step(&state, &mut simulator).await.is_some());

        // simulated and device fixes interleave; only the device's count
        let mut outcomes = Vec::new();
        for _ in 0..3 {
            outcomes.push(process_device_fix(&state, HERE).await);
            assert!(simulate_step(&state, &mut simulator).await.is_none());
        }

        assert_eq!(outcomes[1].session.stopped_seconds(), 5.0);
        let last = outcomes.pop().unwrap();
        assert_eq!(last.stop.unwrap().stopped_seconds, 10.0);
        assert!(matches!(last.check_in, Some(CheckInOutcome::Sent { .. })));
        assert_eq!(state.session.read().await.location(), Some(HERE));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    // Raises the silent alert while the model is still deciding.
    struct AlertingGenerator {
        session: Arc<tokio::sync::RwLock<SafetySession>>,
    }

    #[async_trait]
    impl StructuredGenerator for AlertingGenerator {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
            self.session.write().await.trigger_silent_alert();
            Ok(json!({ "shouldSendCheckIn": true }))
        }
    }

    #[tokio::test]
    async fn test_alert_during_evaluation_suppresses_check_in() {
        let (mut state, _) = state_with(Some(true), GuardianBook::seeded());
        state.evaluator = StopEvaluator::new(Arc::new(AlertingGenerator {
            session: state.session.clone(),
        }));

        let outcome = stand_still(&state).await;
        assert!(outcome.stop.is_some());
        assert_eq!(outcome.check_in, Some(CheckInOutcome::Suppressed));
        assert_eq!(outcome.session.status(), SessionStatus::AlertSent);
    }
}
