//! The user's live safety state: home-safe timer, silent alert and stop
//! tracking. All changes go through the transition methods on
//! [`SafetySession`]; nothing here performs I/O.

pub mod simulate;

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationResult;

/// How long the silent alert keeps recording.
pub const RECORDING_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Safe,
    TimerActive,
    AlertSent,
    CheckInSent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSafeTimer {
    pub duration_minutes: u32,
    pub remaining_seconds: u64,
}

/// Emitted when the user has been stationary for the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEvent {
    pub current: Location,
    pub last_known: Location,
    pub stopped_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    TimerExpired,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Timer duration must be at least one minute")]
    InvalidDuration,

    #[error("A home-safe timer is already running")]
    TimerAlreadyActive,

    #[error("No home-safe timer is running")]
    TimerNotActive,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySession {
    status: SessionStatus,
    timer: Option<HomeSafeTimer>,
    recording: bool,
    #[serde(skip)]
    recording_remaining: u64,
    location: Option<Location>,
    last_location: Option<Location>,
    stopped_seconds: f64,
    #[serde(skip)]
    stop_threshold_secs: f64,
}

impl SafetySession {
    pub fn new(stop_threshold_secs: f64) -> Self {
        Self {
            status: SessionStatus::Safe,
            timer: None,
            recording: false,
            recording_remaining: 0,
            location: None,
            last_location: None,
            stopped_seconds: 0.0,
            stop_threshold_secs,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn timer(&self) -> Option<HomeSafeTimer> {
        self.timer
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn stopped_seconds(&self) -> f64 {
        self.stopped_seconds
    }

    pub fn start_timer(&mut self, duration_minutes: u32) -> Result<HomeSafeTimer, SessionError> {
        if duration_minutes == 0 {
            return Err(SessionError::InvalidDuration);
        }
        if self.timer.is_some() {
            return Err(SessionError::TimerAlreadyActive);
        }

        let timer = HomeSafeTimer {
            duration_minutes,
            remaining_seconds: u64::from(duration_minutes) * 60,
        };
        self.timer = Some(timer);
        self.status = SessionStatus::TimerActive;
        Ok(timer)
    }

    /// The user checked in before the countdown ran out.
    pub fn arrive_safe(&mut self) -> Result<(), SessionError> {
        self.timer.take().ok_or(SessionError::TimerNotActive)?;
        self.status = SessionStatus::Safe;
        Ok(())
    }

    pub fn trigger_silent_alert(&mut self) {
        self.status = SessionStatus::AlertSent;
        self.recording = true;
        self.recording_remaining = RECORDING_SECS;
    }

    /// Advance the clocks by `seconds`.
    pub fn tick(&mut self, seconds: u64) -> Option<TickEvent> {
        if self.recording {
            self.recording_remaining = self.recording_remaining.saturating_sub(seconds);
            if self.recording_remaining == 0 {
                self.recording = false;
            }
        }

        let timer = self.timer.as_mut()?;
        if timer.remaining_seconds > seconds {
            timer.remaining_seconds -= seconds;
            return None;
        }

        self.timer = None;
        self.status = SessionStatus::AlertSent;
        Some(TickEvent::TimerExpired)
    }

    /// Record a location sample taken `interval_secs` after the previous one.
    ///
    /// Identical consecutive fixes accumulate stopped time; any movement
    /// resets it. Once the threshold is reached the counter resets and a
    /// [`StopEvent`] is returned, unless an emergency alert is already out.
    pub fn record_location(&mut self, fix: Location, interval_secs: f64) -> Option<StopEvent> {
        self.last_location = self.location.replace(fix);
        let last_known = self.last_location?;

        if last_known == fix {
            self.stopped_seconds += interval_secs;
        } else {
            self.stopped_seconds = 0.0;
        }

        if self.stopped_seconds < self.stop_threshold_secs {
            return None;
        }

        let stopped_seconds = self.stopped_seconds;
        self.stopped_seconds = 0.0;

        if self.status == SessionStatus::AlertSent {
            return None;
        }

        Some(StopEvent {
            current: fix,
            last_known,
            stopped_seconds,
        })
    }

    /// Apply an evaluator decision. Returns true when a check-in goes out.
    pub fn apply_check_in(&mut self, result: &EvaluationResult) -> bool {
        if !result.should_send_check_in || self.status == SessionStatus::AlertSent {
            return false;
        }
        self.status = SessionStatus::CheckInSent;
        true
    }
}
