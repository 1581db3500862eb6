//! Single-slot countdown timer
//!
//! The appliance supports one countdown at a time. On expiry the timer
//! switches from `active` to `finished` and sounds an alert that either
//! times out after [`TIMER_ALERT_MS`] or is stopped by the button. The
//! `active` and `finished` flags are never both set.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::config::MAX_LABEL_LEN;

/// How long the post-expiry alert sounds without user intervention (ms)
pub const TIMER_ALERT_MS: u32 = 5000;

/// Errors from timer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// A countdown is already running
    AlreadyActive,
}

/// Countdown state, persisted as a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountdownTimer {
    duration_s: u32,
    start_ms: u32,
    active: bool,
    finished: bool,
    alarm_triggered: bool,
    alarm_start_ms: u32,
    pub label: String<MAX_LABEL_LEN>,
}

impl CountdownTimer {
    pub const fn new() -> Self {
        Self {
            duration_s: 0,
            start_ms: 0,
            active: false,
            finished: false,
            alarm_triggered: false,
            alarm_start_ms: 0,
            label: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the post-expiry alert is currently sounding
    pub fn alert_active(&self) -> bool {
        self.alarm_triggered
    }

    pub fn duration_s(&self) -> u32 {
        self.duration_s
    }

    /// Start a countdown of `duration_s` seconds
    pub fn start(&mut self, duration_s: u32, label: &str, now_ms: u32) -> Result<(), TimerError> {
        if self.active {
            return Err(TimerError::AlreadyActive);
        }
        self.duration_s = duration_s;
        self.start_ms = now_ms;
        self.active = true;
        self.finished = false;
        self.alarm_triggered = false;
        self.label = String::try_from(label).unwrap_or_default();
        Ok(())
    }

    /// Cancel the countdown and any pending alert
    pub fn stop(&mut self) {
        self.active = false;
        self.finished = false;
        self.alarm_triggered = false;
    }

    /// Advance the timer; returns true on the tick where it expires
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if !self.active {
            return false;
        }
        let elapsed_ms = now_ms.wrapping_sub(self.start_ms);
        if elapsed_ms >= self.duration_s.saturating_mul(1000) {
            self.active = false;
            self.finished = true;
            self.alarm_triggered = true;
            self.alarm_start_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Whether the alert has outlived its window and should self-silence
    pub fn alert_expired(&self, now_ms: u32) -> bool {
        self.alarm_triggered && now_ms.wrapping_sub(self.alarm_start_ms) >= TIMER_ALERT_MS
    }

    /// Silence the alert while keeping the finished marker
    pub fn clear_alert(&mut self) {
        self.alarm_triggered = false;
    }

    /// Seconds left, zero when idle or expired
    pub fn remaining_s(&self, now_ms: u32) -> u32 {
        if !self.active {
            return 0;
        }
        let elapsed_s = now_ms.wrapping_sub(self.start_ms) / 1000;
        self.duration_s.saturating_sub(elapsed_s)
    }
}
