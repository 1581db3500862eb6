//! Alert actuator controller
//!
//! Arbitrates the buzzer, LED and the alert display frames. The buzzer
//! and LED always switch together. Alarm alerts blink at a 500 ms half
//! period, timer alerts at 250 ms. During the off phase the display is
//! blanked rather than left showing stale alert text.

use heapless::String;

use crate::config::MAX_LABEL_LEN;
use crate::traits::{AlertSink, DisplaySink};

/// Alarm alert half period (ms)
pub const ALARM_BLINK_MS: u32 = 500;

/// Timer alert half period (ms)
pub const TIMER_BLINK_MS: u32 = 250;

/// What the controller should be signalling this tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertRequest {
    Silent,
    Alarm { label: String<MAX_LABEL_LEN> },
    TimerFinished { label: String<MAX_LABEL_LEN> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveKind {
    Alarm,
    Timer,
}

/// Blink state for the output pair
#[derive(Debug, Clone)]
pub struct AlertController {
    active: Option<ActiveKind>,
    last_toggle_ms: u32,
    phase_on: bool,
    outputs_high: bool,
}

impl AlertController {
    pub const fn new() -> Self {
        Self {
            active: None,
            last_toggle_ms: 0,
            phase_on: false,
            outputs_high: false,
        }
    }

    /// Whether an alert is currently being signalled
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the outputs are physically high right now
    pub fn output_high(&self) -> bool {
        self.outputs_high
    }

    /// Drive the outputs and display for this tick
    pub fn drive(
        &mut self,
        request: &AlertRequest,
        now_ms: u32,
        outputs: &mut impl AlertSink,
        display: &mut impl DisplaySink,
    ) {
        let (kind, label) = match request {
            AlertRequest::Silent => {
                self.silence(outputs, display);
                return;
            }
            AlertRequest::Alarm { label } => (ActiveKind::Alarm, label),
            AlertRequest::TimerFinished { label } => (ActiveKind::Timer, label),
        };

        let half_period = match kind {
            ActiveKind::Alarm => ALARM_BLINK_MS,
            ActiveKind::Timer => TIMER_BLINK_MS,
        };

        let mut toggled = false;
        if self.active != Some(kind) {
            // New alert (or alert kind changed): start in the on phase
            self.active = Some(kind);
            self.phase_on = true;
            self.last_toggle_ms = now_ms;
            toggled = true;
        } else if now_ms.wrapping_sub(self.last_toggle_ms) >= half_period {
            self.phase_on = !self.phase_on;
            self.last_toggle_ms = now_ms;
            toggled = true;
        }

        if !toggled {
            return;
        }

        self.outputs_high = self.phase_on;
        outputs.set_outputs(self.phase_on, self.phase_on);
        if self.phase_on {
            let banner = match kind {
                ActiveKind::Alarm => "*** ALARM ***",
                ActiveKind::Timer => "*** TIMER ***",
            };
            display.render(banner, label.as_str());
        } else {
            display.clear();
        }
    }

    /// Force the outputs low and forget the active alert
    pub fn silence(&mut self, outputs: &mut impl AlertSink, display: &mut impl DisplaySink) {
        if self.active.is_none() && !self.outputs_high {
            return;
        }
        if self.phase_on {
            display.clear();
        }
        self.active = None;
        self.phase_on = false;
        self.outputs_high = false;
        outputs.set_outputs(false, false);
    }

    /// Align internal bookkeeping after the fast lane has already forced
    /// the outputs low behind the controller's back
    pub fn note_outputs_forced_low(&mut self) {
        self.outputs_high = false;
        self.phase_on = false;
    }
}

impl Default for AlertController {
    fn default() -> Self {
        Self::new()
    }
}
