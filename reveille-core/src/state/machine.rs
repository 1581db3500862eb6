//! State transition table
//!
//! Transitions are pure: the machine consumes an event and yields the next
//! state, and unlisted combinations keep the current state. Timeouts are
//! measured by the controller against the state entry timestamp and fed
//! back in as events.

use super::events::Event;

/// How long an alarm sounds before stopping on its own (ms)
pub const ALARM_TIMEOUT_MS: u32 = 5 * 60 * 1000;

/// How long the menu stays open without input (ms)
pub const MENU_TIMEOUT_MS: u32 = 10_000;

/// Hardware faults that put the appliance in the error state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Real-time clock unreachable
    Clock,
    /// Display module unreachable
    Display,
}

/// Top-level appliance states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    #[default]
    Boot,
    Normal,
    Alarm,
    Countdown,
    Info,
    Error(FaultKind),
    Menu,
}

impl State {
    /// Apply one event, returning the next state
    pub fn transition(self, event: Event) -> Self {
        match (self, event) {
            (State::Boot, Event::BootComplete) => State::Normal,
            (State::Boot, Event::FaultDetected(kind)) => State::Error(kind),
            (State::Normal, Event::AlarmFired) => State::Alarm,
            (State::Normal, Event::TimerStarted) => State::Countdown,
            (State::Normal, Event::MenuEntered) => State::Menu,
            (State::Normal, Event::InfoRequested) => State::Info,
            (State::Alarm, Event::StopRequested) => State::Normal,
            (State::Alarm, Event::AlarmTimeout) => State::Normal,
            (State::Countdown, Event::TimerIdle) => State::Normal,
            (State::Countdown, Event::StopRequested) => State::Normal,
            (State::Menu, Event::MenuTimeout) => State::Normal,
            (State::Menu, Event::StopRequested) => State::Normal,
            (State::Info, Event::StopRequested) => State::Normal,
            // Faults after boot also latch the error state
            (_, Event::FaultDetected(kind)) => State::Error(kind),
            (state, _) => state,
        }
    }

    /// Whether alarms may fire from this state
    pub fn alarms_checkable(self) -> bool {
        self == State::Normal
    }

    /// Short name for logs and the status line
    pub fn as_str(self) -> &'static str {
        match self {
            State::Boot => "BOOT",
            State::Normal => "NORMAL",
            State::Alarm => "ALARM",
            State::Countdown => "COUNTDOWN",
            State::Info => "INFO",
            State::Error(_) => "ERROR",
            State::Menu => "MENU",
        }
    }
}
