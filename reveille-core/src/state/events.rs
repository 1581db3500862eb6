//! Events driving the top-level state machine

use super::machine::FaultKind;

/// Inputs to [`super::State::transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Hardware bring-up finished without a blocking fault
    BootComplete,
    /// An enabled alarm matched the wall clock
    AlarmFired,
    /// A countdown was started
    TimerStarted,
    /// The countdown and its alert are both done
    TimerIdle,
    /// The user asked to stop whatever is sounding (or leave a page)
    StopRequested,
    /// The user asked for the info page
    InfoRequested,
    /// An alarm sounded for its full timeout without being stopped
    AlarmTimeout,
    /// The user opened the configuration menu
    MenuEntered,
    /// The menu sat untouched for its full timeout
    MenuTimeout,
    /// A hardware fault was detected
    FaultDetected(FaultKind),
}
