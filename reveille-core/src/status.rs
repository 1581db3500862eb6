//! Status snapshot for the console and logs

use core::fmt;

use crate::state::State;

/// One-shot summary of the appliance state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub state: State,
    pub alarm_count: usize,
    pub timer_active: bool,
    pub timer_remaining_s: u32,
    /// Whether the buzzer/LED pair is currently being driven
    pub sounding: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} alarms={} timer=",
            self.state.as_str(),
            self.alarm_count
        )?;
        if self.timer_active {
            write!(f, "{}s", self.timer_remaining_s)?;
        } else {
            f.write_str("idle")?;
        }
        if self.sounding {
            f.write_str(" sounding")?;
        }
        Ok(())
    }
}
