//! Fixed-capacity alarm registry
//!
//! Alarms live in a dense array ordered by insertion; removing one shifts
//! the later entries down so indices printed to the user stay contiguous.
//! An alarm is due when the wall clock sits inside the first five seconds
//! of its configured minute and its weekday mask allows today.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::clock::ClockReading;
use crate::config::{MAX_ALARMS, MAX_LABEL_LEN};

/// Seconds at the top of the minute during which an alarm may fire
pub const MATCH_WINDOW_S: u8 = 5;

/// Sentinel for an unset hour/minute field
pub const UNSET: i8 = -1;

/// One configured alarm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    /// Hour 0..=23, or [`UNSET`]
    pub hour: i8,
    /// Minute 0..=59, or [`UNSET`]
    pub minute: i8,
    pub enabled: bool,
    /// Weekday mask indexed Sunday..Saturday
    pub days: [bool; 7],
    pub label: String<MAX_LABEL_LEN>,
}

impl Alarm {
    /// An alarm ringing every day at the given time
    pub fn daily(hour: u8, minute: u8, label: &str) -> Self {
        Self {
            hour: hour as i8,
            minute: minute as i8,
            enabled: true,
            days: [true; 7],
            label: String::try_from(label).unwrap_or_default(),
        }
    }

    /// Whether this alarm is due at the given clock reading
    pub fn matches(&self, now: &ClockReading) -> bool {
        self.enabled
            && self.hour == now.hour as i8
            && self.minute == now.minute as i8
            && now.second < MATCH_WINDOW_S
            && self.days[now.weekday.index()]
    }
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            hour: UNSET,
            minute: UNSET,
            enabled: false,
            days: [false; 7],
            label: String::new(),
        }
    }
}

/// Errors from registry mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// All slots are occupied
    CapacityExceeded,
    /// No alarm at the given index
    IndexOutOfRange,
}

/// Dense, insertion-ordered alarm list
#[derive(Debug, Clone, Default)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm, MAX_ALARMS>,
}

impl AlarmRegistry {
    pub const fn new() -> Self {
        Self { alarms: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Alarm> {
        self.alarms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }

    /// Append an alarm, returning its index
    pub fn add(&mut self, alarm: Alarm) -> Result<usize, RegistryError> {
        self.alarms
            .push(alarm)
            .map_err(|_| RegistryError::CapacityExceeded)?;
        Ok(self.alarms.len() - 1)
    }

    /// Remove the alarm at `index`, shifting later entries down
    pub fn remove(&mut self, index: usize) -> Result<Alarm, RegistryError> {
        if index >= self.alarms.len() {
            return Err(RegistryError::IndexOutOfRange);
        }
        Ok(self.alarms.remove(index))
    }

    /// Replace the whole list, e.g. from persistent storage
    pub fn load(&mut self, alarms: Vec<Alarm, MAX_ALARMS>) {
        self.alarms = alarms;
    }

    /// Snapshot of the current list for persistence
    pub fn snapshot(&self) -> Vec<Alarm, MAX_ALARMS> {
        self.alarms.clone()
    }

    /// Index of the first alarm due at `now`, if any
    pub fn check_due(&self, now: &ClockReading) -> Option<usize> {
        self.alarms.iter().position(|a| a.matches(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Weekday;
    use proptest::prelude::*;

    fn reading(hour: u8, minute: u8, second: u8, weekday: Weekday) -> ClockReading {
        ClockReading::new(hour, minute, second, weekday)
    }

    #[test]
    fn test_add_and_remove_keep_order() {
        let mut reg = AlarmRegistry::new();
        reg.add(Alarm::daily(6, 0, "first")).unwrap();
        reg.add(Alarm::daily(7, 0, "second")).unwrap();
        reg.add(Alarm::daily(8, 0, "third")).unwrap();

        reg.remove(1).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(0).unwrap().label.as_str(), "first");
        assert_eq!(reg.get(1).unwrap().label.as_str(), "third");
    }

    #[test]
    fn test_sixth_add_is_rejected() {
        let mut reg = AlarmRegistry::new();
        for i in 0..MAX_ALARMS {
            assert_eq!(reg.add(Alarm::daily(i as u8, 0, "a")), Ok(i));
        }
        assert_eq!(
            reg.add(Alarm::daily(12, 0, "overflow")),
            Err(RegistryError::CapacityExceeded)
        );
        assert_eq!(reg.len(), MAX_ALARMS);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut reg = AlarmRegistry::new();
        reg.add(Alarm::daily(6, 0, "only")).unwrap();
        assert_eq!(reg.remove(1), Err(RegistryError::IndexOutOfRange));
        assert_eq!(reg.remove(5), Err(RegistryError::IndexOutOfRange));
    }

    #[test]
    fn test_match_window() {
        let alarm = Alarm::daily(7, 30, "wake");

        for second in 0..MATCH_WINDOW_S {
            assert!(alarm.matches(&reading(7, 30, second, Weekday::Monday)));
        }
        assert!(!alarm.matches(&reading(7, 30, 5, Weekday::Monday)));
        assert!(!alarm.matches(&reading(7, 29, 0, Weekday::Monday)));
        assert!(!alarm.matches(&reading(8, 30, 0, Weekday::Monday)));
    }

    #[test]
    fn test_weekday_mask() {
        let mut alarm = Alarm::daily(7, 30, "weekdays");
        alarm.days = [false, true, true, true, true, true, false];

        assert!(alarm.matches(&reading(7, 30, 0, Weekday::Wednesday)));
        assert!(!alarm.matches(&reading(7, 30, 0, Weekday::Sunday)));
        assert!(!alarm.matches(&reading(7, 30, 0, Weekday::Saturday)));
    }

    #[test]
    fn test_disabled_alarm_never_matches() {
        let mut alarm = Alarm::daily(7, 30, "off");
        alarm.enabled = false;
        assert!(!alarm.matches(&reading(7, 30, 0, Weekday::Monday)));
    }

    #[test]
    fn test_first_match_wins() {
        let mut reg = AlarmRegistry::new();
        reg.add(Alarm::daily(6, 0, "early")).unwrap();
        reg.add(Alarm::daily(7, 30, "a")).unwrap();
        reg.add(Alarm::daily(7, 30, "b")).unwrap();

        assert_eq!(reg.check_due(&reading(7, 30, 2, Weekday::Friday)), Some(1));
        assert_eq!(reg.check_due(&reading(9, 0, 0, Weekday::Friday)), None);
    }

    proptest! {
        /// Removing any index keeps the relative order of the survivors
        #[test]
        fn prop_remove_preserves_relative_order(
            count in 1usize..=MAX_ALARMS,
            remove_at in 0usize..MAX_ALARMS,
        ) {
            prop_assume!(remove_at < count);

            let mut reg = AlarmRegistry::new();
            for i in 0..count {
                let mut alarm = Alarm::daily(i as u8, 0, "p");
                alarm.minute = i as i8;
                reg.add(alarm).unwrap();
            }

            reg.remove(remove_at).unwrap();

            let minutes: std::vec::Vec<i8> = reg.iter().map(|a| a.minute).collect();
            let mut expected: std::vec::Vec<i8> = (0..count as i8).collect();
            expected.remove(remove_at);
            prop_assert_eq!(minutes, expected);
        }
    }
}
