//! Wall-clock readings consumed from the external clock source
//!
//! The core never talks to the RTC itself; the embedding reads the clock
//! once per poll tick and hands the reading in by value.

/// Day of the week, Sunday-indexed to match the alarm weekday masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// Index into a Sunday-first 7-slot mask
    pub fn index(self) -> usize {
        self as usize
    }

    /// Create from a Sunday-first index (0-6)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Weekday::Sunday),
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            _ => None,
        }
    }
}

/// One wall-clock sample: time of day plus weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Day of the week
    pub weekday: Weekday,
}

impl ClockReading {
    /// Create a reading; convenient in tests and driver code
    pub const fn new(hour: u8, minute: u8, second: u8, weekday: Weekday) -> Self {
        Self {
            hour,
            minute,
            second,
            weekday,
        }
    }
}

impl Default for ClockReading {
    fn default() -> Self {
        Self::new(0, 0, 0, Weekday::Sunday)
    }
}
