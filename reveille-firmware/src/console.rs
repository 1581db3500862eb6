//! Serial console command parsing
//!
//! Line-oriented commands over the debug UART. Parsing lives here so the
//! RX task stays a thin byte pump; execution happens in the controller
//! task, which owns all application state.

use heapless::String;

use reveille_core::clock::{ClockReading, Weekday};
use reveille_core::config::MAX_LABEL_LEN;

/// Commands accepted on the console
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand {
    Help,
    Status,
    /// List configured alarms
    Alarms,
    /// Add an alarm ringing daily at the given time
    AddAlarm {
        hour: u8,
        minute: u8,
        label: String<MAX_LABEL_LEN>,
    },
    /// Delete the alarm at the given index
    DelAlarm { index: usize },
    /// Start a countdown of the given number of minutes
    Timer {
        minutes: u32,
        label: String<MAX_LABEL_LEN>,
    },
    /// Write a new time to the hardware clock
    SetTime { reading: ClockReading },
    /// Stop whatever is sounding or counting down
    Stop,
    /// Factory reset: wipe storage and restart
    Reset,
}

/// Parse errors reported back over the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    UnknownCommand,
    BadArgument,
    MissingArgument,
}

/// Parse one console line
pub fn parse(line: &str) -> Result<ConsoleCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(ParseError::UnknownCommand);
    };

    match command {
        "help" => Ok(ConsoleCommand::Help),
        "status" => Ok(ConsoleCommand::Status),
        "alarms" => Ok(ConsoleCommand::Alarms),
        "add" => {
            let time = words.next().ok_or(ParseError::MissingArgument)?;
            let (hour, minute) = parse_time(time)?;
            Ok(ConsoleCommand::AddAlarm {
                hour,
                minute,
                label: collect_label(words),
            })
        }
        "del" => {
            let index = words
                .next()
                .ok_or(ParseError::MissingArgument)?
                .parse()
                .map_err(|_| ParseError::BadArgument)?;
            Ok(ConsoleCommand::DelAlarm { index })
        }
        "timer" => {
            let minutes: u32 = words
                .next()
                .ok_or(ParseError::MissingArgument)?
                .parse()
                .map_err(|_| ParseError::BadArgument)?;
            if minutes == 0 {
                return Err(ParseError::BadArgument);
            }
            Ok(ConsoleCommand::Timer {
                minutes,
                label: collect_label(words),
            })
        }
        "settime" => {
            let time = words.next().ok_or(ParseError::MissingArgument)?;
            let day = words.next().ok_or(ParseError::MissingArgument)?;
            Ok(ConsoleCommand::SetTime {
                reading: parse_clock(time, day)?,
            })
        }
        "stop" => Ok(ConsoleCommand::Stop),
        "reset" => Ok(ConsoleCommand::Reset),
        _ => Err(ParseError::UnknownCommand),
    }
}

/// Parse "HH:MM" with range checks
fn parse_time(text: &str) -> Result<(u8, u8), ParseError> {
    let (hour, minute) = text.split_once(':').ok_or(ParseError::BadArgument)?;
    let hour: u8 = hour.parse().map_err(|_| ParseError::BadArgument)?;
    let minute: u8 = minute.parse().map_err(|_| ParseError::BadArgument)?;
    if hour > 23 || minute > 59 {
        return Err(ParseError::BadArgument);
    }
    Ok((hour, minute))
}

/// Parse "HH:MM:SS" plus a Sunday-first day index (0-6)
fn parse_clock(time: &str, day: &str) -> Result<ClockReading, ParseError> {
    let (hm, second) = time.rsplit_once(':').ok_or(ParseError::BadArgument)?;
    let (hour, minute) = parse_time(hm)?;
    let second: u8 = second.parse().map_err(|_| ParseError::BadArgument)?;
    if second > 59 {
        return Err(ParseError::BadArgument);
    }
    let index: u8 = day.parse().map_err(|_| ParseError::BadArgument)?;
    let weekday = Weekday::from_index(index).ok_or(ParseError::BadArgument)?;
    Ok(ClockReading::new(hour, minute, second, weekday))
}

/// Join the remaining words into a label, truncating to fit
fn collect_label<'a>(words: impl Iterator<Item = &'a str>) -> String<MAX_LABEL_LEN> {
    let mut label = String::new();
    for word in words {
        if !label.is_empty() && label.push(' ').is_err() {
            break;
        }
        if label.push_str(word).is_err() {
            break;
        }
    }
    label
}
