//! DS1307 real-time clock driver
//!
//! Minimal register access over a shared blocking I2C bus. The DS1307
//! keeps BCD time; the day-of-week register counts 1..=7 and this
//! firmware stores 1 = Sunday to match the weekday mask indexing.

use embedded_hal::i2c::I2c;

use reveille_core::clock::{ClockReading, Weekday};

/// Fixed DS1307 bus address
const ADDR: u8 = 0x68;

/// Seconds register; bit 7 is the clock-halt flag
const REG_SECONDS: u8 = 0x00;

/// Errors from the RTC
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// Bus transaction failed
    Bus,
    /// Register contents were not valid BCD time
    BadTime,
}

pub struct Ds1307;

impl Ds1307 {
    pub fn new() -> Self {
        Self
    }

    /// Probe the chip and clear the clock-halt bit if it is set
    pub fn init(&mut self, bus: &mut impl I2c) -> Result<(), RtcError> {
        let mut seconds = [0u8];
        bus.write_read(ADDR, &[REG_SECONDS], &mut seconds)
            .map_err(|_| RtcError::Bus)?;
        if seconds[0] & 0x80 != 0 {
            // Oscillator halted (fresh battery); restart it
            bus.write(ADDR, &[REG_SECONDS, seconds[0] & 0x7F])
                .map_err(|_| RtcError::Bus)?;
        }
        Ok(())
    }

    /// Read the current time
    pub fn read_time(&mut self, bus: &mut impl I2c) -> Result<ClockReading, RtcError> {
        let mut regs = [0u8; 4];
        bus.write_read(ADDR, &[REG_SECONDS], &mut regs)
            .map_err(|_| RtcError::Bus)?;

        let second = from_bcd(regs[0] & 0x7F);
        let minute = from_bcd(regs[1] & 0x7F);
        // Assume 24-hour mode (bit 6 clear); mask keeps a 12-hour chip
        // from producing garbage hours
        let hour = from_bcd(regs[2] & 0x3F);
        let weekday = Weekday::from_index(regs[3].wrapping_sub(1)).ok_or(RtcError::BadTime)?;

        if second > 59 || minute > 59 || hour > 23 {
            return Err(RtcError::BadTime);
        }
        Ok(ClockReading::new(hour, minute, second, weekday))
    }

    /// Write a new time, also clearing the clock-halt bit
    pub fn set_time(&mut self, bus: &mut impl I2c, time: &ClockReading) -> Result<(), RtcError> {
        let regs = [
            REG_SECONDS,
            to_bcd(time.second) & 0x7F,
            to_bcd(time.minute),
            to_bcd(time.hour),
            time.weekday.index() as u8 + 1,
        ];
        bus.write(ADDR, &regs).map_err(|_| RtcError::Bus)
    }
}

fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
