//! HD44780 16x2 character display behind a PCF8574 I2C backpack
//!
//! The backpack wires the expander to the display's 4-bit bus:
//! P0 = RS, P1 = RW, P2 = EN, P3 = backlight, P4..P7 = D4..D7.
//! All transfers are blocking writes with the datasheet delays.

use embassy_time::block_for;
use embassy_time::Duration;
use embedded_hal::i2c::I2c;
use heapless::String;

use reveille_core::config::DISPLAY_COLS;
use reveille_core::traits::DisplaySink;

/// Common PCF8574 backpack address
const ADDR: u8 = 0x27;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

/// Errors from the display
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// Bus transaction failed
    Bus,
}

pub struct Lcd {
    /// Last frame pushed, used to suppress redundant bus traffic
    line1: String<DISPLAY_COLS>,
    line2: String<DISPLAY_COLS>,
}

impl Lcd {
    pub fn new() -> Self {
        Self {
            line1: String::new(),
            line2: String::new(),
        }
    }

    /// Run the HD44780 4-bit initialization sequence
    pub fn init(&mut self, bus: &mut impl I2c) -> Result<(), LcdError> {
        // Power-on settle
        block_for(Duration::from_millis(50));

        // Three 8-bit function-set writes force a known state
        for _ in 0..3 {
            self.write_nibble(bus, 0x30, false)?;
            block_for(Duration::from_millis(5));
        }
        // Switch to 4-bit mode
        self.write_nibble(bus, 0x20, false)?;
        block_for(Duration::from_millis(1));

        // Function set: 4-bit, two lines, 5x8 font
        self.command(bus, 0x28)?;
        // Display on, cursor off
        self.command(bus, 0x0C)?;
        // Entry mode: increment, no shift
        self.command(bus, 0x06)?;
        self.clear_screen(bus)?;
        Ok(())
    }

    pub fn clear_screen(&mut self, bus: &mut impl I2c) -> Result<(), LcdError> {
        self.command(bus, 0x01)?;
        // Clear needs the long execution time
        block_for(Duration::from_millis(2));
        self.line1.clear();
        self.line2.clear();
        Ok(())
    }

    /// Push both lines, skipping the bus if nothing changed
    pub fn show(&mut self, bus: &mut impl I2c, line1: &str, line2: &str) -> Result<(), LcdError> {
        if self.line1.as_str() == line1 && self.line2.as_str() == line2 {
            return Ok(());
        }
        self.write_line(bus, 0x80, line1)?;
        self.write_line(bus, 0xC0, line2)?;
        self.line1 = String::try_from(&line1[..line1.len().min(DISPLAY_COLS)]).unwrap_or_default();
        self.line2 = String::try_from(&line2[..line2.len().min(DISPLAY_COLS)]).unwrap_or_default();
        Ok(())
    }

    fn write_line(&mut self, bus: &mut impl I2c, set_ddram: u8, text: &str) -> Result<(), LcdError> {
        self.command(bus, set_ddram)?;
        let mut written = 0;
        for byte in text.bytes().take(DISPLAY_COLS) {
            self.data(bus, byte)?;
            written += 1;
        }
        // Pad with spaces so stale characters never linger
        for _ in written..DISPLAY_COLS {
            self.data(bus, b' ')?;
        }
        Ok(())
    }

    fn command(&mut self, bus: &mut impl I2c, byte: u8) -> Result<(), LcdError> {
        self.write_byte(bus, byte, false)
    }

    fn data(&mut self, bus: &mut impl I2c, byte: u8) -> Result<(), LcdError> {
        self.write_byte(bus, byte, true)
    }

    fn write_byte(&mut self, bus: &mut impl I2c, byte: u8, is_data: bool) -> Result<(), LcdError> {
        self.write_nibble(bus, byte & 0xF0, is_data)?;
        self.write_nibble(bus, (byte << 4) & 0xF0, is_data)?;
        block_for(Duration::from_micros(50));
        Ok(())
    }

    fn write_nibble(&mut self, bus: &mut impl I2c, nibble: u8, is_data: bool) -> Result<(), LcdError> {
        let base = nibble | BACKLIGHT | if is_data { RS } else { 0 };
        // Latch on the falling edge of EN
        bus.write(ADDR, &[base | EN]).map_err(|_| LcdError::Bus)?;
        block_for(Duration::from_micros(1));
        bus.write(ADDR, &[base]).map_err(|_| LcdError::Bus)?;
        Ok(())
    }
}

/// Per-tick [`DisplaySink`] borrowing the display and the shared bus
pub struct LcdSink<'a, B: I2c> {
    pub lcd: &'a mut Lcd,
    pub bus: &'a mut B,
}

impl<B: I2c> DisplaySink for LcdSink<'_, B> {
    fn render(&mut self, line1: &str, line2: &str) {
        if self.lcd.show(self.bus, line1, line2).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("LCD write failed");
        }
    }

    fn clear(&mut self) {
        if self.lcd.clear_screen(self.bus).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("LCD clear failed");
        }
    }
}
