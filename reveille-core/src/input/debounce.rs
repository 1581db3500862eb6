//! Button debouncing and press classification
//!
//! A raw level is accepted as stable only after it has been unchanged for
//! the hold-off period; every raw transition restarts the hold-off. Press
//! duration is measured between the raw edge timestamps, so the hold-off
//! delay does not skew the short/long classification.

/// Hold-off before a level change is accepted (ms)
pub const DEBOUNCE_MS: u32 = 50;

/// Presses held at least this long trigger a factory reset (ms)
pub const LONG_PRESS_MS: u32 = 5000;

/// Events derived from the debounced button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Released before the long-press threshold
    ShortPress,
    /// Released at or after the long-press threshold; the caller is
    /// expected to wipe persistent state and restart, so nothing else
    /// should run after observing this
    FactoryReset,
}

/// Debounce state for one input channel
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Last accepted (stable) level, true = pressed
    last_stable: bool,
    /// Last raw sample
    last_raw: bool,
    /// Timestamp of the last raw transition (ms)
    last_change_ms: u32,
    /// Raw-edge timestamp of the current press (ms)
    press_start_ms: u32,
    /// The in-flight press was already acted on elsewhere
    press_consumed: bool,
}

impl Debouncer {
    /// Create a debouncer with the button released
    pub const fn new() -> Self {
        Self {
            last_stable: false,
            last_raw: false,
            last_change_ms: 0,
            press_start_ms: 0,
            press_consumed: false,
        }
    }

    /// Mark the in-flight press as already handled, so its release does
    /// not fire a second event. The interrupt fast lane silences the
    /// outputs on the press edge itself; without this the same press
    /// would be classified here again.
    pub fn consume_press(&mut self) {
        self.press_consumed = true;
    }

    /// Current stable level, true = pressed
    pub fn is_pressed(&self) -> bool {
        self.last_stable
    }

    /// Feed one raw sample; returns an event when a stable release is
    /// classified
    pub fn sample(&mut self, raw_pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        if raw_pressed != self.last_raw {
            self.last_raw = raw_pressed;
            self.last_change_ms = now_ms;
        }

        if raw_pressed == self.last_stable {
            // A consumed tap that never reached a stable press must not
            // swallow the next press; drop the latch once the line has
            // settled released
            if !raw_pressed
                && self.press_consumed
                && now_ms.wrapping_sub(self.last_change_ms) >= DEBOUNCE_MS
            {
                self.press_consumed = false;
            }
            return None;
        }

        // Still inside the hold-off window
        if now_ms.wrapping_sub(self.last_change_ms) < DEBOUNCE_MS {
            return None;
        }

        self.last_stable = raw_pressed;

        if raw_pressed {
            self.press_start_ms = self.last_change_ms;
            None
        } else {
            let held_ms = self.last_change_ms.wrapping_sub(self.press_start_ms);
            let consumed = self.press_consumed;
            self.press_consumed = false;
            if held_ms >= LONG_PRESS_MS {
                // A long hold is an explicit reset request even when its
                // press edge already silenced an alert
                Some(ButtonEvent::FactoryReset)
            } else if consumed {
                None
            } else {
                Some(ButtonEvent::ShortPress)
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
