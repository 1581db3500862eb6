//! Buzzer and LED output pair
//!
//! Both outputs live in shared mutexes so the button task can kill them
//! from its edge handler without waiting for the next poll tick. The
//! controller drives them through the [`AlertSink`] trait.

use core::sync::atomic::Ordering;

use embassy_rp::gpio::Output;

use reveille_core::traits::AlertSink;

use crate::channels::{BUZZER, LED, OUTPUTS_ACTIVE};

/// Store the initialized pins in the shared mutexes
pub fn init(buzzer: Output<'static>, led: Output<'static>) {
    BUZZER.lock(|cell| cell.replace(Some(buzzer)));
    LED.lock(|cell| cell.replace(Some(led)));
}

/// Force both outputs low from the interrupt path
pub fn force_low() {
    BUZZER.lock(|cell| {
        if let Some(pin) = cell.borrow_mut().as_mut() {
            pin.set_low();
        }
    });
    LED.lock(|cell| {
        if let Some(pin) = cell.borrow_mut().as_mut() {
            pin.set_low();
        }
    });
    OUTPUTS_ACTIVE.store(false, Ordering::Release);
}

/// [`AlertSink`] over the shared output pins
pub struct SharedOutputs;

impl AlertSink for SharedOutputs {
    fn set_outputs(&mut self, buzzer: bool, led: bool) {
        BUZZER.lock(|cell| {
            if let Some(pin) = cell.borrow_mut().as_mut() {
                if buzzer {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
            }
        });
        LED.lock(|cell| {
            if let Some(pin) = cell.borrow_mut().as_mut() {
                if led {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
            }
        });
        OUTPUTS_ACTIVE.store(buzzer || led, Ordering::Release);
    }
}
