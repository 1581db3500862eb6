//! Board-agnostic core logic for the Reveille alarm clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (alert outputs, display sink, stores)
//! - Debounced button input with the interrupt fast lane
//! - Alarm registry and countdown timer
//! - Alert actuator controller (blink cadence, arbitration)
//! - Top-level state machine
//! - Per-tick controller context tying it all together
//! - Persistence bridge (versioned records over a byte store)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod alarm;
pub mod alert;
pub mod clock;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod input;
pub mod persist;
pub mod state;
pub mod status;
pub mod traits;
