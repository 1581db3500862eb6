//! Button input handling
//!
//! Two independent paths observe the same physical button:
//!
//! - [`debounce::Debouncer`] runs in the poll loop and is the authority for
//!   all state transitions.
//! - [`fast_lane::FastLane`] runs in interrupt context and may only silence
//!   the actuator early, handing the rest back to the poll loop through
//!   [`fast_lane::StopFlag`].

pub mod debounce;
pub mod fast_lane;

pub use debounce::{ButtonEvent, Debouncer, DEBOUNCE_MS, LONG_PRESS_MS};
pub use fast_lane::{FastLane, StopFlag};
