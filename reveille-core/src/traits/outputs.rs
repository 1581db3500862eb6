//! Alert output trait
//!
//! The buzzer and the indicator LED are owned by the alert controller and
//! only driven through this trait. The one sanctioned exception is the
//! interrupt fast lane, which may force both outputs low ahead of the next
//! poll tick (see `input::fast_lane`).

/// Trait for the buzzer + LED output pair
pub trait AlertSink {
    /// Drive both outputs. `true` = on.
    fn set_outputs(&mut self, buzzer: bool, led: bool);
}
