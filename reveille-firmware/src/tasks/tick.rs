//! 100 ms poll heartbeat
//!
//! Everything time-based in the core (debounce hold-off, blink phases,
//! the countdown, alert timeouts) is evaluated against the elapsed-ms
//! value published here; the controller task blocks on the signal
//! instead of running its own ticker.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Poll interval for the controller loop (ms)
pub const TICK_INTERVAL_MS: u32 = 100;

/// Latest elapsed-ms value, published once per interval
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Publishes the monotonic timestamp that paces the controller
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let boot = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        ticker.next().await;

        // u32 ms wraps after ~49 days; all consumers subtract with
        // wrapping arithmetic
        TICK_SIGNAL.signal(boot.elapsed().as_millis() as u32);
    }
}
