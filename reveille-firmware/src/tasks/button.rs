//! Button task
//!
//! Owns the button pin and serves both input paths: the falling-edge
//! fast lane that silences an active alert immediately, and the level
//! samples the controller's debouncer consumes on its poll ticks.
//! The button is wired active low with the internal pull-up.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};

use reveille_core::input::FastLane;

use crate::channels::{BUTTON_PRESSED, OUTPUTS_ACTIVE, STOP_FLAG};
use crate::outputs;

/// Level sample interval; well under the debounce hold-off
const SAMPLE_INTERVAL_MS: u64 = 10;

/// Button task - edge fast lane plus level sampling
#[embassy_executor::task]
pub async fn button_task(mut pin: Input<'static>) {
    info!("Button task started");

    let mut lane = FastLane::new();
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let start = Instant::now();

    loop {
        match select(pin.wait_for_falling_edge(), ticker.next()).await {
            Either::First(()) => {
                BUTTON_PRESSED.store(true, Ordering::Release);

                let now_ms = start.elapsed().as_millis() as u32;
                let outputs_active = OUTPUTS_ACTIVE.load(Ordering::Acquire);
                if lane.on_falling_edge(now_ms, outputs_active, &STOP_FLAG) {
                    debug!("Fast lane: outputs forced low");
                    outputs::force_low();
                }
            }
            Either::Second(()) => {
                BUTTON_PRESSED.store(pin.is_low(), Ordering::Release);
            }
        }
    }
}
