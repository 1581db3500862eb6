//! Interrupt fast lane for silencing an active alert
//!
//! The falling-edge interrupt handler must not touch the state machine;
//! it may only kill the buzzer and LED immediately and raise a stop flag
//! that the poll loop consumes on its next tick. The flag is a single
//! `AtomicBool` written with plain load/store so the path stays free of
//! read-modify-write atomics.

use core::sync::atomic::{AtomicBool, Ordering};

/// Edges closer together than this are treated as one press (ms)
pub const FAST_LANE_HOLDOFF_MS: u32 = 50;

/// Stop request shared between interrupt context and the poll loop
pub struct StopFlag(AtomicBool);

impl StopFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Raise the flag (interrupt context)
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Read and clear the flag (poll loop). A request landing between the
    /// load and the store is lost; the poll loop's own debounced handling
    /// of the same press covers that case.
    pub fn take(&self) -> bool {
        let raised = self.0.load(Ordering::Acquire);
        if raised {
            self.0.store(false, Ordering::Release);
        }
        raised
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-edge bookkeeping for the interrupt path
#[derive(Debug, Clone)]
pub struct FastLane {
    last_edge_ms: u32,
}

impl FastLane {
    pub const fn new() -> Self {
        Self { last_edge_ms: 0 }
    }

    /// Handle a falling edge. Returns true when the outputs should be
    /// forced low right now; the stop flag is raised in the same case so
    /// the poll loop can finish the transition.
    pub fn on_falling_edge(&mut self, now_ms: u32, outputs_active: bool, flag: &StopFlag) -> bool {
        let since_last = now_ms.wrapping_sub(self.last_edge_ms);
        self.last_edge_ms = now_ms;
        if since_last <= FAST_LANE_HOLDOFF_MS {
            return false;
        }
        if outputs_active {
            flag.request();
            true
        } else {
            false
        }
    }
}

impl Default for FastLane {
    fn default() -> Self {
        Self::new()
    }
}
