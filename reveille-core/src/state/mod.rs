//! Top-level appliance state machine

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FaultKind, State, ALARM_TIMEOUT_MS, MENU_TIMEOUT_MS};
