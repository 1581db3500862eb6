//! Alarm storage and matching

pub mod registry;

pub use registry::{Alarm, AlarmRegistry, RegistryError, MATCH_WINDOW_S, UNSET};
