//! Persistence over the byte store
//!
//! Each persisted object lives at a fixed offset as a versioned,
//! length-prefixed record so a payload can grow without disturbing its
//! neighbours. The first-boot marker uses the separate flag namespace.

pub mod bridge;
pub mod record;

pub use bridge::{
    first_boot, LoadedState, PersistBridge, ALARM_OFFSET, CONFIG_OFFSET, STORE_SIZE, TIMER_OFFSET,
};
pub use record::{RecordError, RECORD_HEADER_LEN, SCHEMA_VERSION};
