//! Hardware abstraction traits
//!
//! These traits define the narrow seams between the core and the hardware
//! collaborators. Implementations live in the firmware crate (or in test
//! doubles).

pub mod display;
pub mod outputs;
pub mod store;

pub use display::DisplaySink;
pub use outputs::AlertSink;
pub use store::{ByteStore, FlagStore, StoreError};
