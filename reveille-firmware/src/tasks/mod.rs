//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod console_rx;
pub mod console_tx;
pub mod controller;
pub mod tick;

pub use button::button_task;
pub use console_rx::console_rx_task;
pub use console_tx::console_tx_task;
pub use controller::controller_task;
pub use tick::tick_task;
