//! Inter-task communication
//!
//! Static channels and atomics shared between Embassy tasks. The button
//! interrupt path and the poll loop communicate exclusively through the
//! stop flag and the two atomics here; everything else goes over channels.

use core::cell::RefCell;
use core::sync::atomic::AtomicBool;

use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use heapless::String;

use reveille_core::input::StopFlag;

use crate::console::ConsoleCommand;

/// Channel capacity for parsed console commands
const CMD_CHANNEL_SIZE: usize = 4;

/// Channel capacity for console reply lines
const REPLY_CHANNEL_SIZE: usize = 8;

/// Maximum console reply line length
pub const REPLY_LINE_LEN: usize = 64;

/// Stop request raised by the button interrupt path
pub static STOP_FLAG: StopFlag = StopFlag::new();

/// Raw button level sampled by the button task (true = pressed)
pub static BUTTON_PRESSED: AtomicBool = AtomicBool::new(false);

/// Mirror of the alert controller's output state, readable from the
/// interrupt path without locking
pub static OUTPUTS_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Buzzer output, shared so the interrupt path can force it low
pub static BUZZER: Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>> =
    Mutex::new(RefCell::new(None));

/// Alert LED output, shared with the interrupt path like the buzzer
pub static LED: Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>> =
    Mutex::new(RefCell::new(None));

/// Parsed commands from the console RX task
pub static CONSOLE_CMD: Channel<CriticalSectionRawMutex, ConsoleCommand, CMD_CHANNEL_SIZE> =
    Channel::new();

/// Reply lines for the console TX task
pub static CONSOLE_REPLY: Channel<CriticalSectionRawMutex, String<REPLY_LINE_LEN>, REPLY_CHANNEL_SIZE> =
    Channel::new();
