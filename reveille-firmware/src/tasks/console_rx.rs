//! Console UART receive task
//!
//! Accumulates bytes into lines, parses them and forwards commands to
//! the controller task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::String;

use crate::channels::{CONSOLE_CMD, CONSOLE_REPLY, REPLY_LINE_LEN};
use crate::console::{self, ParseError};

/// Maximum console line length
const LINE_LEN: usize = 64;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Console RX task - reads lines and dispatches parsed commands
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut line: String<LINE_LEN> = String::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match byte {
                        b'\r' | b'\n' => {
                            if !line.is_empty() {
                                dispatch(line.as_str());
                                line.clear();
                            }
                        }
                        _ => {
                            if line.push(byte as char).is_err() {
                                warn!("Console line too long, discarding");
                                line.clear();
                            }
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Parse one line; errors are reported straight back to the console
fn dispatch(text: &str) {
    match console::parse(text) {
        Ok(cmd) => {
            if CONSOLE_CMD.try_send(cmd).is_err() {
                warn!("Command channel full, dropping command");
            }
        }
        Err(e) => {
            let mut reply: String<REPLY_LINE_LEN> = String::new();
            let _ = reply.push_str(match e {
                ParseError::UnknownCommand => "unknown command (try: help)",
                ParseError::BadArgument => "bad argument",
                ParseError::MissingArgument => "missing argument",
            });
            let _ = CONSOLE_REPLY.try_send(reply);
        }
    }
}
