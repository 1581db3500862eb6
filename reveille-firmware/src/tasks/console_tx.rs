//! Console UART transmit task
//!
//! Drains reply lines produced by the controller task.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::CONSOLE_REPLY;

/// Console TX task - writes reply lines
#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx) {
    info!("Console TX task started");

    loop {
        let line = CONSOLE_REPLY.receive().await;
        if tx.write_all(line.as_bytes()).await.is_err() || tx.write_all(b"\r\n").await.is_err() {
            warn!("UART write error");
        }
    }
}
