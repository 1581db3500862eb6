//! Reveille - Alarm Clock Appliance Firmware
//!
//! Main firmware binary for RP2040-based alarm clock boards.
//!
//! Named after the bugle call that wakes a camp. The core logic lives in
//! `reveille-core` and runs unchanged on the host; this binary wires it to
//! the DS1307 clock, the character display, the button and the flash.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::flash::ClockFlash;

mod channels;
mod console;
mod flash;
mod lcd;
mod outputs;
mod rtc;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Reveille firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Console UART on the debug header
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Console UART initialized");

    // Shared I2C bus for the RTC and the display backpack
    let bus = I2c::new_blocking(p.I2C1, p.PIN_3, p.PIN_2, I2cConfig::default());
    info!("I2C bus initialized");

    // Buzzer and alert LED, shared with the button fast lane
    outputs::init(
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_25, Level::Low),
    );

    // Stop/menu button, active low
    let button = Input::new(p.PIN_14, Pull::Up);

    // Flash storage (record page + flag map)
    let clock_flash = ClockFlash::new(p.FLASH, p.DMA_CH0);
    info!("Flash storage initialized");

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::console_rx_task(rx)).unwrap();
    spawner.spawn(tasks::console_tx_task(tx)).unwrap();
    spawner.spawn(tasks::controller_task(bus, clock_flash)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
