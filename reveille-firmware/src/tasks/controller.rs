//! Main controller task
//!
//! Owns the application controller, the persistence bridge and the shared
//! I2C bus. Runs one controller poll per tick signal and executes console
//! commands between ticks.

use core::fmt::Write as _;
use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use heapless::String;

use reveille_core::alarm::Alarm;
use reveille_core::clock::ClockReading;
use reveille_core::config::HardwareStatus;
use reveille_core::controller::{Controller, PollOutcome};
use reveille_core::persist::{self, PersistBridge};
use reveille_core::traits::{AlertSink, FlagStore};

use crate::channels::{BUTTON_PRESSED, CONSOLE_CMD, CONSOLE_REPLY, REPLY_LINE_LEN, STOP_FLAG};
use crate::console::ConsoleCommand;
use crate::flash::ClockFlash;
use crate::lcd::{Lcd, LcdSink};
use crate::outputs::SharedOutputs;
use crate::rtc::Ds1307;
use crate::tasks::tick::TICK_SIGNAL;

type Bridge = PersistBridge<ClockFlash<'static>>;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut bus: I2c<'static, Blocking>, flash: ClockFlash<'static>) {
    info!("Controller task started");

    let mut bridge = PersistBridge::new(flash);

    // First power-up after flashing: the record area may contain factory
    // test data or garbage, wipe it before anything reads it
    match persist::first_boot(bridge.store_mut()) {
        Ok(true) => {
            info!("First boot, wiping record area");
            if bridge.wipe().is_err() {
                warn!("Record wipe failed");
            }
        }
        Ok(false) => {}
        Err(_) => warn!("First-boot flag unavailable"),
    }

    let mut controller = Controller::new();
    match bridge.load() {
        Ok(loaded) => {
            info!("Restored {} alarms from flash", loaded.alarms.len());
            controller.restore(loaded);
        }
        Err(_) => warn!("Persistent state unreadable, using defaults"),
    }

    // Hardware bring-up
    let mut rtc = Ds1307::new();
    let clock_ok = rtc.init(&mut bus).is_ok();
    let mut lcd = Lcd::new();
    let display_ok = lcd.init(&mut bus).is_ok();
    if !clock_ok {
        error!("RTC unreachable");
    }
    if !display_ok {
        warn!("Display init failed, running headless");
    }

    // Startup chirp: a dead buzzer should be caught at boot, not at 07:30
    let mut outputs = SharedOutputs;
    outputs.set_outputs(true, true);
    embassy_time::Timer::after_millis(100).await;
    outputs.set_outputs(false, false);

    controller.boot_complete(
        HardwareStatus {
            clock_ok,
            display_ok,
            network_ok: false,
        },
        0,
    );
    info!("Boot complete, state {}", controller.state().as_str());

    let mut last_reading = ClockReading::default();

    loop {
        let now_ms = TICK_SIGNAL.wait().await;

        while let Ok(cmd) = CONSOLE_CMD.try_receive() {
            handle_command(cmd, &mut controller, &mut bridge, &mut rtc, &mut bus, now_ms);
        }

        last_reading = match rtc.read_time(&mut bus) {
            Ok(reading) => reading,
            Err(_) => {
                // Keep ticking on the stale reading; alarms stall but
                // timers and the button keep working
                warn!("RTC read failed");
                last_reading
            }
        };

        let raw_button = BUTTON_PRESSED.load(Ordering::Acquire);
        let mut outputs = SharedOutputs;
        let mut display = LcdSink {
            lcd: &mut lcd,
            bus: &mut bus,
        };

        match controller.poll(
            last_reading,
            now_ms,
            raw_button,
            &STOP_FLAG,
            &mut outputs,
            &mut display,
        ) {
            PollOutcome::FactoryReset => factory_reset(&mut bridge),
            PollOutcome::Idle => {}
        }
    }
}

/// Wipe both storage namespaces and restart
fn factory_reset(bridge: &mut Bridge) -> ! {
    warn!("Factory reset: wiping storage and restarting");
    if bridge.wipe().is_err() {
        error!("Record wipe failed");
    }
    if FlagStore::wipe(bridge.store_mut()).is_err() {
        error!("Flag wipe failed");
    }
    cortex_m::peripheral::SCB::sys_reset();
}

/// Queue one reply line, dropping it if the console is backed up
fn reply(args: core::fmt::Arguments) {
    let mut line: String<REPLY_LINE_LEN> = String::new();
    let _ = line.write_fmt(args);
    let _ = CONSOLE_REPLY.try_send(line);
}

fn handle_command(
    cmd: ConsoleCommand,
    controller: &mut Controller,
    bridge: &mut Bridge,
    rtc: &mut Ds1307,
    bus: &mut I2c<'static, Blocking>,
    now_ms: u32,
) {
    match cmd {
        ConsoleCommand::Help => {
            reply(format_args!("commands:"));
            reply(format_args!("  status            show appliance state"));
            reply(format_args!("  alarms            list alarms"));
            reply(format_args!("  add HH:MM [label] add a daily alarm"));
            reply(format_args!("  del N             delete alarm N"));
            reply(format_args!("  timer MIN [label] start a countdown"));
            reply(format_args!("  settime HH:MM:SS D set the clock (D: 0=Sun)"));
            reply(format_args!("  stop              silence / cancel"));
            reply(format_args!("  reset             factory reset"));
        }
        ConsoleCommand::Status => {
            reply(format_args!("{}", controller.status(now_ms)));
        }
        ConsoleCommand::Alarms => {
            if controller.registry().is_empty() {
                reply(format_args!("no alarms set"));
            }
            for (i, alarm) in controller.registry().iter().enumerate() {
                reply(format_args!(
                    "{}: {:02}:{:02} {} [{}]",
                    i,
                    alarm.hour,
                    alarm.minute,
                    alarm.label,
                    if alarm.enabled { "on" } else { "off" },
                ));
            }
        }
        ConsoleCommand::AddAlarm { hour, minute, label } => {
            match controller.add_alarm(Alarm::daily(hour, minute, label.as_str())) {
                Ok(index) => {
                    save_alarms(controller, bridge);
                    reply(format_args!("alarm {} set for {:02}:{:02}", index, hour, minute));
                }
                Err(_) => reply(format_args!("alarm list full")),
            }
        }
        ConsoleCommand::DelAlarm { index } => match controller.delete_alarm(index) {
            Ok(_) => {
                save_alarms(controller, bridge);
                reply(format_args!("alarm {} deleted", index));
            }
            Err(_) => reply(format_args!("no alarm {}", index)),
        },
        ConsoleCommand::Timer { minutes, label } => {
            match controller.start_timer(minutes * 60, label.as_str(), now_ms) {
                Ok(()) => {
                    if bridge.save_timer(controller.timer()).is_err() {
                        warn!("Timer save failed");
                    }
                    reply(format_args!("timer started: {} min", minutes));
                }
                Err(_) => reply(format_args!("timer already running")),
            }
        }
        ConsoleCommand::SetTime { reading } => match rtc.set_time(bus, &reading) {
            Ok(()) => reply(format_args!(
                "clock set to {:02}:{:02}:{:02}",
                reading.hour, reading.minute, reading.second
            )),
            Err(_) => reply(format_args!("clock write failed")),
        },
        ConsoleCommand::Stop => {
            controller.stop_alert(now_ms);
            reply(format_args!("stopped"));
        }
        ConsoleCommand::Reset => factory_reset(bridge),
    }
}

fn save_alarms(controller: &Controller, bridge: &mut Bridge) {
    if bridge.save_alarms(&controller.registry().snapshot()).is_err() {
        warn!("Alarm save failed");
    }
}
